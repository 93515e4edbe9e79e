//! Secret configuration loading.
//!
//! API credentials live in `~/.config/sage/secret.json`, separate from the
//! behavioral tuning in `sage_core::config`. Loading failures surface as
//! `SageError` like every other fallible operation in the workspace; the
//! caller decides whether to fall back to environment variables.

use sage_core::{Result, SageError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    /// OpenAI-compatible backend section, absent when unconfigured.
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
}

/// Credentials and overrides for an OpenAI-compatible backend.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl SecretConfig {
    /// Loads a secret configuration file from the given path.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the file does not exist, an `Io` error
    /// when it cannot be read, and a `Serialization` error when it is not
    /// valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SageError::config(format!(
                "Secret file not found at: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Loads the secret configuration from `~/.config/sage/secret.json`.
pub fn load_secret_config() -> Result<SecretConfig> {
    SecretConfig::load(default_secret_path()?)
}

fn default_secret_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| SageError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("sage").join("secret.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_the_openai_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"openai": {{"api_key": "sk-test", "model_name": "gpt-4o-mini"}}}}"#
        )
        .unwrap();

        let config = SecretConfig::load(file.path()).unwrap();
        let openai = config.openai.unwrap();
        assert_eq!(openai.api_key, "sk-test");
        assert_eq!(openai.model_name.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(openai.base_url, None);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = SecretConfig::load("/no/such/secret.json").unwrap_err();
        assert!(matches!(err, SageError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = SecretConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, SageError::Serialization { .. }));
    }
}
