//! Tuning configuration for the tutoring engine.
//!
//! Secrets (API keys) live in `sage-interaction`; this is the behavioral
//! configuration: window sizes, character budgets, and generation batch
//! sizes. All fields have defaults so an empty file (or no file) is valid.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Behavioral configuration shared across the pipeline.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SageConfig {
    /// Number of recent turns handed to the shift classifier.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Maximum number of notebook characters forwarded to synthesis.
    #[serde(default = "default_notebook_max_chars")]
    pub notebook_max_chars: usize,
    /// Flashcards requested per enrichment batch.
    #[serde(default = "default_enrichment_flashcards")]
    pub enrichment_flashcards: usize,
    /// Quiz items requested per enrichment batch.
    #[serde(default = "default_enrichment_quizzes")]
    pub enrichment_quizzes: usize,
    /// Capacity of the enrichment job queue.
    #[serde(default = "default_enrichment_queue_capacity")]
    pub enrichment_queue_capacity: usize,
}

fn default_history_window() -> usize {
    4
}

fn default_notebook_max_chars() -> usize {
    4000
}

fn default_enrichment_flashcards() -> usize {
    3
}

fn default_enrichment_quizzes() -> usize {
    3
}

fn default_enrichment_queue_capacity() -> usize {
    16
}

impl Default for SageConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            notebook_max_chars: default_notebook_max_chars(),
            enrichment_flashcards: default_enrichment_flashcards(),
            enrichment_quizzes: default_enrichment_quizzes(),
            enrichment_queue_capacity: default_enrichment_queue_capacity(),
        }
    }
}

impl SageConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let cfg = SageConfig::default();
        assert!(cfg.history_window >= 3 && cfg.history_window <= 5);
        assert!(cfg.notebook_max_chars > 0);
        assert!(cfg.enrichment_queue_capacity > 0);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history_window = 5").unwrap();

        let cfg = SageConfig::load(file.path()).unwrap();
        assert_eq!(cfg.history_window, 5);
        assert_eq!(cfg.notebook_max_chars, default_notebook_max_chars());
    }
}
