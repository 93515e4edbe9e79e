//! Error types for the SAGE tutoring engine.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// A shared error type for the whole SAGE workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The variants mirror the
/// turn-level failure taxonomy: only `Synthesis` is ever surfaced to the
/// caller of a turn; everything else degrades gracefully inside the pipeline.
#[derive(Error, Debug, Clone, Serialize)]
pub enum SageError {
    /// Topic-shift classification call failed (recoverable, falls back to "no shift")
    #[error("Classification error: {0}")]
    Classification(String),

    /// Child context producer (research / notebook) call failed (recoverable)
    #[error("Producer error: {producer}: {message}")]
    Producer {
        producer: &'static str,
        message: String,
    },

    /// Conversation engine call failed (fatal to the turn)
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Supplementary materials generation failed (suppressed, logged only)
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error when talking to an inference backend
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status code, when the backend returned one.
        status_code: Option<u16>,
        message: String,
        /// Whether retrying the same request may succeed.
        is_retryable: bool,
        /// Backend-requested delay before retrying, when provided.
        retry_after: Option<Duration>,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SageError {
    /// Creates a Classification error
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification(message.into())
    }

    /// Creates a Producer error
    pub fn producer(producer: &'static str, message: impl Into<String>) -> Self {
        Self::Producer {
            producer,
            message: message.into(),
        }
    }

    /// Creates a Synthesis error
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis(message.into())
    }

    /// Creates an Enrichment error
    pub fn enrichment(message: impl Into<String>) -> Self {
        Self::Enrichment(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a non-HTTP Transport error (connection failures, malformed
    /// or empty responses). Not retryable.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status_code: None,
            message: message.into(),
            is_retryable: false,
            retry_after: None,
        }
    }

    /// Creates a Transport error carrying an HTTP status verdict.
    pub fn transport_http(
        status_code: u16,
        message: impl Into<String>,
        is_retryable: bool,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::Transport {
            status_code: Some(status_code),
            message: message.into(),
            is_retryable,
            retry_after,
        }
    }

    /// Check if this is a Synthesis error.
    ///
    /// Synthesis failures are the only ones that cross the turn boundary;
    /// callers use this to distinguish a failed turn from a degraded one.
    pub fn is_synthesis(&self) -> bool {
        matches!(self, Self::Synthesis(_))
    }

    /// Check if this error is recoverable within a turn.
    ///
    /// Classification and producer failures have defined fallbacks and never
    /// fail the user-visible turn.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Classification(_) | Self::Producer { .. } | Self::Enrichment(_)
        )
    }

    /// Check if retrying the same call may succeed.
    ///
    /// Only set on transport errors whose HTTP status (or connection
    /// failure mode) indicates a transient condition.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                is_retryable: true,
                ..
            }
        )
    }

    /// The backend-requested retry delay, if the response carried one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Transport { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<std::io::Error> for SageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SageError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status_code: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            is_retryable: err.is_connect() || err.is_timeout(),
            retry_after: None,
        }
    }
}

/// Conversion from anyhow::Error (transitional at application seams)
impl From<anyhow::Error> for SageError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, SageError>`.
pub type Result<T> = std::result::Result<T, SageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_http_carries_the_retry_verdict() {
        let err = SageError::transport_http(
            429,
            "rate limited",
            true,
            Some(Duration::from_secs(30)),
        );
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn plain_transport_is_not_retryable() {
        let err = SageError::transport("connection refused");
        assert!(!err.is_retryable());
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn non_transport_errors_have_no_retry_semantics() {
        assert!(!SageError::synthesis("model down").is_retryable());
        assert_eq!(SageError::classification("timeout").retry_after(), None);
    }
}
