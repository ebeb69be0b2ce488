//! # Error Taxonomy
//!
//! Every fallible library operation returns [`MoodifyError`]. The four variants
//! map one-to-one onto how the orchestrator reacts:
//!
//! - [`MoodifyError::InvalidInput`] - reported to the user, turn discarded
//! - [`MoodifyError::Upstream`] - degrade to a fallback mood or an empty list
//! - [`MoodifyError::Persistence`] - logged, current reply unaffected
//! - [`MoodifyError::Configuration`] - fatal at startup

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoodifyError {
    /// Empty or malformed user text.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An external API was unreachable, timed out or answered with an error.
    #[error("Upstream service '{service}' failed: {message}")]
    Upstream { service: String, message: String },

    /// The history store could not be written or read.
    #[error("History store error: {0}")]
    Persistence(String),

    /// Missing or malformed startup configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MoodifyError {
    pub fn upstream(service: &str, message: impl ToString) -> Self {
        Self::Upstream {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    /// True for failures the pipeline is allowed to degrade around.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}

impl From<rusqlite::Error> for MoodifyError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

/// Transport failures (connect, timeout, body read) name the host they hit.
impl From<reqwest::Error> for MoodifyError {
    fn from(e: reqwest::Error) -> Self {
        let service = e
            .url()
            .and_then(|url| url.host_str())
            .unwrap_or("http")
            .to_string();
        let message = if e.is_timeout() {
            format!("Request timed out: {e}")
        } else {
            format!("Request failed: {e}")
        };
        Self::Upstream { service, message }
    }
}

/// Only the history store encodes JSON of its own; API bodies are parsed
/// with an explicit `Upstream` mapping.
impl From<serde_json::Error> for MoodifyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Persistence(format!("Bad history JSON: {e}"))
    }
}

pub type MoodifyResult<T> = Result<T, MoodifyError>;
