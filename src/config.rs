//! # Configuration Module
//!
//! Startup configuration for Moodify. Everything is read once, from the
//! environment (a `.env` file in the working directory is loaded first by
//! `main`), into a [`Config`] that is then handed to the adapters.
//!
//! ## Data Storage
//!
//! Unless `MOODIFY_DB_PATH` says otherwise, history lives in the
//! platform-standard data directory:
//! - Linux: `~/.local/share/moodify/history.db`
//! - macOS: `~/Library/Application Support/moodify/history.db`
//! - Windows: `%APPDATA%\moodify\history.db`
//!
//! ## Variables
//!
//! | Variable | Default |
//! |---|---|
//! | `GEMINI_API_KEY` | required |
//! | `GEMINI_MODEL` | `gemini-2.0-flash` |
//! | `GEMINI_API_BASE` | `https://generativelanguage.googleapis.com` |
//! | `SAAVN_API_BASE` | `https://saavn.dev/api` |
//! | `MOODIFY_DB_PATH` | platform data dir |
//! | `MOODIFY_TIMEOUT_SECS` | `10` |
//! | `MOODIFY_RECOMMENDATION_LIMIT` | `6` |
//! | `MOODIFY_FALLBACK_MOOD` | `Neutral` |
//! | `MOODIFY_COMPANION` | `true` |

use crate::error::{MoodifyError, MoodifyResult};
use crate::mood::MoodLabel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SAAVN_API_BASE: &str = "https://saavn.dev/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 6;

/// Returns the platform-appropriate data directory for Moodify, creating it
/// if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The moodify subdirectory cannot be created due to permissions
pub fn get_data_dir() -> MoodifyResult<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        MoodifyError::Configuration(
            "Could not determine system data directory. Set MOODIFY_DB_PATH instead.".to_string(),
        )
    })?;

    let moodify_dir = data_dir.join("moodify");
    fs::create_dir_all(&moodify_dir).map_err(|e| {
        MoodifyError::Configuration(format!(
            "Failed to create Moodify data directory at {}: {e}",
            moodify_dir.display()
        ))
    })?;

    Ok(moodify_dir)
}

/// Returns the default history database path inside [`get_data_dir`].
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_db_path() -> MoodifyResult<PathBuf> {
    Ok(get_data_dir()?.join("history.db"))
}

/// Everything the pipeline needs, built once at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing)]
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub saavn_api_base: String,
    pub db_path: PathBuf,
    pub request_timeout_secs: u64,
    /// Cap applied to each recommendation source.
    pub recommendation_limit: usize,
    /// Used when the model's reply is not a known label, and when the
    /// classifier cannot be reached at all.
    pub fallback_mood: MoodLabel,
    /// Whether to ask the model for a conversational reply each turn.
    pub companion: bool,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`MoodifyError::Configuration`] when `GEMINI_API_KEY` is missing
    /// or a variable holds a malformed value.
    pub fn from_env() -> MoodifyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> MoodifyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gemini_api_key = get("GEMINI_API_KEY").ok_or_else(|| {
            MoodifyError::Configuration("GEMINI_API_KEY not found in environment variables".to_string())
        })?;

        let db_path = match get("MOODIFY_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => get_db_path()?,
        };

        Self {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            saavn_api_base: get("SAAVN_API_BASE").unwrap_or_else(|| DEFAULT_SAAVN_API_BASE.to_string()),
            db_path,
            request_timeout_secs: parse_var("MOODIFY_TIMEOUT_SECS", get("MOODIFY_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?,
            recommendation_limit: parse_var(
                "MOODIFY_RECOMMENDATION_LIMIT",
                get("MOODIFY_RECOMMENDATION_LIMIT"),
                DEFAULT_RECOMMENDATION_LIMIT,
            )?,
            fallback_mood: parse_var("MOODIFY_FALLBACK_MOOD", get("MOODIFY_FALLBACK_MOOD"), MoodLabel::Neutral)?,
            companion: parse_flag("MOODIFY_COMPANION", get("MOODIFY_COMPANION"), true)?,
        }
        .validated()
    }

    /// Replace the history database location.
    #[must_use]
    pub fn with_db_path(mut self, db_path: PathBuf) -> Self {
        self.db_path = db_path;
        self
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validated(self) -> MoodifyResult<Self> {
        if self.request_timeout_secs == 0 {
            return Err(MoodifyError::Configuration(
                "MOODIFY_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        if self.recommendation_limit == 0 {
            return Err(MoodifyError::Configuration(
                "MOODIFY_RECOMMENDATION_LIMIT must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("saavn_api_base", &self.saavn_api_base)
            .field("db_path", &self.db_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("recommendation_limit", &self.recommendation_limit)
            .field("fallback_mood", &self.fallback_mood)
            .field("companion", &self.companion)
            .finish()
    }
}

fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> MoodifyResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| MoodifyError::Configuration(format!("{key}={raw:?} is invalid: {e}"))),
    }
}

fn parse_flag(key: &str, raw: Option<String>, default: bool) -> MoodifyResult<bool> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(MoodifyError::Configuration(format!(
            "{key}={other:?} is invalid: expected true or false"
        ))),
    }
}
