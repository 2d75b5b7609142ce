//! Core error types for clockout-core.
//!
//! The decision path itself never fails: collaborators that return these
//! errors are logged and degraded by the engine. They surface to the caller
//! only from explicit storage and configuration operations, and from the
//! CLI commands built on them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for clockout-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration and settings storage errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Holiday feed errors
    #[error("Holiday error: {0}")]
    Holiday(#[from] HolidayError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors, shared by `settings.toml` and `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the schema
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// In-process store left unusable by a panicking writer
    #[error("settings store poisoned")]
    StorePoisoned,
}

/// Holiday feed errors.
#[derive(Error, Debug)]
pub enum HolidayError {
    /// Transport-level failure or undecodable body
    #[error("holiday fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("holiday fetch for {year} returned status {status}")]
    Status { year: i32, status: u16 },

    /// Base URL could not be parsed
    #[error("invalid holiday feed URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Any other source-specific failure
    #[error("holiday source unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_and_keeps_message() {
        let err: CoreError = ConfigError::UnknownKey("bogus".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(err.to_string(), "Configuration error: unknown config key: bogus");
    }

    #[test]
    fn holiday_status_error_message() {
        let err: CoreError = HolidayError::Status {
            year: 2024,
            status: 503,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Holiday error: holiday fetch for 2024 returned status 503"
        );
    }
}
