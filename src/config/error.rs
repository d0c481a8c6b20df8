//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Timeout must be a positive number of seconds.
    #[error("invalid timeout '{value}': must be greater than 0")]
    InvalidTimeout { value: String },

    /// Timeout string could not be parsed as a number.
    #[error("failed to parse timeout '{value}': {source}")]
    TimeoutParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Served endpoint is not an http(s) URL.
    #[error("invalid served URL '{value}': expected http:// or https://")]
    InvalidUrl { value: String },

    #[error("model name cannot be empty")]
    EmptyModelName,

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
