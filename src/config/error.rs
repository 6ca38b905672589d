//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `top_k` must request at least one result.
    #[error("invalid top_k '{value}': must be at least 1")]
    InvalidTopK { value: String },

    /// `top_k` string could not be parsed as a number.
    #[error("failed to parse top_k '{value}': {source}")]
    TopKParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Specified path does not exist on the filesystem.
    #[error("{asset} does not exist: {path}")]
    PathNotFound { asset: &'static str, path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("{asset} is not a file: {path}")]
    NotAFile { asset: &'static str, path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("{asset} is not a directory: {path}")]
    NotADirectory { asset: &'static str, path: PathBuf },
}
