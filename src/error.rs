//! Error types for bout analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running an analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A configuration value is missing, zero where a divisor is needed, or non-finite
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A trial table could not be read from disk
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A trial table does not have the expected overall shape
    #[error("Malformed table {path:?}: {reason}")]
    MalformedTable { path: PathBuf, reason: String },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
