//! Error types for the index fetcher

use thiserror::Error;

/// Result type alias for fetcher operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur outside of a single grid download.
///
/// Per-grid failures are reported as [`crate::FetchOutcome`] values instead.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level HTTP errors (DNS, connection refused, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors (output directory, file writes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completed-grid ledger could not be read or parsed
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl FetchError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new ledger error
    pub fn ledger(msg: impl Into<String>) -> Self {
        Self::Ledger(msg.into())
    }
}

impl From<config::ConfigError> for FetchError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
