//! Error types for npm-downloads.
//!
//! Recoverable failures (HTTP 429, transport errors) are consumed inside the
//! fetch retry loop and never reach these types; everything here is either a
//! startup problem or fatal for the run.

use thiserror::Error;

/// Result type alias for npm-downloads operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for npm-downloads.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "concurrency_limit")
        key: Option<String>,
    },

    /// I/O error (dump reading, checkpoint appending)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error outside the retryable classes (client construction,
    /// malformed response body)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The registry answered with a status the retry policy does not cover
    #[error("unexpected status {status} fetching downloads for {package}")]
    UnexpectedStatus {
        /// The package (or comma-joined group) the request was for
        package: String,
        /// The HTTP status code received
        status: u16,
    },

    /// A bulk request was attempted with more names than the API permits.
    /// Caller programming error; the group is never silently truncated.
    #[error("bulk request of {len} names exceeds the per-request limit of {limit}")]
    BatchTooLarge {
        /// Number of names in the offending group
        len: usize,
        /// The configured per-request cap
        limit: usize,
    },
}

impl Error {
    /// Shorthand for a [`Error::Config`] with a key.
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
