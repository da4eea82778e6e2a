//! Error types for fetching and summarizing samples.

use thiserror::Error;

/// Errors that can occur while fetching samples from a source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Body was not a JSON array of samples.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A sample carried a time string that is not a timestamp.
    #[error("Invalid timestamp {0:?}")]
    Timestamp(String),

    /// Reading a local sample file failed.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Statistics were requested for a series with no samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no samples in range")]
pub struct EmptySeriesError;
