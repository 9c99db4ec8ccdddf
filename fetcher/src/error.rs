//! Error types for suggestion fetching.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while fetching suggestions.
///
/// Transport and protocol failures are retried identically by the
/// [`RetryingFetcher`](crate::RetryingFetcher); none of them ever crosses
/// the engine's upward interface.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (timeout, connection refused, ...).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status string.
    #[error("remote service returned status {0:?}")]
    Protocol(String),

    /// The response body did not match the expected payload shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Response body was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
