//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the store.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a store response.
    #[error("parse error: {0}")]
    Parse(String),

    /// 429 Too Many Requests, surfaced after the retry budget is exhausted.
    #[error("rate limited by the document store")]
    RateLimited {
        /// Seconds the store asked us to wait, when it said.
        retry_after_secs: Option<u64>,
    },
}
