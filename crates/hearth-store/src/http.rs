//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`StoreError::Api`]) so the client stays focused
//! on request construction and response mapping.

use crate::error::StoreError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`StoreError::RateLimited`] with
///   `Retry-After` header parsing (`None` if absent or unparseable).
/// - **Non-success status** → [`StoreError::Api`] with status code and
///   response body.
///
/// # Errors
///
/// As described above.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if resp.status() == 429 {
        return Err(StoreError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(StoreError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds.
fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}
