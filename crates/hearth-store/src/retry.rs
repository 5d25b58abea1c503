//! Rate-limit retry policy.
//!
//! The store throttles at roughly 3 requests/second and answers bursts with
//! 429. Calls back off exponentially up to a bounded attempt count; the
//! `Retry-After` header, when present, takes precedence over the computed
//! delay (capped at `max_delay` either way).

use std::time::Duration;

/// Configuration for retry behavior on 429 responses.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based), given an optional
    /// server-provided `Retry-After` value in seconds.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let backoff = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)));
        let chosen = retry_after_secs.map_or(backoff, Duration::from_secs);
        chosen.min(self.max_delay)
    }
}
