//! Proactive call spacing.
//!
//! One throttle instance is shared by every call a client issues, enforcing
//! a minimum delay between consecutive requests so a run stays under the
//! store's rate limit instead of relying on 429 recovery.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Throttle {
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::const_new(None),
        }
    }

    /// Sleep just long enough to keep `min_interval` between calls, then
    /// stamp the current instant. Holding the lock across the sleep is
    /// intentional: it serializes concurrent callers onto the same spacing.
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
