//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the rollover and review jobs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Document-store call failed (after the client's own retries).
    #[error(transparent)]
    Store(#[from] hearth_store::StoreError),

    /// A record's data could not be normalized.
    #[error(transparent)]
    Core(#[from] hearth_core::CoreError),
}
