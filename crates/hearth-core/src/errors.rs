//! Cross-cutting error types for Hearth.
//!
//! Domain-specific errors (`StoreError`, `ConfigError`, `EngineError`) live
//! in their respective crates; everything converges on `anyhow` in the CLI.

use thiserror::Error;

/// Errors that can be raised by any Hearth crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record is missing a property the operation requires.
    #[error("missing required property: {0}")]
    MissingProperty(String),

    /// A store date value could not be normalized to UTC.
    #[error("invalid date value: {0}")]
    InvalidDate(String),

    /// Data failed validation (schema, format, constraints).
    #[error("validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
