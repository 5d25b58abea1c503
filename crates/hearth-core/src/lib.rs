//! # hearth-core
//!
//! Core domain types for Hearth, the home task automation layer.
//!
//! This crate provides the types shared across all Hearth crates:
//! - Template and active-task views over document-store records
//! - The `Frequency` recurrence enum and the fixed work-week slots
//! - The `PropertyKind` tagged union replacing stringly-typed schema dispatch
//! - UTC timestamp normalization for store date values
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod time;

pub use entities::{ActiveTask, StatusValue, TemplateTask};
pub use enums::{Frequency, PropertyKind, WeekSlot};
pub use errors::CoreError;
