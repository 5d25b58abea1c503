//! # hearth-engine
//!
//! The scheduling core of Hearth: decides which task instances a week
//! needs, materializes them, and keeps templates and stray tasks honest.
//!
//! - [`adapter`] — normalizes store records to flat values and builds write
//!   payloads; computes option-set sync patches between schemas
//! - [`recurrence`] — the unified due-check and work-week enumeration
//! - [`rollover`] — the weekly batch run creating next week's instances
//! - [`review`] — the daily scan backfilling dates/categories and
//!   rescheduling overdue tasks
//! - [`summary`] — the optional completion-note summarizer boundary
//!
//! Everything is generic over [`hearth_store::DocumentStore`]; the engine
//! never constructs an HTTP client of its own except for the summarizer
//! collaborator.

pub mod adapter;
pub mod error;
pub mod recurrence;
pub mod review;
pub mod rollover;
pub mod summary;

pub use error::EngineError;
pub use recurrence::Reference;
pub use review::{ReviewConfig, ReviewReport, run_daily_review};
pub use rollover::{RolloverConfig, RolloverReport, run_weekly_rollover};
pub use summary::{LlmSummarizer, NoSummarizer, NoteSummarizer};

/// Property names shared by the template and active databases.
///
/// These are store-side display names edited by humans; changes there must
/// be mirrored here.
pub mod props {
    pub const TASK: &str = "Task";
    pub const FREQUENCY: &str = "Frequency";
    pub const CATEGORY: &str = "Category";
    pub const PRIORITY: &str = "Priority";
    pub const DOCUMENTATION: &str = "Documentation";
    pub const LAST_COMPLETED: &str = "Last Completed";
    pub const TEMPLATE_ID: &str = "TemplateId";
    pub const PLANNED_DATE: &str = "Planned Date";
    pub const STATUS: &str = "Status";
    pub const COMPLETED_DATE: &str = "Completed Date";
    pub const CREATION_DATE: &str = "CreationDate";
}
