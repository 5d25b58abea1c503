//! Domain views over document-store records.
//!
//! These are the flat shapes the engine works with after the schema adapter
//! has normalized a record's heterogeneous property payloads. The store
//! remains the system of record; nothing here persists locally.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Frequency;

/// A recurring chore definition.
///
/// Created and edited by a human in the store. The rollover only ever writes
/// `last_completed` back, and only with a strictly later completion, so the
/// field is monotonically non-decreasing across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateTask {
    /// Opaque store record id.
    pub id: String,
    /// Task name (title property).
    pub name: Option<String>,
    /// Raw frequency select label as stored.
    pub frequency: Option<String>,
    /// Category label; meaningful for non-pattern frequencies only.
    pub category: Option<String>,
    pub priority: Option<String>,
    pub documentation: Option<String>,
    /// Latest completion of any instance of this template, UTC-normalized.
    pub last_completed: Option<DateTime<Utc>>,
}

impl TemplateTask {
    /// Parsed recurrence cadence; `None` for unrecognized labels, which the
    /// engine treats as always due.
    #[must_use]
    pub fn parsed_frequency(&self) -> Option<Frequency> {
        self.frequency.as_deref().and_then(Frequency::from_name)
    }

    /// Display name with a fallback for untitled templates.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Task")
    }
}

/// A status property value on an instance record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusValue {
    /// Store-assigned option id, used for Complete-group membership.
    pub id: Option<String>,
    /// Option display name.
    pub name: Option<String>,
}

/// One materialized occurrence of a template for a specific planned date.
///
/// Created by the rollover; completed by a human in the store; never deleted
/// by this system. `template_id` is a plain-text back-reference compared by
/// exact string equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTask {
    pub id: String,
    pub template_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub planned_date: Option<NaiveDate>,
    pub status: Option<StatusValue>,
    /// Populated externally when the status enters the Complete group.
    pub completed_date: Option<DateTime<Utc>>,
}

impl ActiveTask {
    /// Whether this row is a template-spawned instance (as opposed to a
    /// manually created backlog item).
    #[must_use]
    pub fn is_instance(&self) -> bool {
        self.template_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Task")
    }
}
