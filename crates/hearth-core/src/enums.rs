//! Recurrence frequencies, property kinds, and work-week slots.
//!
//! `Frequency` and `WeekSlot` carry the store-visible labels in their
//! `as_str`/`category` accessors; parsing is by exact label match because the
//! labels live in a select property humans edit.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// Recurrence cadence of a template task.
///
/// Stored as a select option on the template database. `TwoDay` is the fixed
/// two-day-per-week pattern, labeled `Monday/Friday` in the store. Labels
/// that parse to no variant are treated as always-due by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    TwoDay,
}

impl Frequency {
    /// Parse the store's select label. Returns `None` for unrecognized labels.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Daily" => Some(Self::Daily),
            "Weekly" => Some(Self::Weekly),
            "Monthly" => Some(Self::Monthly),
            "Quarterly" => Some(Self::Quarterly),
            "Yearly" => Some(Self::Yearly),
            "Monday/Friday" => Some(Self::TwoDay),
            _ => None,
        }
    }

    /// The label as it appears in the store's select options.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
            Self::TwoDay => "Monday/Friday",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PropertyKind
// ---------------------------------------------------------------------------

/// Declared type of a document-store property.
///
/// The store reports property types as strings; this tagged union gives each
/// one an explicit conversion path in the schema adapter instead of runtime
/// string dispatch. Types the adapter has no special handling for land in
/// `Other` and pass their raw value through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyKind {
    Title,
    RichText,
    Select,
    Status,
    Date,
    Url,
    Other(String),
}

impl PropertyKind {
    /// Parse the store's type name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "title" => Self::Title,
            "rich_text" => Self::RichText,
            "select" => Self::Select,
            "status" => Self::Status,
            "date" => Self::Date,
            "url" => Self::Url,
            other => Self::Other(other.to_string()),
        }
    }

    /// The store's type name, used as the key under which values nest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Select => "select",
            Self::Status => "status",
            Self::Date => "date",
            Self::Url => "url",
            Self::Other(name) => name,
        }
    }

    /// Whether this kind carries a declared option set.
    #[must_use]
    pub const fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Status)
    }
}

impl From<String> for PropertyKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<PropertyKind> for String {
    fn from(kind: PropertyKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WeekSlot
// ---------------------------------------------------------------------------

/// The three fixed work-week slots the rollover plans into.
///
/// Each slot pairs a category label with an offset from the week's Monday.
/// The two-day pattern uses the Monday and Friday slots; the late-week slot
/// (Friday) is also the daily reviewer's reschedule target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekSlot {
    Monday,
    Tuesday,
    Friday,
}

impl WeekSlot {
    /// All slots in week order.
    pub const ALL: [Self; 3] = [Self::Monday, Self::Tuesday, Self::Friday];

    /// The two slots of the fixed two-day pattern.
    pub const TWO_DAY: [Self; 2] = [Self::Monday, Self::Friday];

    /// The end-of-week slot used for rescheduling stray tasks.
    pub const LATE_WEEK: Self = Self::Friday;

    /// Category label attached to instances planned into this slot.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Monday => "Random/Monday",
            Self::Tuesday => "Cooking/Tuesday",
            Self::Friday => "Cleaning/Friday",
        }
    }

    /// Days after the week's Monday this slot falls on.
    #[must_use]
    pub const fn offset_from_monday(self) -> u64 {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Friday => 4,
        }
    }

    /// Calendar weekday this slot falls on.
    #[must_use]
    pub const fn weekday(self) -> chrono::Weekday {
        match self {
            Self::Monday => chrono::Weekday::Mon,
            Self::Tuesday => chrono::Weekday::Tue,
            Self::Friday => chrono::Weekday::Fri,
        }
    }

    /// Reverse lookup from a category label.
    #[must_use]
    pub fn from_category(category: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.category() == category)
    }
}

impl fmt::Display for WeekSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}
