//! The daily review: keep manually-entered tasks schedulable.
//!
//! Humans add tasks straight to the active database with fields missing, and
//! planned dates drift into the past. Three scans patch the strays: missing
//! planned dates and overdue tasks land on the next late-week date, missing
//! categories get the catch-all slot. Template-created instances carry a
//! back-reference and are excluded; so is anything already complete.

use chrono::NaiveDate;

use hearth_core::{PropertyKind, WeekSlot};
use hearth_store::{DocumentStore, Filter, Record, Schema};

use crate::adapter::build_value;
use crate::error::EngineError;
use crate::props;
use crate::recurrence::next_late_week_date;

/// Database id a review run operates on.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub active_db: String,
}

/// Found/updated counters for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounts {
    pub found: usize,
    pub updated: usize,
}

/// What one review run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewReport {
    pub missing_date: ScanCounts,
    pub missing_category: ScanCounts,
    pub overdue: ScanCounts,
}

impl ReviewReport {
    #[must_use]
    pub const fn total_updated(&self) -> usize {
        self.missing_date.updated + self.missing_category.updated + self.overdue.updated
    }
}

/// Run the three review scans for `today`.
///
/// # Errors
///
/// Fails on store errors fetching the schema or a scan's record list.
/// Per-record update failures are logged and counted, never fatal.
pub async fn run_daily_review<S: DocumentStore>(
    store: &S,
    config: &ReviewConfig,
    today: NaiveDate,
) -> Result<ReviewReport, EngineError> {
    tracing::info!(%today, "starting daily review");

    let schema = store.retrieve_schema(&config.active_db).await?;
    let reschedule_date = next_late_week_date(today);

    let mut report = ReviewReport::default();

    let date_patch = [(
        props::PLANNED_DATE,
        build_value(&PropertyKind::Date, Some(&reschedule_date.to_string())),
    )];
    let category_patch = [(
        props::CATEGORY,
        build_value(&PropertyKind::Select, Some(WeekSlot::Monday.category())),
    )];

    report.missing_date = run_scan(
        store,
        config,
        "missing planned date",
        base_filter(&schema).date_is_empty(props::PLANNED_DATE),
        &date_patch,
    )
    .await?;

    report.missing_category = run_scan(
        store,
        config,
        "missing category",
        base_filter(&schema).select_is_empty(props::CATEGORY),
        &category_patch,
    )
    .await?;

    report.overdue = run_scan(
        store,
        config,
        "overdue",
        base_filter(&schema).date_before(props::PLANNED_DATE, today),
        &date_patch,
    )
    .await?;

    tracing::info!(
        missing_date = report.missing_date.updated,
        missing_category = report.missing_category.updated,
        overdue = report.overdue.updated,
        total = report.total_updated(),
        "review done"
    );
    Ok(report)
}

/// Conditions shared by every scan: not a template instance, not complete.
///
/// Either condition is dropped when the schema cannot express it; the scan
/// then covers more rows rather than none.
fn base_filter(schema: &Schema) -> Filter {
    let mut filter = Filter::new();

    if schema.contains_key(props::TEMPLATE_ID) {
        filter = filter.rich_text_is_empty(props::TEMPLATE_ID);
    }

    match schema.get(props::STATUS) {
        Some(descriptor) => {
            let complete_ids = descriptor.complete_option_ids();
            let open_names: Vec<String> = descriptor
                .options
                .iter()
                .filter(|option| {
                    option
                        .id
                        .as_deref()
                        .is_none_or(|id| !complete_ids.contains(id))
                })
                .map(|option| option.name.clone())
                .collect();
            if !open_names.is_empty() {
                filter = filter.status_any_of(props::STATUS, &open_names);
            }
        }
        None => tracing::warn!("active schema has no status property, reviewing all rows"),
    }

    filter
}

async fn run_scan<S: DocumentStore>(
    store: &S,
    config: &ReviewConfig,
    scan: &str,
    filter: Filter,
    patch: &[(&str, serde_json::Value)],
) -> Result<ScanCounts, EngineError> {
    let records = store.query_all(&config.active_db, Some(&filter)).await?;
    let mut counts = ScanCounts {
        found: records.len(),
        updated: 0,
    };

    for record in &records {
        let properties = patch
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect();
        match store.update_record(&record.id, properties).await {
            Ok(_) => {
                counts.updated += 1;
                tracing::debug!(record_id = %record.id, task = %record_label(record), scan, "patched task");
            }
            Err(error) => {
                tracing::warn!(record_id = %record.id, scan, %error, "could not patch task, continuing");
            }
        }
    }

    if counts.found > 0 {
        tracing::info!(scan, found = counts.found, updated = counts.updated, "scan finished");
    }
    Ok(counts)
}

fn record_label(record: &Record) -> String {
    record
        .properties
        .get(props::TASK)
        .and_then(|raw| raw.get("title"))
        .and_then(|title| title.get(0))
        .and_then(|segment| segment.get("plain_text"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Unknown Task")
        .to_string()
}
