//! End-to-end daily review runs against the in-memory store.

mod common;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::Map;

use hearth_engine::review::{ReviewConfig, ReviewReport, run_daily_review};
use hearth_store::Record;

use common::{
    ACTIVE_DB, FakeStore, active_schema, date_value, rich_text_value, select_value, status_value,
    title_value,
};

fn config() -> ReviewConfig {
    ReviewConfig {
        active_db: ACTIVE_DB.to_string(),
    }
}

fn store() -> FakeStore {
    let store = FakeStore::new();
    store.add_database(ACTIVE_DB, active_schema());
    store
}

/// Wednesday March 12; the next late-week date is Friday March 14.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
}

struct TaskSpec<'a> {
    id: &'a str,
    name: &'a str,
    category: Option<&'a str>,
    planned: Option<&'a str>,
    status: (&'a str, &'a str),
    template_id: Option<&'a str>,
}

impl Default for TaskSpec<'_> {
    fn default() -> Self {
        Self {
            id: "task-1",
            name: "Fix the gate",
            category: Some("Random/Monday"),
            planned: Some("2025-03-14"),
            status: ("st-not-started", "Not Started"),
            template_id: None,
        }
    }
}

fn seed(store: &FakeStore, spec: TaskSpec<'_>) {
    let mut properties = Map::new();
    properties.insert("Task".to_string(), title_value(spec.name));
    properties.insert("Status".to_string(), status_value(spec.status.0, spec.status.1));
    if let Some(category) = spec.category {
        properties.insert("Category".to_string(), select_value(category));
    }
    if let Some(planned) = spec.planned {
        properties.insert("Planned Date".to_string(), date_value(planned));
    }
    if let Some(template_id) = spec.template_id {
        properties.insert("TemplateId".to_string(), rich_text_value(template_id));
    }
    store.seed_record(
        ACTIVE_DB,
        Record {
            id: spec.id.to_string(),
            properties,
        },
    );
}

fn planned_date(store: &FakeStore, id: &str) -> Option<String> {
    store
        .record(id)
        .unwrap()
        .properties
        .get("Planned Date")
        .and_then(|raw| raw.pointer("/date/start"))
        .and_then(|start| start.as_str().map(str::to_string))
}

#[tokio::test]
async fn missing_planned_date_lands_on_the_next_late_week_day() {
    let store = store();
    seed(&store, TaskSpec {
        id: "task-dateless",
        planned: None,
        status: ("st-in-progress", "In Progress"),
        ..TaskSpec::default()
    });

    let report = run_daily_review(&store, &config(), today()).await.unwrap();
    assert_eq!(report.missing_date.found, 1);
    assert_eq!(report.missing_date.updated, 1);
    assert_eq!(planned_date(&store, "task-dateless").as_deref(), Some("2025-03-14"));
}

#[tokio::test]
async fn missing_category_gets_the_catch_all_slot() {
    let store = store();
    seed(&store, TaskSpec {
        id: "task-homeless",
        category: None,
        ..TaskSpec::default()
    });

    let report = run_daily_review(&store, &config(), today()).await.unwrap();
    assert_eq!(report.missing_category.updated, 1);

    let record = store.record("task-homeless").unwrap();
    assert_eq!(
        record.properties["Category"].pointer("/select/name").unwrap(),
        "Random/Monday"
    );
    // the planned date was present and stays untouched
    assert_eq!(planned_date(&store, "task-homeless").as_deref(), Some("2025-03-14"));
}

#[tokio::test]
async fn overdue_tasks_are_rescheduled() {
    let store = store();
    seed(&store, TaskSpec {
        id: "task-overdue",
        planned: Some("2025-03-05"),
        ..TaskSpec::default()
    });
    // due today is not overdue
    seed(&store, TaskSpec {
        id: "task-today",
        planned: Some("2025-03-12"),
        ..TaskSpec::default()
    });

    let report = run_daily_review(&store, &config(), today()).await.unwrap();
    assert_eq!(report.overdue.found, 1);
    assert_eq!(report.overdue.updated, 1);
    assert_eq!(planned_date(&store, "task-overdue").as_deref(), Some("2025-03-14"));
    assert_eq!(planned_date(&store, "task-today").as_deref(), Some("2025-03-12"));
}

#[tokio::test]
async fn complete_and_template_rows_are_left_alone() {
    let store = store();
    seed(&store, TaskSpec {
        id: "task-done",
        planned: Some("2025-03-01"),
        status: ("st-done", "Done"),
        ..TaskSpec::default()
    });
    seed(&store, TaskSpec {
        id: "task-instance",
        planned: None,
        template_id: Some("tpl-vacuum"),
        ..TaskSpec::default()
    });

    let report = run_daily_review(&store, &config(), today()).await.unwrap();
    assert_eq!(report, ReviewReport::default());
    assert_eq!(planned_date(&store, "task-done").as_deref(), Some("2025-03-01"));
    assert_eq!(planned_date(&store, "task-instance"), None);
}

#[tokio::test]
async fn one_failing_update_does_not_abort_the_scan() {
    let store = store();
    for id in ["task-a", "task-b", "task-c"] {
        seed(&store, TaskSpec {
            id,
            planned: Some("2025-03-05"),
            ..TaskSpec::default()
        });
    }
    store.fail_updates_for("task-b");

    let report = run_daily_review(&store, &config(), today()).await.unwrap();
    assert_eq!(report.overdue.found, 3);
    assert_eq!(report.overdue.updated, 2);
    assert_eq!(planned_date(&store, "task-a").as_deref(), Some("2025-03-14"));
    assert_eq!(planned_date(&store, "task-b").as_deref(), Some("2025-03-05"));
    assert_eq!(planned_date(&store, "task-c").as_deref(), Some("2025-03-14"));
    assert_eq!(report.total_updated(), 2);
}
