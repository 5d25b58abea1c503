//! Schema adapter: store records ⇄ flat values.
//!
//! Records arrive with heterogeneous property payloads nested under their
//! type name; `extract` flattens them to [`FlatValue`]s, and the build
//! functions produce the type-appropriate write payloads going the other
//! way. Date payloads pass through unreformatted — the store owns their
//! shape.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use hearth_core::{ActiveTask, CoreError, PropertyKind, StatusValue, TemplateTask, time};
use hearth_store::{PropertyDescriptor, Record, Schema, SelectOption};

use crate::props;

/// Fallback status label when a schema declares no options at all.
const DEFAULT_STATUS_LABEL: &str = "Not Started";

/// Status names treated as the "not started" default, lowercase.
const NOT_STARTED_NAMES: [&str; 3] = ["not started", "todo", "to do"];

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// A property value normalized out of its wire nesting.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Null,
    /// Title, rich-text, select, and url values flatten to plain text.
    Text(String),
    /// Date values keep the store's `{start, end?}` shape.
    Date {
        start: String,
        end: Option<String>,
    },
    /// Status values keep both option id and name.
    Status(StatusValue),
    /// Anything the adapter has no mapping for passes through raw.
    Raw(Value),
}

impl FlatValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn date_start(&self) -> Option<&str> {
        match self {
            Self::Date { start, .. } => Some(start),
            _ => None,
        }
    }
}

/// Property name → flat value, for one record.
pub type FlatRecord = BTreeMap<String, FlatValue>;

/// Flatten a record's properties.
///
/// Each payload carries its own type tag; the schema supplies the declared
/// kind for payloads that lack one (fakes and older exports).
#[must_use]
pub fn extract(record: &Record, schema: &Schema) -> FlatRecord {
    record
        .properties
        .iter()
        .map(|(name, raw)| {
            let kind = raw
                .get("type")
                .and_then(Value::as_str)
                .map(PropertyKind::from_name)
                .or_else(|| schema.get(name).map(|descriptor| descriptor.kind.clone()));
            (name.clone(), flatten_value(kind.as_ref(), raw))
        })
        .collect()
}

fn flatten_value(kind: Option<&PropertyKind>, raw: &Value) -> FlatValue {
    let Some(kind) = kind else {
        return FlatValue::Raw(raw.clone());
    };
    let payload = raw.get(kind.as_str());

    match kind {
        PropertyKind::Title | PropertyKind::RichText => payload
            .and_then(|segments| segments.get(0))
            .and_then(|segment| segment.get("plain_text"))
            .and_then(Value::as_str)
            .map_or(FlatValue::Null, |text| FlatValue::Text(text.to_string())),
        PropertyKind::Select => payload
            .and_then(|select| select.get("name"))
            .and_then(Value::as_str)
            .map_or(FlatValue::Null, |name| FlatValue::Text(name.to_string())),
        PropertyKind::Status => match payload {
            Some(Value::Object(status)) => FlatValue::Status(StatusValue {
                id: status.get("id").and_then(Value::as_str).map(str::to_string),
                name: status.get("name").and_then(Value::as_str).map(str::to_string),
            }),
            _ => FlatValue::Null,
        },
        PropertyKind::Date => match payload {
            Some(Value::Object(date)) => date.get("start").and_then(Value::as_str).map_or(
                FlatValue::Null,
                |start| FlatValue::Date {
                    start: start.to_string(),
                    end: date.get("end").and_then(Value::as_str).map(str::to_string),
                },
            ),
            _ => FlatValue::Null,
        },
        PropertyKind::Url => payload
            .and_then(Value::as_str)
            .map_or(FlatValue::Null, |url| FlatValue::Text(url.to_string())),
        PropertyKind::Other(_) => payload.map_or(FlatValue::Null, |value| FlatValue::Raw(value.clone())),
    }
}

/// Build a [`TemplateTask`] view from a template-database record.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] if the `Last Completed` value cannot
/// be normalized to UTC.
pub fn template_from_record(record: &Record, schema: &Schema) -> Result<TemplateTask, CoreError> {
    let flat = extract(record, schema);
    let text = |name: &str| flat.get(name).and_then(FlatValue::as_text).map(str::to_string);

    let last_completed = flat
        .get(props::LAST_COMPLETED)
        .and_then(FlatValue::date_start)
        .map(time::parse_utc)
        .transpose()?;

    Ok(TemplateTask {
        id: record.id.clone(),
        name: text(props::TASK),
        frequency: text(props::FREQUENCY),
        category: text(props::CATEGORY),
        priority: text(props::PRIORITY),
        documentation: text(props::DOCUMENTATION),
        last_completed,
    })
}

/// Build an [`ActiveTask`] view from an active-database record.
///
/// Malformed dates degrade to `None` with a warning rather than failing the
/// record; active rows are human-edited and the scans must survive them.
#[must_use]
pub fn active_from_record(record: &Record, schema: &Schema) -> ActiveTask {
    let flat = extract(record, schema);
    let text = |name: &str| flat.get(name).and_then(FlatValue::as_text).map(str::to_string);

    let planned_date = flat
        .get(props::PLANNED_DATE)
        .and_then(FlatValue::date_start)
        .and_then(|start| lenient_utc(&record.id, props::PLANNED_DATE, start))
        .map(|instant| instant.date_naive());
    let completed_date = flat
        .get(props::COMPLETED_DATE)
        .and_then(FlatValue::date_start)
        .and_then(|start| lenient_utc(&record.id, props::COMPLETED_DATE, start));
    let status = flat.get(props::STATUS).and_then(|value| match value {
        FlatValue::Status(status) => Some(status.clone()),
        _ => None,
    });

    ActiveTask {
        id: record.id.clone(),
        template_id: text(props::TEMPLATE_ID),
        name: text(props::TASK),
        category: text(props::CATEGORY),
        planned_date,
        status,
        completed_date,
    }
}

fn lenient_utc(record_id: &str, property: &str, raw: &str) -> Option<DateTime<Utc>> {
    match time::parse_utc(raw) {
        Ok(instant) => Some(instant),
        Err(error) => {
            tracing::warn!(record_id, property, %error, "ignoring malformed date value");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

/// Build the write payload for one property of the given kind.
///
/// `None` produces the kind's empty payload so a write can clear a value.
#[must_use]
pub fn build_value(kind: &PropertyKind, value: Option<&str>) -> Value {
    match kind {
        PropertyKind::Title => match value {
            Some(text) => json!({"title": [{"text": {"content": text}}]}),
            None => json!({"title": []}),
        },
        PropertyKind::RichText => match value {
            Some(text) => json!({"rich_text": [{"text": {"content": text}}]}),
            None => json!({"rich_text": []}),
        },
        PropertyKind::Select => match value {
            Some(name) => json!({"select": {"name": name}}),
            None => json!({"select": null}),
        },
        PropertyKind::Status => {
            json!({"status": {"name": value.unwrap_or(DEFAULT_STATUS_LABEL)}})
        }
        PropertyKind::Date => match value {
            Some(start) => json!({"date": {"start": start}}),
            None => json!({"date": null}),
        },
        PropertyKind::Url => json!({"url": value}),
        PropertyKind::Other(name) => {
            let mut payload = Map::new();
            payload.insert(
                name.clone(),
                value.map_or(Value::Null, |text| Value::String(text.to_string())),
            );
            Value::Object(payload)
        }
    }
}

/// The status label new instances start in.
///
/// Case-insensitively prefers an option named "not started"/"todo"/"to do",
/// falls back to the schema's first declared option, then to the literal
/// default label.
#[must_use]
pub fn default_status_name(descriptor: &PropertyDescriptor) -> String {
    descriptor
        .options
        .iter()
        .find(|option| NOT_STARTED_NAMES.contains(&option.name.to_lowercase().as_str()))
        .or_else(|| descriptor.options.first())
        .map_or_else(|| DEFAULT_STATUS_LABEL.to_string(), |option| option.name.clone())
}

/// Build the property payload for a fresh instance of `template`.
///
/// Copies the descriptive fields through the active schema's kinds, stamps
/// the default status, writes the template back-reference, and sets the
/// creation timestamp when the schema has a slot for it. Category and
/// planned date are stamped by the caller, which knows the target slot.
#[must_use]
pub fn build_instance_properties(
    template: &TemplateTask,
    active_schema: &Schema,
    now: DateTime<Utc>,
) -> Map<String, Value> {
    let mut properties = Map::new();

    if active_schema.contains_key(props::TEMPLATE_ID) {
        properties.insert(
            props::TEMPLATE_ID.to_string(),
            build_value(&PropertyKind::RichText, Some(&template.id)),
        );
    }

    let copied = [
        (props::TASK, template.name.as_deref()),
        (props::PRIORITY, template.priority.as_deref()),
        (props::CATEGORY, template.category.as_deref()),
        (props::DOCUMENTATION, template.documentation.as_deref()),
    ];
    for (name, value) in copied {
        if let Some(descriptor) = active_schema.get(name) {
            properties.insert(name.to_string(), build_value(&descriptor.kind, value));
        }
    }

    if let Some(descriptor) = active_schema.get(props::STATUS) {
        properties.insert(
            props::STATUS.to_string(),
            build_value(&PropertyKind::Status, Some(&default_status_name(descriptor))),
        );
    }

    if active_schema.contains_key(props::CREATION_DATE) {
        properties.insert(
            props::CREATION_DATE.to_string(),
            build_value(&PropertyKind::Date, Some(&now.to_rfc3339())),
        );
    }

    properties
}

// ---------------------------------------------------------------------------
// Option-set synchronization
// ---------------------------------------------------------------------------

/// One pending option-set patch for the active schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSync {
    pub property: String,
    pub kind: PropertyKind,
    /// Full option union to write: existing target options first (ids
    /// preserved), then the new ones.
    pub options: Vec<SelectOption>,
}

/// Diff categorical option sets from a source schema against a target.
///
/// Only select/status properties present in both schemas with the same kind
/// participate. The result is empty when the target already has every
/// source option by name, which is what makes re-running the sync a no-op.
#[must_use]
pub fn plan_option_sync(source: &Schema, target: &Schema) -> Vec<OptionSync> {
    let mut patches = Vec::new();

    for (name, source_descriptor) in source {
        if !source_descriptor.kind.has_options() {
            continue;
        }
        let Some(target_descriptor) = target.get(name) else {
            continue;
        };
        if target_descriptor.kind != source_descriptor.kind {
            tracing::warn!(
                property = %name,
                source_kind = %source_descriptor.kind,
                target_kind = %target_descriptor.kind,
                "skipping option sync: property kinds differ"
            );
            continue;
        }

        let additions: Vec<SelectOption> = source_descriptor
            .options
            .iter()
            .filter(|option| !target_descriptor.has_option_named(&option.name))
            .map(|option| SelectOption {
                id: None,
                name: option.name.clone(),
                color: option.color.clone(),
            })
            .collect();
        if additions.is_empty() {
            continue;
        }

        let mut options = target_descriptor.options.clone();
        options.extend(additions);
        patches.push(OptionSync {
            property: name.clone(),
            kind: source_descriptor.kind.clone(),
            options,
        });
    }

    patches
}
