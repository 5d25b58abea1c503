#![allow(dead_code)]

//! In-memory `DocumentStore` for engine tests.
//!
//! Mimics the real store closely enough for the jobs under test: write
//! payloads are normalized to read shape on create/update (including status
//! option-id resolution against the database schema), and query filters are
//! evaluated against the stored records.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde_json::{Map, Value, json};

use hearth_core::PropertyKind;
use hearth_engine::NoteSummarizer;
use hearth_store::{
    Comment, DocumentStore, Filter, PropertyDescriptor, Record, Schema, SelectOption, StatusGroup,
    StoreError,
};

// ---------------------------------------------------------------------------
// Schemas and record builders
// ---------------------------------------------------------------------------

pub const TEMPLATE_DB: &str = "db-templates";
pub const ACTIVE_DB: &str = "db-active";

pub fn select_descriptor(names: &[&str]) -> PropertyDescriptor {
    PropertyDescriptor {
        kind: PropertyKind::Select,
        options: names
            .iter()
            .map(|name| SelectOption {
                id: Some(format!("opt-{}", name.to_lowercase().replace(['/', ' '], "-"))),
                name: (*name).to_string(),
                color: Some("default".to_string()),
            })
            .collect(),
        groups: Vec::new(),
    }
}

/// Status property with a "Complete" group containing only "Done".
pub fn status_descriptor() -> PropertyDescriptor {
    PropertyDescriptor {
        kind: PropertyKind::Status,
        options: vec![
            SelectOption {
                id: Some("st-not-started".to_string()),
                name: "Not Started".to_string(),
                color: None,
            },
            SelectOption {
                id: Some("st-in-progress".to_string()),
                name: "In Progress".to_string(),
                color: None,
            },
            SelectOption {
                id: Some("st-done".to_string()),
                name: "Done".to_string(),
                color: None,
            },
        ],
        groups: vec![
            StatusGroup {
                name: "To-do".to_string(),
                option_ids: vec!["st-not-started".to_string()],
            },
            StatusGroup {
                name: "Complete".to_string(),
                option_ids: vec!["st-done".to_string()],
            },
        ],
    }
}

pub const CATEGORIES: [&str; 3] = ["Random/Monday", "Cooking/Tuesday", "Cleaning/Friday"];

pub fn template_schema() -> Schema {
    let mut schema = Schema::new();
    schema.insert("Task".to_string(), PropertyDescriptor::plain(PropertyKind::Title));
    schema.insert(
        "Frequency".to_string(),
        select_descriptor(&["Daily", "Weekly", "Monthly", "Quarterly", "Yearly", "Monday/Friday"]),
    );
    schema.insert("Category".to_string(), select_descriptor(&CATEGORIES));
    schema.insert("Priority".to_string(), select_descriptor(&["Low", "High"]));
    schema.insert(
        "Documentation".to_string(),
        PropertyDescriptor::plain(PropertyKind::Url),
    );
    schema.insert(
        "Last Completed".to_string(),
        PropertyDescriptor::plain(PropertyKind::Date),
    );
    schema
}

pub fn active_schema() -> Schema {
    let mut schema = Schema::new();
    schema.insert("Task".to_string(), PropertyDescriptor::plain(PropertyKind::Title));
    schema.insert(
        "TemplateId".to_string(),
        PropertyDescriptor::plain(PropertyKind::RichText),
    );
    schema.insert("Category".to_string(), select_descriptor(&CATEGORIES));
    schema.insert("Priority".to_string(), select_descriptor(&["Low", "High"]));
    schema.insert(
        "Documentation".to_string(),
        PropertyDescriptor::plain(PropertyKind::Url),
    );
    schema.insert("Status".to_string(), status_descriptor());
    schema.insert(
        "Planned Date".to_string(),
        PropertyDescriptor::plain(PropertyKind::Date),
    );
    schema.insert(
        "Completed Date".to_string(),
        PropertyDescriptor::plain(PropertyKind::Date),
    );
    schema.insert(
        "CreationDate".to_string(),
        PropertyDescriptor::plain(PropertyKind::Date),
    );
    schema
}

pub fn title_value(text: &str) -> Value {
    json!({"type": "title", "title": [{"plain_text": text, "text": {"content": text}}]})
}

pub fn rich_text_value(text: &str) -> Value {
    json!({"type": "rich_text", "rich_text": [{"plain_text": text, "text": {"content": text}}]})
}

pub fn select_value(name: &str) -> Value {
    json!({"type": "select", "select": {"name": name}})
}

pub fn date_value(start: &str) -> Value {
    json!({"type": "date", "date": {"start": start}})
}

pub fn status_value(id: &str, name: &str) -> Value {
    json!({"type": "status", "status": {"id": id, "name": name}})
}

pub fn template_record(
    id: &str,
    name: &str,
    frequency: &str,
    category: &str,
    last_completed: Option<&str>,
) -> Record {
    let mut properties = Map::new();
    properties.insert("Task".to_string(), title_value(name));
    properties.insert("Frequency".to_string(), select_value(frequency));
    properties.insert("Category".to_string(), select_value(category));
    if let Some(start) = last_completed {
        properties.insert("Last Completed".to_string(), date_value(start));
    }
    Record {
        id: id.to_string(),
        properties,
    }
}

// ---------------------------------------------------------------------------
// FakeStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Database {
    schema: Schema,
    records: Vec<Record>,
}

#[derive(Default)]
struct Inner {
    databases: HashMap<String, Database>,
    comments: HashMap<String, Vec<Comment>>,
    fail_updates: HashSet<String>,
    next_id: usize,
    created: Vec<String>,
    option_sync_calls: usize,
}

#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<Inner>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_database(&self, id: &str, schema: Schema) {
        let mut inner = self.inner.lock().unwrap();
        inner.databases.insert(
            id.to_string(),
            Database {
                schema,
                records: Vec::new(),
            },
        );
    }

    pub fn seed_record(&self, database_id: &str, record: Record) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .databases
            .get_mut(database_id)
            .expect("unknown database")
            .records
            .push(record);
    }

    pub fn seed_comment(&self, record_id: &str, text: &str) {
        let mut inner = self.inner.lock().unwrap();
        let comments = inner.comments.entry(record_id.to_string()).or_default();
        let id = format!("cmt-{}", comments.len());
        comments.push(Comment {
            id,
            text: text.to_string(),
        });
    }

    /// Make `update_record` fail for this record id.
    pub fn fail_updates_for(&self, record_id: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_updates
            .insert(record_id.to_string());
    }

    pub fn records(&self, database_id: &str) -> Vec<Record> {
        self.inner.lock().unwrap().databases[database_id].records.clone()
    }

    pub fn record(&self, record_id: &str) -> Option<Record> {
        let inner = self.inner.lock().unwrap();
        inner
            .databases
            .values()
            .flat_map(|db| db.records.iter())
            .find(|record| record.id == record_id)
            .cloned()
    }

    pub fn comments(&self, record_id: &str) -> Vec<Comment> {
        self.inner
            .lock()
            .unwrap()
            .comments
            .get(record_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn created_ids(&self) -> Vec<String> {
        self.inner.lock().unwrap().created.clone()
    }

    pub fn option_sync_calls(&self) -> usize {
        self.inner.lock().unwrap().option_sync_calls
    }

    /// Rewrite a write payload into the read shape records carry, resolving
    /// status option ids against the database schema.
    fn normalize(schema: &Schema, name: &str, payload: &Value) -> Value {
        let Some(object) = payload.as_object() else {
            return payload.clone();
        };
        let Some((kind_name, body)) = object.iter().next() else {
            return payload.clone();
        };
        let normalized = match kind_name.as_str() {
            "title" | "rich_text" => {
                let segments: Vec<Value> = body
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(|segment| {
                        segment
                            .get("plain_text")
                            .or_else(|| segment.pointer("/text/content"))
                            .and_then(Value::as_str)
                            .map(|text| {
                                json!({"plain_text": text, "text": {"content": text}})
                            })
                    })
                    .collect();
                Value::Array(segments)
            }
            "status" => {
                let status_name = body.get("name").and_then(Value::as_str);
                let id = status_name.and_then(|status_name| {
                    schema.get(name).and_then(|descriptor| {
                        descriptor
                            .options
                            .iter()
                            .find(|option| option.name == status_name)
                            .and_then(|option| option.id.clone())
                    })
                });
                json!({"id": id, "name": status_name})
            }
            _ => body.clone(),
        };
        let mut wrapped = Map::new();
        wrapped.insert("type".to_string(), Value::String(kind_name.clone()));
        wrapped.insert(kind_name.clone(), normalized);
        Value::Object(wrapped)
    }

    fn matches(record: &Record, condition: &Value) -> bool {
        if let Some(clauses) = condition.get("and").and_then(Value::as_array) {
            return clauses.iter().all(|clause| Self::matches(record, clause));
        }
        if let Some(clauses) = condition.get("or").and_then(Value::as_array) {
            return clauses.iter().any(|clause| Self::matches(record, clause));
        }

        let Some(property) = condition.get("property").and_then(Value::as_str) else {
            return false;
        };
        let raw = record.properties.get(property);

        if let Some(body) = condition.get("rich_text").or_else(|| condition.get("title")) {
            let text = raw.and_then(first_plain_text);
            return check_text(body, text);
        }
        if let Some(body) = condition.get("select") {
            let name = raw
                .and_then(|raw| raw.pointer("/select/name"))
                .and_then(Value::as_str);
            return check_text(body, name);
        }
        if let Some(body) = condition.get("status") {
            let name = raw
                .and_then(|raw| raw.pointer("/status/name"))
                .and_then(Value::as_str);
            return check_text(body, name);
        }
        if let Some(body) = condition.get("date") {
            let start = raw
                .and_then(|raw| raw.pointer("/date/start"))
                .and_then(Value::as_str)
                .map(|start| &start[..start.len().min(10)]);
            if body.get("is_empty").is_some() {
                return start.is_none();
            }
            if let Some(target) = body.get("equals").and_then(Value::as_str) {
                return start == Some(&target[..target.len().min(10)]);
            }
            if let Some(target) = body.get("before").and_then(Value::as_str) {
                // ISO dates compare lexicographically
                return start.is_some_and(|start| start < &target[..target.len().min(10)]);
            }
            return false;
        }
        false
    }
}

fn first_plain_text(raw: &Value) -> Option<&str> {
    ["rich_text", "title"].iter().find_map(|key| {
        raw.get(*key)
            .and_then(|segments| segments.get(0))
            .and_then(|segment| segment.get("plain_text"))
            .and_then(Value::as_str)
    })
}

fn check_text(body: &Value, actual: Option<&str>) -> bool {
    if body.get("is_empty").is_some() {
        return actual.is_none_or(str::is_empty);
    }
    if let Some(target) = body.get("equals").and_then(Value::as_str) {
        return actual == Some(target);
    }
    false
}

impl DocumentStore for FakeStore {
    async fn retrieve_schema(&self, database_id: &str) -> Result<Schema, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .databases
            .get(database_id)
            .map(|db| db.schema.clone())
            .ok_or_else(|| StoreError::Parse(format!("no database {database_id}")))
    }

    async fn query_all(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<Record>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let db = inner
            .databases
            .get(database_id)
            .ok_or_else(|| StoreError::Parse(format!("no database {database_id}")))?;
        let condition = filter.and_then(Filter::to_value);
        Ok(db
            .records
            .iter()
            .filter(|record| {
                condition
                    .as_ref()
                    .is_none_or(|condition| Self::matches(record, condition))
            })
            .cloned()
            .collect())
    }

    async fn create_record(
        &self,
        database_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("rec-{}", inner.next_id);
        let db = inner
            .databases
            .get_mut(database_id)
            .ok_or_else(|| StoreError::Parse(format!("no database {database_id}")))?;
        let normalized = properties
            .iter()
            .map(|(name, payload)| (name.clone(), Self::normalize(&db.schema, name, payload)))
            .collect();
        let record = Record {
            id: id.clone(),
            properties: normalized,
        };
        db.records.push(record.clone());
        inner.created.push(id);
        Ok(record)
    }

    async fn update_record(
        &self,
        record_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_updates.contains(record_id) {
            return Err(StoreError::Api {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        for db in inner.databases.values_mut() {
            let schema = db.schema.clone();
            if let Some(record) = db.records.iter_mut().find(|record| record.id == record_id) {
                for (name, payload) in &properties {
                    record
                        .properties
                        .insert(name.clone(), Self::normalize(&schema, name, payload));
                }
                return Ok(record.clone());
            }
        }
        Err(StoreError::Parse(format!("no record {record_id}")))
    }

    async fn list_comments(&self, record_id: &str) -> Result<Vec<Comment>, StoreError> {
        Ok(self.comments(record_id))
    }

    async fn create_comment(&self, record_id: &str, text: &str) -> Result<Comment, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let comments = inner.comments.entry(record_id.to_string()).or_default();
        let comment = Comment {
            id: format!("cmt-{}", comments.len()),
            text: text.to_string(),
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_schema_options(
        &self,
        database_id: &str,
        property: &str,
        _kind: &PropertyKind,
        options: Vec<SelectOption>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.option_sync_calls += 1;
        let db = inner
            .databases
            .get_mut(database_id)
            .ok_or_else(|| StoreError::Parse(format!("no database {database_id}")))?;
        if let Some(descriptor) = db.schema.get_mut(property) {
            descriptor.options = options;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Summarizer stub
// ---------------------------------------------------------------------------

/// Summarizer returning a fixed digest, recording what it was asked.
#[derive(Default)]
pub struct StubSummarizer {
    pub reply: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubSummarizer {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl NoteSummarizer for StubSummarizer {
    async fn summarize(&self, notes: &str, _subject: Option<&str>) -> Option<String> {
        self.calls.lock().unwrap().push(notes.to_string());
        self.reply.clone()
    }
}
