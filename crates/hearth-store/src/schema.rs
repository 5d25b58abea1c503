//! Database schema types.
//!
//! A schema maps property names to their declared type plus, for select and
//! status properties, the current option set. Status properties additionally
//! group option ids under named groups; the group named `Complete` is the
//! one the engine cares about.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use hearth_core::PropertyKind;

use crate::error::StoreError;

/// Name of the status group whose options mean "done".
pub const COMPLETE_GROUP: &str = "Complete";

/// Property name to descriptor, for one database.
pub type Schema = BTreeMap<String, PropertyDescriptor>;

/// One declared option of a select or status property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SelectOption {
    /// An option carrying only a name (the shape used when appending new
    /// options to a target schema).
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            color: None,
        }
    }
}

/// A named group of status option ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGroup {
    pub name: String,
    #[serde(default)]
    pub option_ids: Vec<String>,
}

/// Declared type and option set of one schema property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub kind: PropertyKind,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub groups: Vec<StatusGroup>,
}

impl PropertyDescriptor {
    /// Descriptor with no options, for plain-typed properties.
    #[must_use]
    pub const fn plain(kind: PropertyKind) -> Self {
        Self {
            kind,
            options: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// The `Complete` group, if the property is a status with one declared.
    #[must_use]
    pub fn complete_group(&self) -> Option<&StatusGroup> {
        self.groups.iter().find(|group| group.name == COMPLETE_GROUP)
    }

    /// Option ids belonging to the `Complete` group.
    #[must_use]
    pub fn complete_option_ids(&self) -> HashSet<&str> {
        self.complete_group()
            .map(|group| group.option_ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Look up an option by id.
    #[must_use]
    pub fn option_by_id(&self, id: &str) -> Option<&SelectOption> {
        self.options.iter().find(|option| option.id.as_deref() == Some(id))
    }

    /// Whether an option with this name is declared (exact match).
    #[must_use]
    pub fn has_option_named(&self, name: &str) -> bool {
        self.options.iter().any(|option| option.name == name)
    }
}

/// Convert one wire property object (`{"type": "select", "select": {...}}`)
/// into a descriptor.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] if the object has no `type` field.
pub fn descriptor_from_wire(raw: &Value) -> Result<PropertyDescriptor, StoreError> {
    let type_name = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Parse("schema property without a type".to_string()))?;
    let kind = PropertyKind::from_name(type_name);

    let payload = raw.get(type_name);
    let options = payload
        .and_then(|p| p.get("options"))
        .map(|raw_options| {
            serde_json::from_value(raw_options.clone())
                .map_err(|e| StoreError::Parse(format!("schema options: {e}")))
        })
        .transpose()?
        .unwrap_or_default();
    let groups = payload
        .and_then(|p| p.get("groups"))
        .map(|raw_groups| {
            serde_json::from_value(raw_groups.clone())
                .map_err(|e| StoreError::Parse(format!("schema groups: {e}")))
        })
        .transpose()?
        .unwrap_or_default();

    Ok(PropertyDescriptor {
        kind,
        options,
        groups,
    })
}

/// Convert a database object's `properties` map into a [`Schema`].
///
/// # Errors
///
/// Returns [`StoreError::Parse`] if the body carries no `properties` object
/// or any property lacks a type.
pub fn schema_from_wire(body: &Value) -> Result<Schema, StoreError> {
    let properties = body
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| StoreError::Parse("database object without properties".to_string()))?;

    properties
        .iter()
        .map(|(name, raw)| Ok((name.clone(), descriptor_from_wire(raw)?)))
        .collect()
}
