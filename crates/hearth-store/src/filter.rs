//! Query filter builder.
//!
//! Builds the store's JSON filter objects without string templating. Only
//! the conditions the rollover and review jobs actually issue are covered.

use chrono::NaiveDate;
use serde_json::{Value, json};

/// A conjunction of property conditions, plus at most one status
/// disjunction (the "not complete" filter is expressed as an `or` over the
/// non-complete status names).
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<Value>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rich_text_equals(mut self, property: &str, value: &str) -> Self {
        self.conditions
            .push(json!({"property": property, "rich_text": {"equals": value}}));
        self
    }

    #[must_use]
    pub fn rich_text_is_empty(mut self, property: &str) -> Self {
        self.conditions
            .push(json!({"property": property, "rich_text": {"is_empty": true}}));
        self
    }

    #[must_use]
    pub fn select_equals(mut self, property: &str, value: &str) -> Self {
        self.conditions
            .push(json!({"property": property, "select": {"equals": value}}));
        self
    }

    #[must_use]
    pub fn select_is_empty(mut self, property: &str) -> Self {
        self.conditions
            .push(json!({"property": property, "select": {"is_empty": true}}));
        self
    }

    #[must_use]
    pub fn date_equals(mut self, property: &str, date: NaiveDate) -> Self {
        self.conditions
            .push(json!({"property": property, "date": {"equals": date.to_string()}}));
        self
    }

    #[must_use]
    pub fn date_before(mut self, property: &str, date: NaiveDate) -> Self {
        self.conditions
            .push(json!({"property": property, "date": {"before": date.to_string()}}));
        self
    }

    #[must_use]
    pub fn date_is_empty(mut self, property: &str) -> Self {
        self.conditions
            .push(json!({"property": property, "date": {"is_empty": true}}));
        self
    }

    /// Any of the given status names matches.
    #[must_use]
    pub fn status_any_of(mut self, property: &str, names: &[String]) -> Self {
        let clauses: Vec<Value> = names
            .iter()
            .map(|name| json!({"property": property, "status": {"equals": name}}))
            .collect();
        self.conditions.push(json!({"or": clauses}));
        self
    }

    /// Render the filter body. A single condition is emitted bare; multiple
    /// conditions are wrapped in an `and`.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        match self.conditions.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(json!({"and": many})),
        }
    }
}
