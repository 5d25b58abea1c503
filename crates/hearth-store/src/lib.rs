//! # hearth-store
//!
//! Document-store HTTP client for Hearth.
//!
//! The store is a Notion-shaped REST API: databases with typed property
//! schemas, records (pages) whose property values nest under their type
//! name, cursor pagination, and a global rate limit. This crate provides:
//! - typed schema structs ([`Schema`], [`PropertyDescriptor`]) with raw
//!   JSON property payloads on records
//! - a [`Filter`] builder for the query conditions the jobs issue
//! - [`StoreClient`], the reqwest client with a process-wide minimum
//!   inter-call delay and bounded exponential-backoff retry on 429
//! - the [`DocumentStore`] trait the engine is generic over, so tests can
//!   substitute an in-memory store
//!
//! Retry and throttling live entirely here; the engine never sees a 429.

mod client;
mod error;
mod filter;
mod http;
mod record;
mod retry;
mod schema;
mod throttle;

pub use client::StoreClient;
pub use error::StoreError;
pub use filter::Filter;
pub use record::{Comment, Record};
pub use retry::RetryConfig;
pub use schema::{
    COMPLETE_GROUP, PropertyDescriptor, Schema, SelectOption, StatusGroup, schema_from_wire,
};

use serde_json::{Map, Value};

use hearth_core::PropertyKind;

/// The CRUD+query surface the engine consumes.
///
/// [`StoreClient`] implements this against the real API; engine tests
/// implement it over in-memory state. All listing operations return fully
/// depaginated results.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Fetch a database's property schema.
    async fn retrieve_schema(&self, database_id: &str) -> Result<Schema, StoreError>;

    /// Query records, following pagination to exhaustion.
    async fn query_all(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<Record>, StoreError>;

    /// Create a record with the given property payloads.
    async fn create_record(
        &self,
        database_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError>;

    /// Patch a record's properties.
    async fn update_record(
        &self,
        record_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError>;

    /// List a record's comments, following pagination to exhaustion.
    async fn list_comments(&self, record_id: &str) -> Result<Vec<Comment>, StoreError>;

    /// Attach a free-text comment to a record.
    async fn create_comment(&self, record_id: &str, text: &str) -> Result<Comment, StoreError>;

    /// Replace a select/status property's option set with the given union.
    /// Callers only ever send a superset of the current options.
    async fn update_schema_options(
        &self,
        database_id: &str,
        property: &str,
        kind: &PropertyKind,
        options: Vec<SelectOption>,
    ) -> Result<(), StoreError>;
}

impl DocumentStore for StoreClient {
    async fn retrieve_schema(&self, database_id: &str) -> Result<Schema, StoreError> {
        self.retrieve_schema_impl(database_id).await
    }

    async fn query_all(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<Record>, StoreError> {
        self.query_all_impl(database_id, filter).await
    }

    async fn create_record(
        &self,
        database_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        self.create_record_impl(database_id, properties).await
    }

    async fn update_record(
        &self,
        record_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        self.update_record_impl(record_id, properties).await
    }

    async fn list_comments(&self, record_id: &str) -> Result<Vec<Comment>, StoreError> {
        self.list_comments_impl(record_id).await
    }

    async fn create_comment(&self, record_id: &str, text: &str) -> Result<Comment, StoreError> {
        self.create_comment_impl(record_id, text).await
    }

    async fn update_schema_options(
        &self,
        database_id: &str,
        property: &str,
        kind: &PropertyKind,
        options: Vec<SelectOption>,
    ) -> Result<(), StoreError> {
        self.update_schema_options_impl(database_id, property, kind, options)
            .await
    }
}
