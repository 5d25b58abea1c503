//! REST client for the document store.
//!
//! Every call goes through one throttled, retrying request path; endpoint
//! methods only build paths and map response bodies. Pagination is followed
//! to exhaustion inside the client so callers always see complete lists.

use std::time::Duration;

use reqwest::Method;
use serde_json::{Map, Value, json};

use hearth_core::PropertyKind;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::http::check_response;
use crate::record::{Comment, CommentPage, QueryPage, Record, WireComment};
use crate::retry::RetryConfig;
use crate::schema::{Schema, SelectOption, schema_from_wire};
use crate::throttle::Throttle;

/// API version header value the store expects.
const STORE_API_VERSION: &str = "2022-06-28";

/// HTTP client for the document store, with proactive rate limiting and
/// bounded 429 retry.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    throttle: Throttle,
    retry: RetryConfig,
}

impl StoreClient {
    /// Create a client for the given API base URL and bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(base_url: &str, token: &str, min_call_interval: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            throttle: Throttle::new(min_call_interval),
            retry: RetryConfig::default(),
        }
    }

    /// Issue one request, waiting on the throttle first and retrying 429s
    /// with exponential backoff until the attempt budget runs out.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, StoreError> {
        let url = format!("{}/{path}", self.base_url);
        let mut attempt: u32 = 0;

        loop {
            self.throttle.wait().await;

            let mut req = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&self.token)
                .header("Notion-Version", STORE_API_VERSION);
            if let Some(body) = body {
                req = req.json(body);
            }

            match check_response(req.send().await?).await {
                Ok(resp) => return Ok(resp.json().await?),
                Err(StoreError::RateLimited { retry_after_secs }) => {
                    attempt += 1;
                    if attempt >= self.retry.max_attempts {
                        tracing::error!(path, attempt, "rate limit retries exhausted");
                        return Err(StoreError::RateLimited { retry_after_secs });
                    }
                    let delay = self.retry.delay_for(attempt, retry_after_secs);
                    tracing::warn!(
                        path,
                        attempt,
                        delay_secs = delay.as_secs(),
                        "rate limited; backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    pub(crate) async fn retrieve_schema_impl(&self, database_id: &str) -> Result<Schema, StoreError> {
        let body = self
            .request(Method::GET, &format!("databases/{database_id}"), None)
            .await?;
        schema_from_wire(&body)
    }

    pub(crate) async fn query_all_impl(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<Record>, StoreError> {
        let filter_value = filter.and_then(Filter::to_value);
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = Map::new();
            if let Some(filter_value) = &filter_value {
                body.insert("filter".to_string(), filter_value.clone());
            }
            if let Some(cursor) = &cursor {
                body.insert("start_cursor".to_string(), Value::String(cursor.clone()));
            }

            let raw = self
                .request(
                    Method::POST,
                    &format!("databases/{database_id}/query"),
                    Some(&Value::Object(body)),
                )
                .await?;
            let page: QueryPage =
                serde_json::from_value(raw).map_err(|e| StoreError::Parse(e.to_string()))?;

            results.extend(page.results);
            if page.has_more {
                cursor = page.next_cursor;
            } else {
                return Ok(results);
            }
        }
    }

    pub(crate) async fn create_record_impl(
        &self,
        database_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let body = json!({
            "parent": {"database_id": database_id},
            "properties": properties,
        });
        let raw = self.request(Method::POST, "pages", Some(&body)).await?;
        serde_json::from_value(raw).map_err(|e| StoreError::Parse(e.to_string()))
    }

    pub(crate) async fn update_record_impl(
        &self,
        record_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let body = json!({"properties": properties});
        let raw = self
            .request(Method::PATCH, &format!("pages/{record_id}"), Some(&body))
            .await?;
        serde_json::from_value(raw).map_err(|e| StoreError::Parse(e.to_string()))
    }

    pub(crate) async fn list_comments_impl(&self, record_id: &str) -> Result<Vec<Comment>, StoreError> {
        let mut comments = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let path = cursor.as_ref().map_or_else(
                || format!("comments?block_id={record_id}"),
                |cursor| format!("comments?block_id={record_id}&start_cursor={cursor}"),
            );
            let raw = self.request(Method::GET, &path, None).await?;
            let page: CommentPage =
                serde_json::from_value(raw).map_err(|e| StoreError::Parse(e.to_string()))?;

            comments.extend(page.results.into_iter().map(Comment::from));
            if page.has_more {
                cursor = page.next_cursor;
            } else {
                return Ok(comments);
            }
        }
    }

    pub(crate) async fn create_comment_impl(
        &self,
        record_id: &str,
        text: &str,
    ) -> Result<Comment, StoreError> {
        let body = json!({
            "parent": {"page_id": record_id},
            "rich_text": [{"text": {"content": text}}],
        });
        let raw = self.request(Method::POST, "comments", Some(&body)).await?;
        let wire: WireComment =
            serde_json::from_value(raw).map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(wire.into())
    }

    pub(crate) async fn update_schema_options_impl(
        &self,
        database_id: &str,
        property: &str,
        kind: &PropertyKind,
        options: Vec<SelectOption>,
    ) -> Result<(), StoreError> {
        let mut patch = Map::new();
        patch.insert(kind.as_str().to_string(), json!({"options": options}));
        let mut properties = Map::new();
        properties.insert(property.to_string(), Value::Object(patch));
        let body = json!({"properties": properties});
        self.request(Method::PATCH, &format!("databases/{database_id}"), Some(&body))
            .await?;
        Ok(())
    }
}
