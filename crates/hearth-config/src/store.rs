//! Document-store connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default API base URL for the document store.
fn default_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

/// Default minimum delay between API calls, in milliseconds.
///
/// The store's published limit is 3 requests/second average; 350 ms keeps a
/// run safely under it without reactive 429 handling kicking in.
const fn default_min_call_interval_ms() -> u64 {
    350
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Integration token used as the bearer credential.
    #[serde(default)]
    pub token: String,

    /// API base URL. Overridable for tests against a local stub.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Database id holding the recurring task templates.
    #[serde(default)]
    pub template_db_id: String,

    /// Database id holding the active task instances.
    #[serde(default)]
    pub active_db_id: String,

    /// Minimum delay between any two API calls issued by this process.
    #[serde(default = "default_min_call_interval_ms")]
    pub min_call_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: default_base_url(),
            template_db_id: String::new(),
            active_db_id: String::new(),
            min_call_interval_ms: default_min_call_interval_ms(),
        }
    }
}

impl StoreConfig {
    /// Whether the section has every field a run needs.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.template_db_id.is_empty() && !self.active_db_id.is_empty()
    }

    /// Validate the section for a job run. Missing credentials or database
    /// ids are fatal at startup; there is nothing to retry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("store.token", &self.token),
            ("store.template_db_id", &self.template_db_id),
            ("store.active_db_id", &self.active_db_id),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                    needed_for: "document store access".to_string(),
                });
            }
        }
        Ok(())
    }
}
