//! Completion-note summarizer configuration.
//!
//! The summarizer is an optional collaborator; an unconfigured section means
//! runs proceed without summaries rather than failing.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarizerConfig {
    /// API key for the OpenAI-compatible endpoint.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

impl SummarizerConfig {
    /// Whether the LLM summarizer should be used at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
