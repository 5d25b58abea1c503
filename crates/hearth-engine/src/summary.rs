//! Completion-note summarizer boundary.
//!
//! New instances can carry a short digest of how the chore went last time,
//! built from the template's accumulated comments. Summarization is strictly
//! best-effort: any failure degrades to "no comment" and never blocks
//! instance creation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You summarize a household task's past completion notes. \
Use only the text provided. Produce a short plain-text digest of what was done and \
any difficulties noted. Do not add suggestions, advice, or outside knowledge.";

/// Produces an optional digest of past completion notes.
#[allow(async_fn_in_trait)]
pub trait NoteSummarizer {
    /// `None` means no digest; the caller attaches nothing.
    async fn summarize(&self, notes: &str, subject: Option<&str>) -> Option<String>;
}

/// The summarizer used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSummarizer;

impl NoteSummarizer for NoSummarizer {
    async fn summarize(&self, _notes: &str, _subject: Option<&str>) -> Option<String> {
        None
    }
}

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct LlmSummarizer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

impl LlmSummarizer {
    #[must_use]
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    async fn complete(&self, notes: &str, subject: Option<&str>) -> Result<Option<String>, reqwest::Error> {
        let user_prompt = match subject {
            Some(subject) => format!("Task: {subject}\n\nPast completion notes:\n{notes}"),
            None => format!("Past completion notes:\n{notes}"),
        };
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty()))
    }
}

impl NoteSummarizer for LlmSummarizer {
    async fn summarize(&self, notes: &str, subject: Option<&str>) -> Option<String> {
        if notes.trim().is_empty() {
            return None;
        }
        match self.complete(notes, subject).await {
            Ok(summary) => summary,
            Err(error) => {
                tracing::warn!(%error, "summarizer call failed, continuing without a digest");
                None
            }
        }
    }
}
