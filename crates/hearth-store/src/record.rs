//! Record and comment wire types.
//!
//! Property values stay raw [`serde_json::Value`]s here; the engine's schema
//! adapter interprets them against the declared property kinds.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One record (page) in a database.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// One page of query results.
#[derive(Debug, Deserialize)]
pub struct QueryPage {
    #[serde(default)]
    pub results: Vec<Record>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A free-text comment attached to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub text: String,
}

/// One page of comment results.
#[derive(Debug, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub results: Vec<WireComment>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Wire shape of a comment: text arrives as a rich-text segment list.
#[derive(Debug, Deserialize)]
pub struct WireComment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub rich_text: Vec<RichTextSegment>,
}

#[derive(Debug, Deserialize)]
pub struct RichTextSegment {
    #[serde(default)]
    pub plain_text: String,
}

impl From<WireComment> for Comment {
    fn from(wire: WireComment) -> Self {
        let text = wire
            .rich_text
            .iter()
            .map(|segment| segment.plain_text.as_str())
            .collect::<String>();
        Self { id: wire.id, text }
    }
}
