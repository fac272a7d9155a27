//! Core domain types for the feedcast pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A raw record from the reader service's list endpoint.
///
/// Only the fields the pipeline consumes are declared; everything else the
/// provider sends is ignored. `tags` stays a raw JSON value because the
/// provider's shape (mapping of tag-id to tag object) is not guaranteed;
/// reshaping happens in `feedcast-core::filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    /// Fraction of the article already read, 0–1.
    #[serde(default)]
    pub reading_progress: f64,
    /// Mapping of tag-id → tag object with a `name` field, when present.
    #[serde(default)]
    pub tags: Value,
}

// ---------------------------------------------------------------------------
// ReducedDocument
// ---------------------------------------------------------------------------

/// The projected shape fed into prompt construction.
///
/// Serialized verbatim as the newsfeed payload of topic-segment prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Flat ordered list of tag names; empty when the source tags field
    /// was absent or not a mapping.
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub site_name: Option<String>,
}

// ---------------------------------------------------------------------------
// ListPage
// ---------------------------------------------------------------------------

/// One page of the paginated list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListPage {
    /// Raw records; shape validation is deferred to the filter stage.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Opaque cursor for the next page; absent on the last page.
    #[serde(default, rename = "nextPageCursor")]
    pub next_page_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// SaveRequest
// ---------------------------------------------------------------------------

/// The publish envelope POSTed to the reader service's save endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Informational URL; not a real audio resource.
    pub url: String,
    pub title: String,
    /// Ask the service to clean the HTML before storing it.
    pub should_clean_html: bool,
    /// The full composed transcript.
    pub html: String,
    pub tags: Vec<String>,
    pub published_date: DateTime<Utc>,
    pub location: String,
    pub category: String,
}
