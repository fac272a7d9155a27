//! Filter and reshape raw reader records into prompt-ready documents.

use serde_json::Value;
use tracing::{info, warn};

use feedcast_shared::{Document, ReducedDocument};

/// Articles at or above this reading progress count as already consumed.
const READ_THRESHOLD: f64 = 0.8;

/// Project raw list-endpoint records down to the working set.
///
/// Drops records the user has mostly read and flattens each survivor to
/// the reduced field subset. A batch whose elements do not decode as
/// documents is reported and degrades to an empty working set; the run
/// continues rather than crashing.
pub fn reduce_documents(raw: &[Value]) -> Vec<ReducedDocument> {
    let docs: Result<Vec<Document>, _> = raw
        .iter()
        .cloned()
        .map(serde_json::from_value)
        .collect();

    let docs = match docs {
        Ok(docs) => docs,
        Err(e) => {
            warn!(
                error = %e,
                records = raw.len(),
                "unexpected document list shape, continuing with no articles"
            );
            return Vec::new();
        }
    };

    let reduced: Vec<ReducedDocument> = docs
        .into_iter()
        .filter(|doc| doc.reading_progress < READ_THRESHOLD)
        .map(|doc| ReducedDocument {
            title: doc.title,
            author: doc.author,
            tags: tag_names(&doc.tags),
            summary: doc.summary,
            site_name: doc.site_name,
        })
        .collect();

    info!(articles = reduced.len(), "working set after filter");
    reduced
}

/// Flatten the provider's tag mapping to its entries' `name` values.
///
/// Anything other than a mapping (absent, null, array, scalar) yields an
/// empty list, never an error.
fn tag_names(tags: &Value) -> Vec<String> {
    match tags.as_object() {
        Some(map) => map
            .values()
            .filter_map(|tag| tag.get("name").and_then(Value::as_str))
            .map(String::from)
            .collect(),
        None => Vec::new(),
    }
}
