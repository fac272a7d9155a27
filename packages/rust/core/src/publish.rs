//! Publish-envelope construction for the finished transcript.

use chrono::{DateTime, Utc};

use feedcast_shared::SaveRequest;

/// Fixed tag under which every digest is filed. Also in the default
/// ignore list, so yesterday's digest never feeds today's episode.
const DIGEST_TAG: &str = "Summary";

/// Remote category for the saved document.
const CATEGORY: &str = "article";

/// Wrap a composed transcript in a minimal HTML shell.
pub fn wrap_html(transcript: &str) -> String {
    format!("<html><body>{transcript}</body></html>")
}

/// Build the save envelope for a finished transcript.
///
/// The url is informational only (there is no real audio resource); the
/// timestamp keeps repeated runs distinguishable in the remote library.
pub fn build_envelope(transcript: &str, location: &str, now: DateTime<Utc>) -> SaveRequest {
    SaveRequest {
        url: format!("https://example.com/podcast{}", now.to_rfc3339()),
        title: format!("Feed summary on {}", now.format("%Y.%m.%d")),
        should_clean_html: true,
        html: wrap_html(transcript),
        tags: vec![DIGEST_TAG.to_string()],
        published_date: now,
        location: location.to_string(),
        category: CATEGORY.to_string(),
    }
}
