//! End-to-end digest pipeline: fetch → filter → group → compose → publish.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, instrument};

use feedcast_reader::ReaderClient;
use feedcast_shared::{Result, ScriptConfig};

use crate::completion::Completion;
use crate::composer::{self, ComposeProgress};
use crate::{filter, grouping, publish};

/// Configuration for one digest run.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// How far back to look for updated articles, in hours.
    pub lookback_hours: u64,
    /// Reader location to fetch from and publish back to.
    pub location: String,
    /// Tag ordering and persona casting.
    pub script: ScriptConfig,
    /// Compose the script but skip the publish step.
    pub dry_run: bool,
}

/// Result of a digest run.
#[derive(Debug)]
pub struct DigestResult {
    /// Articles in the working set after filtering.
    pub articles: usize,
    /// Segments generated (buckets + intro + outro).
    pub segments: usize,
    /// Raw save-endpoint response body; `None` on dry runs.
    pub saved_response: Option<String>,
    /// The composed transcript; only carried on dry runs.
    pub transcript: Option<String>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called as each script segment begins generating.
    fn segment(&self, current: usize, total: usize, label: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &DigestResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn segment(&self, _current: usize, _total: usize, _label: &str) {}
    fn done(&self, _result: &DigestResult) {}
}

/// Run the full digest pipeline.
///
/// 1. Fetch every article updated in the lookback window
/// 2. Filter and reshape to the working set
/// 3. Bucket by tag, drop ignored tags, order deterministically
/// 4. Compose the episode script segment by segment
/// 5. Publish the transcript back to the reader service
#[instrument(skip_all, fields(location = %config.location, lookback_hours = config.lookback_hours))]
pub async fn run_digest<C: Completion>(
    config: &DigestConfig,
    reader: &ReaderClient,
    completion: &C,
    progress: &dyn ProgressReporter,
) -> Result<DigestResult> {
    let start = Instant::now();
    let updated_after = Utc::now() - chrono::Duration::hours(config.lookback_hours as i64);

    info!(%updated_after, "starting digest run");

    // --- Phase 1: Fetch ---
    progress.phase("Fetching articles");
    let raw = reader
        .list_documents(updated_after, &config.location)
        .await?;

    // --- Phase 2: Filter / reshape ---
    progress.phase("Filtering articles");
    let reduced = filter::reduce_documents(&raw);
    let articles = reduced.len();

    // --- Phase 3: Group and order ---
    let buckets = grouping::sort_buckets(
        grouping::group_by_tag(&reduced),
        &config.script.priority_tags,
        &config.script.ignore_tags,
    );
    let segments = buckets.len() + 2;

    // --- Phase 4: Compose ---
    progress.phase("Composing script");
    let compose_progress = PipelineComposeProgress { inner: progress };
    let transcript =
        composer::compose_script(completion, &config.script, buckets, &compose_progress).await?;

    if config.dry_run {
        let result = DigestResult {
            articles,
            segments,
            saved_response: None,
            transcript: Some(transcript),
            elapsed: start.elapsed(),
        };
        progress.done(&result);
        info!(articles, segments, "dry run complete, skipping publish");
        return Ok(result);
    }

    // --- Phase 5: Publish ---
    progress.phase("Saving to reader service");
    let envelope = publish::build_envelope(&transcript, &config.location, Utc::now());
    let saved_response = reader.save_document(&envelope).await?;

    let result = DigestResult {
        articles,
        segments,
        saved_response: Some(saved_response),
        transcript: None,
        elapsed: start.elapsed(),
    };

    progress.done(&result);
    info!(
        articles,
        segments,
        elapsed_ms = result.elapsed.as_millis(),
        "digest complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Compose progress adapter
// ---------------------------------------------------------------------------

/// Adapts a `ProgressReporter` to the `ComposeProgress` interface.
struct PipelineComposeProgress<'a> {
    inner: &'a dyn ProgressReporter,
}

impl ComposeProgress for PipelineComposeProgress<'_> {
    fn segment(&self, current: usize, total: usize, label: &str) {
        self.inner.segment(current, total, label);
    }
}
