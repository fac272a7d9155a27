//! Segment planning and script composition.
//!
//! An episode is an ordered list of segments: an introduction, one topic
//! segment per tag bucket, and a closing. Each segment resolves a persona
//! from the host table, builds one generation instruction, runs it through
//! the [`Completion`] boundary, and appends the returned fragment to the
//! transcript under a heading marker.

use tracing::{debug, info};

use feedcast_shared::{FeedcastError, ReducedDocument, Result, ScriptConfig};

use crate::completion::Completion;
use crate::grouping::TagBuckets;

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// One planned segment of the episode.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Intro,
    Topic {
        tag: String,
        docs: Vec<ReducedDocument>,
    },
    Outro,
}

impl Segment {
    /// Heading marker prepended to this segment's generated fragment.
    pub fn marker(&self) -> String {
        match self {
            Segment::Intro => "\n<h1>INTRODUCTION</h1>\n".into(),
            Segment::Topic { tag, .. } => format!("\n<h1>SEGMENT: {tag}</h1>"),
            Segment::Outro => "\n<h1>ENDING</h1>".into(),
        }
    }

    /// Short label for progress reporting.
    pub fn label(&self) -> String {
        match self {
            Segment::Intro => "Introduction".into(),
            Segment::Topic { tag, .. } => format!("Segment: {tag}"),
            Segment::Outro => "Ending".into(),
        }
    }

    /// Host-table key used to cast this segment.
    fn host_key(&self) -> &str {
        match self {
            Segment::Intro => "Introduction",
            Segment::Topic { tag, .. } => tag,
            Segment::Outro => "Summary",
        }
    }
}

/// Lay out the episode: introduction, one topic segment per bucket in
/// bucket order, then the closing.
pub fn plan_segments(buckets: TagBuckets) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(buckets.len() + 2);
    segments.push(Segment::Intro);
    segments.extend(
        buckets
            .into_iter()
            .map(|(tag, docs)| Segment::Topic { tag, docs }),
    );
    segments.push(Segment::Outro);
    segments
}

fn resolve_host<'a>(script: &'a ScriptConfig, segment: &Segment) -> &'a str {
    script
        .hosts
        .get(segment.host_key())
        .unwrap_or(&script.default_host)
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the generation instruction for one segment.
fn build_prompt(segment: &Segment, host: &str) -> Result<String> {
    match segment {
        Segment::Intro => Ok(format!(
            "We are creating a podcast. Create a script for a podcast based on the following newsfeed.\n\
             This is the first segment of the podcast and contains only the introduction.\n\
             There are segments after this one. End this segment so that other segments can be added.\n\
             The host for this segment is {host} and the style follows the entertaining style which is particular to them.\n\
             The next segment has a different host.\n\
             Format the script so that I can feed it to TTS to make it sound like a real podcast.\n\
             Keep the segment about 1 minute long.\n\
             The output should be in raw HTML format without header or footer.\n\
             Leave out the sound effects and music."
        )),
        Segment::Topic { tag, docs } => {
            let newsfeed = serde_json::to_string(docs).map_err(|e| {
                FeedcastError::parse(format!("failed to serialize newsfeed for '{tag}': {e}"))
            })?;
            Ok(format!(
                "We are creating a podcast. Create a script for a podcast based on the following newsfeed.\n\
                 This is one segment of the podcast and the topic here is about {tag}.\n\
                 There are segments before and after this one. You do not need introductions, just continue the story.\n\
                 The host for this segment is {host} and the style for the whole segment follows the entertaining style which is particular to them.\n\
                 The previous segment and next segment probably have different hosts.\n\
                 Keep the script informative and entertaining.\n\
                 The script's main purpose is to help the listener learn about new topics with the subject {tag}.\n\
                 Include content from all of the articles in the newsfeed.\n\
                 Only use the content from the articles. Do not invent new content.\n\
                 Dig deeper into the article summaries to find interesting information and use it to guide the script with the host's style.\n\
                 If possible, find a common theme or topic from all the articles and use it to guide the script.\n\
                 Format the script so that I can feed it to TTS to make it sound like a real podcast.\n\
                 Leave out the sound effects and music.\n\
                 Keep the segment up to 3 minutes long.\n\
                 The output should be in raw HTML format without header or footer.\n\
                 Here is the newsfeed for topic {tag}: {newsfeed}"
            ))
        }
        Segment::Outro => Ok(format!(
            "We are creating a podcast. Create a script for a podcast based on the following newsfeed.\n\
             This is the last segment of the podcast.\n\
             There are segments before this one. Start this segment so it continues the story.\n\
             End this segment with the ending of the podcast episode.\n\
             The host for this segment is {host} and the style follows the entertaining style which is particular to them.\n\
             Previous segments had different hosts.\n\
             Format the script so that I can feed it to TTS to make it sound like a real podcast.\n\
             Keep the segment about 1 minute long.\n\
             The output should be in raw HTML format without header or footer.\n\
             Leave out the sound effects and music."
        )),
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Progress callback invoked as each segment begins.
pub trait ComposeProgress: Send + Sync {
    fn segment(&self, current: usize, total: usize, label: &str);
}

/// No-op compose progress.
pub struct SilentComposeProgress;

impl ComposeProgress for SilentComposeProgress {
    fn segment(&self, _current: usize, _total: usize, _label: &str) {}
}

/// Run every planned segment through the completion boundary and
/// accumulate the transcript.
///
/// Any completion failure aborts composition; there is no retry.
pub async fn compose_script<C: Completion>(
    completion: &C,
    script: &ScriptConfig,
    buckets: TagBuckets,
    progress: &dyn ComposeProgress,
) -> Result<String> {
    let segments = plan_segments(buckets);
    let total = segments.len();
    let mut transcript = String::new();

    for (i, segment) in segments.iter().enumerate() {
        progress.segment(i + 1, total, &segment.label());

        let host = resolve_host(script, segment);
        let prompt = build_prompt(segment, host)?;

        debug!(segment = %segment.label(), host, "requesting segment");
        let fragment = completion.complete(&prompt).await?;

        transcript.push_str(&segment.marker());
        transcript.push_str(&fragment);
    }

    info!(segments = total, chars = transcript.len(), "script composed");
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every prompt it sees and replies with a fixed fragment.
    struct StubCompletion {
        prompts: Mutex<Vec<String>>,
        reply: String,
        fail_on_call: Option<usize>,
    }

    impl StubCompletion {
        fn replying(reply: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.into(),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::replying("x")
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl Completion for StubCompletion {
        async fn complete(&self, prompt: &str) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            if self.fail_on_call == Some(prompts.len()) {
                return Err(FeedcastError::Completion("stub failure".into()));
            }
            Ok(self.reply.clone())
        }
    }

    fn doc(title: &str, tags: &[&str]) -> ReducedDocument {
        ReducedDocument {
            title: Some(title.into()),
            author: Some("Author".into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            summary: Some("summary text".into()),
            site_name: None,
        }
    }

    fn small_script_config() -> ScriptConfig {
        ScriptConfig {
            priority_tags: vec![],
            ignore_tags: vec![],
            default_host: "Default Host".into(),
            hosts: [
                ("Introduction", "Intro Host"),
                ("Summary", "Closing Host"),
                ("AI", "AI Host"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }

    #[test]
    fn plan_covers_intro_buckets_outro() {
        let buckets = vec![
            ("Local".to_string(), vec![doc("a", &["Local"])]),
            ("Games".to_string(), vec![doc("b", &["Games"])]),
        ];
        let segments = plan_segments(buckets);

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Segment::Intro);
        assert_eq!(segments[3], Segment::Outro);
        assert!(matches!(&segments[1], Segment::Topic { tag, .. } if tag == "Local"));
        assert!(matches!(&segments[2], Segment::Topic { tag, .. } if tag == "Games"));
    }

    #[tokio::test]
    async fn transcript_has_markers_in_order() {
        let stub = StubCompletion::replying("<p>text</p>");
        let buckets = vec![
            ("AI".to_string(), vec![doc("a", &["AI"])]),
            ("Birds".to_string(), vec![doc("b", &["Birds"])]),
        ];

        let transcript = compose_script(
            &stub,
            &small_script_config(),
            buckets,
            &SilentComposeProgress,
        )
        .await
        .unwrap();

        assert!(transcript.starts_with("\n<h1>INTRODUCTION</h1>\n"));
        assert_eq!(transcript.matches("<h1>SEGMENT: ").count(), 2);

        let ai = transcript.find("<h1>SEGMENT: AI</h1>").unwrap();
        let birds = transcript.find("<h1>SEGMENT: Birds</h1>").unwrap();
        let ending = transcript.find("<h1>ENDING</h1>").unwrap();
        assert!(ai < birds && birds < ending);
        assert!(transcript.ends_with("<h1>ENDING</h1><p>text</p>"));
    }

    #[tokio::test]
    async fn prompts_carry_personas_and_newsfeed() {
        let stub = StubCompletion::replying("x");
        let buckets = vec![
            ("AI".to_string(), vec![doc("AI article", &["AI"])]),
            ("Unknown".to_string(), vec![doc("other", &["Unknown"])]),
        ];

        compose_script(
            &stub,
            &small_script_config(),
            buckets,
            &SilentComposeProgress,
        )
        .await
        .unwrap();

        let prompts = stub.prompts();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains("Intro Host"));
        assert!(prompts[0].contains("first segment"));
        assert!(prompts[1].contains("AI Host"));
        assert!(prompts[1].contains("the topic here is about AI"));
        assert!(prompts[1].contains("AI article"));
        // No host table entry for "Unknown" → default persona.
        assert!(prompts[2].contains("Default Host"));
        assert!(prompts[3].contains("Closing Host"));
        assert!(prompts[3].contains("last segment"));
    }

    #[tokio::test]
    async fn empty_buckets_still_book_end_the_episode() {
        let stub = StubCompletion::replying("x");
        let transcript =
            compose_script(&stub, &small_script_config(), vec![], &SilentComposeProgress)
                .await
                .unwrap();

        assert!(transcript.starts_with("\n<h1>INTRODUCTION</h1>\n"));
        assert!(transcript.contains("<h1>ENDING</h1>"));
        assert_eq!(transcript.matches("<h1>SEGMENT: ").count(), 0);
    }

    #[tokio::test]
    async fn completion_failure_aborts_composition() {
        let stub = StubCompletion::failing_on(2);
        let buckets = vec![("AI".to_string(), vec![doc("a", &["AI"])])];

        let err = compose_script(
            &stub,
            &small_script_config(),
            buckets,
            &SilentComposeProgress,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FeedcastError::Completion(_)));
    }
}
