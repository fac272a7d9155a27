//! Generative completion layer.
//!
//! One trait, one method: an instruction string goes in, a generated text
//! fragment comes out. The composer only ever sees the trait, so tests
//! substitute a stub and never touch the network.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use feedcast_shared::{FeedcastError, Result};

/// User-Agent string for completion requests.
const USER_AGENT: &str = concat!("feedcast/", env!("CARGO_PKG_VERSION"));

/// Timeout for completion calls. Generation is slow; give it room.
const COMPLETION_TIMEOUT_SECS: u64 = 120;

/// The generative-call boundary: one instruction in, one fragment out.
pub trait Completion {
    /// Run one instruction through the model and return the generated text.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

// ---------------------------------------------------------------------------
// OpenRouter client
// ---------------------------------------------------------------------------

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct OpenRouterClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenRouterClient {
    /// Create a client for `base_url`, generating with `model`.
    pub fn new(base_url: &str, api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Url::parse(base_url).map_err(|e| {
            FeedcastError::config(format!("invalid completions base URL '{base_url}': {e}"))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(COMPLETION_TIMEOUT_SECS))
            .build()
            .map_err(|e| FeedcastError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }
}

impl Completion for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FeedcastError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedcastError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| FeedcastError::parse(format!("{url}: {e}")))?;

        let fragment = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| FeedcastError::Completion("response contained no choices".into()))?;

        debug!(chars = fragment.len(), "completion received");
        Ok(fragment)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
