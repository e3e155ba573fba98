//! Minimal client for an OpenAI-compatible chat-completions endpoint.
//!
//! One system message plus one user message in, the first choice's text out.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

/// One completion call: a system instruction and a user prompt.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client.
#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a client against the public OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Llm`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_base_url(
            api_key,
            darazscout_core::config::DEFAULT_LLM_BASE_URL,
            timeout_secs,
        )
    }

    /// Creates a client against `base_url` (a proxy, a compatible provider,
    /// or a mock server). A trailing slash is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Llm`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ScraperError::Llm {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `request` and returns the text of the first choice.
    ///
    /// A choice with `null` content yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Llm`] on transport failure, a non-2xx status,
    /// an undecodable body, or a reply with no choices.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, ScraperError> {
        let body = ChatRequest {
            model: &request.model,
            messages: [
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let start = std::time::Instant::now();
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "completion request failed");
                ScraperError::Llm {
                    reason: format!("request failed: {e}"),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_text, "completion API error");
            return Err(ScraperError::Llm {
                reason: format!("HTTP {}: {}", status.as_u16(), error_text.trim()),
            });
        }

        let raw: ChatResponseRaw = response.json().await.map_err(|e| ScraperError::Llm {
            reason: format!("undecodable response: {e}"),
        })?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScraperError::Llm {
                reason: "response contained no choices".to_owned(),
            })?
            .message
            .content
            .unwrap_or_default();

        tracing::debug!(
            model = %request.model,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            chars = content.len(),
            "completion received"
        );
        Ok(content)
    }
}
