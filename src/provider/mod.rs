//! Completion endpoint client
//!
//! Speaks the OpenAI-compatible chat completions protocol: one POST to
//! `{base_url}/chat/completions` per file, bearer-token auth, JSON in and
//! out. The [`Completer`] trait is the seam the sweep engine runs against,
//! so tests can substitute a scripted backend.

use crate::prompt::RenderedPrompt;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a completion request. These are recorded per file;
/// they never abort a sweep.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by the completion endpoint")]
    RateLimited,

    #[error("authentication failed; check REVIEW_SWEEP_API_KEY")]
    AuthenticationFailed,

    #[error("failed to parse completion response: {0}")]
    Parse(String),

    #[error("completion response contained no content")]
    Empty,
}

/// Anything that can turn a rendered prompt into completion text.
#[allow(async_fn_in_trait)]
pub trait Completer {
    async fn complete(&self, request: &RenderedPrompt) -> Result<String, ProviderError>;
}

/// Connection settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub timeout_secs: u64,
}

/// Reqwest-backed [`Completer`] for OpenAI-compatible endpoints.
pub struct CompletionClient {
    client: Client,
    options: ClientOptions,
}

impl CompletionClient {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(CompletionClient { client, options })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.options.base_url.trim_end_matches('/')
        )
    }
}

impl Completer for CompletionClient {
    async fn complete(&self, request: &RenderedPrompt) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.options.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => ProviderError::AuthenticationFailed,
                429 => ProviderError::RateLimited,
                code => ProviderError::Api {
                    status: code,
                    message,
                },
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::Empty)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
