//! OpenAI-compatible provider using the `/chat/completions` API.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::prompt::Prompts;

use super::{check_http_response, LlmProvider, TransportError};

const DEFAULT_TEMPERATURE: f64 = 0.8;
const DEFAULT_MAX_TOKENS: u32 = 3000;

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier.
    pub model: String,
    /// System message followed by the user message.
    pub messages: Vec<OpenAiMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum completion tokens.
    pub max_tokens: u32,
}

/// A message in chat format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiMessage {
    /// Role (`system` or `user`).
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// Chat completions response envelope.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponse {
    /// Response choices.
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    /// Assistant message for this choice.
    pub message: Option<OpenAiResponseMessage>,
}

/// Assistant message.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponseMessage {
    /// Text content.
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// OpenAI-compatible chat completions provider.
#[derive(Clone)]
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
    max_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "__REDACTED__"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a provider for `{base_url}/chat/completions`.
    ///
    /// Without an API key no `Authorization` header is sent, which suits
    /// keyless local servers.
    pub fn new(base_url: &str, model: String, api_key: Option<String>) -> Self {
        Self {
            endpoint: chat_completions_url(base_url),
            model,
            api_key,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider from the `[service]` configuration section.
    pub fn from_config(service: &ServiceConfig) -> Self {
        Self::new(
            &service.base_url,
            service.model.clone(),
            service.api_key.clone(),
        )
        .with_sampling(service.temperature, service.max_tokens)
    }

    /// Override temperature and completion token limit.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f64, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build a chat completions request body from prompts.
#[doc(hidden)]
pub fn build_request(
    model: &str,
    prompts: &Prompts,
    temperature: f64,
    max_tokens: u32,
) -> OpenAiRequest {
    OpenAiRequest {
        model: model.to_owned(),
        messages: vec![
            OpenAiMessage {
                role: "system".to_owned(),
                content: prompts.system.clone(),
            },
            OpenAiMessage {
                role: "user".to_owned(),
                content: prompts.user.clone(),
            },
        ],
        temperature,
        max_tokens,
    }
}

/// Extract `choices[0].message.content` from a 2xx response body.
///
/// # Errors
///
/// Returns `TransportError::Envelope` if the body is not the expected
/// envelope or the content field is absent.
#[doc(hidden)]
pub fn parse_envelope(body: &str) -> Result<String, TransportError> {
    let resp: OpenAiResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Envelope(e.to_string()))?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TransportError::Envelope("missing choices[0]".to_owned()))?;

    choice
        .message
        .ok_or_else(|| TransportError::Envelope("missing choices[0].message".to_owned()))?
        .content
        .ok_or_else(|| TransportError::Envelope("missing choices[0].message.content".to_owned()))
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, prompts: &Prompts) -> Result<String, TransportError> {
        let api_request = build_request(&self.model, prompts, self.temperature, self.max_tokens);

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&api_request);
        if let Some(key) = &self.api_key {
            builder = builder.header("authorization", format!("Bearer {key}"));
        }

        debug!(endpoint = %self.endpoint, model = %self.model, "sending chat completion request");
        let response = builder.send().await?;

        let payload = check_http_response(response).await?;
        parse_envelope(&payload)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
