//! Transport client abstraction.
//!
//! Defines the [`LlmProvider`] trait the pipeline talks to and the
//! [`TransportError`] taxonomy every implementation reports through.
//!
//! One provider is implemented:
//! - [`openai::OpenAiProvider`] — OpenAI-compatible `/chat/completions` API
//!
//! A provider makes exactly one attempt per call. Retries, if wanted, wrap
//! the provider from the outside.

use async_trait::async_trait;
use regex::Regex;

use crate::prompt::Prompts;

pub mod openai;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by transport providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection failure, timeout, or an unreadable response body.
    #[error("network error: {0}")]
    Network(String),
    /// Upstream responded with a non-success status.
    #[error("service returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized, truncated response body.
        body: String,
    },
    /// 2xx response without the expected `choices[0].message.content`.
    #[error("unexpected response envelope: {0}")]
    Envelope(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl TransportError {
    /// Short kind label for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::HttpStatus { .. } => "http_status",
            Self::Envelope(_) => "envelope",
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `TransportError::Network` when the body cannot be read,
/// `TransportError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, TransportError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TransportError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"sk-ant-[A-Za-z0-9_\-]{10,}",
        r"sk-[A-Za-z0-9]{32,}",
        r"Bearer\s+[A-Za-z0-9._\-]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A service that turns prompts into raw model text.
///
/// Implementations must be `Send + Sync` so one provider can serve
/// concurrent pipeline invocations.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the prompts and return the raw text of the first completion.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network, status, or envelope failure.
    async fn complete(&self, prompts: &Prompts) -> Result<String, TransportError>;

    /// The model identifier this provider requests.
    fn model_id(&self) -> &str;
}
