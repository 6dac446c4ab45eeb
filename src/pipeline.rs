//! Pipeline orchestrator.
//!
//! Composes prompt building, transport, parsing, synthesis and coalescing
//! into one total entry point: [`ArticlePipeline::generate`] always returns a
//! well-formed [`Document`]. Failures are absorbed, logged, and reported
//! out of band through [`Diagnostics`].
//!
//! State flow:
//!
//! ```text
//! Idle -> Requesting -> ParsingStrict -> Done
//!                                     -> Repairing -> Done
//!                                                  -> Synthesizing -> Done
//!         Requesting (failed/timed out/cancelled) -> Synthesizing -> Done
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::coalesce;
use crate::parser::{self, ParseFailure, ParseOutcome};
use crate::prompt::build_prompts;
use crate::providers::{LlmProvider, TransportError};
use crate::synthesizer;
use crate::types::{Document, Draft, GenerationRequest};

/// Default deadline for the transport call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a document's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Model output parsed as-is.
    Strict,
    /// Model output parsed after syntactic repair.
    Repaired,
    /// Built from style templates without model output.
    Synthesized,
}

/// Orchestrator states, recorded in order for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing started yet.
    Idle,
    /// Awaiting the transport.
    Requesting,
    /// Strict parse of the raw text.
    ParsingStrict,
    /// Syntactic repair and second parse.
    Repairing,
    /// Building the fallback document.
    Synthesizing,
    /// Document finalized.
    Done,
}

/// Why the pipeline fell back to synthesis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FallbackReason {
    /// The transport call failed or timed out.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response text could not be parsed or repaired.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    /// The caller cancelled while the request was in flight.
    #[error("request cancelled")]
    Cancelled,
}

impl FallbackReason {
    /// Kind label: `network`, `http_status`, `envelope`, `parse`, `repair`
    /// or `cancelled`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(err) => err.kind(),
            Self::Parse(err) => err.kind(),
            Self::Cancelled => "cancelled",
        }
    }
}

impl Serialize for FallbackReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FallbackReason", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Out-of-band record of how a document was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Unique id of this invocation, also attached to log events.
    pub generation_id: Uuid,
    /// Model the transport asked for.
    pub model: String,
    /// Provenance of the content.
    pub tier: Tier,
    /// Set whenever `tier` is [`Tier::Synthesized`].
    pub fallback: Option<FallbackReason>,
    /// States visited, `Idle` first and `Done` last.
    pub states: Vec<PipelineState>,
    /// Wall-clock time spent in the pipeline.
    pub elapsed_ms: u64,
}

/// A finished document plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    /// The article.
    pub document: Document,
    /// Provenance and state trace.
    pub diagnostics: Diagnostics,
}

/// The resilient article generation pipeline.
///
/// Cheap to clone; invocations share nothing but the provider and the
/// static style table.
#[derive(Clone)]
pub struct ArticlePipeline {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl std::fmt::Debug for ArticlePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticlePipeline")
            .field("model", &self.provider.model_id())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ArticlePipeline {
    /// Create a pipeline around a provider with a transport deadline.
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Transport deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate a document. Never fails.
    pub async fn generate(&self, request: &GenerationRequest) -> Generated {
        self.generate_with_cancel(request, std::future::pending::<()>())
            .await
    }

    /// Generate a document, falling back to synthesis as soon as `cancel`
    /// resolves while the request is in flight.
    pub async fn generate_with_cancel<C>(&self, request: &GenerationRequest, cancel: C) -> Generated
    where
        C: Future<Output = ()>,
    {
        let started = Instant::now();
        let generation_id = Uuid::new_v4();
        let model = self.provider.model_id().to_owned();
        let mut states = vec![PipelineState::Idle, PipelineState::Requesting];

        info!(
            %generation_id,
            style = %request.style(),
            word_count = request.word_count(),
            model = %model,
            "generating article"
        );

        let prompts = build_prompts(request);
        let call = tokio::time::timeout(self.timeout, self.provider.complete(&prompts));
        let raw: Result<String, FallbackReason> = tokio::select! {
            result = call => match result {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(err)) => Err(err.into()),
                Err(_) => Err(TransportError::Network(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
                .into()),
            },
            () = cancel => Err(FallbackReason::Cancelled),
        };

        let (draft, tier, fallback) = match raw {
            Ok(text) => {
                debug!(%generation_id, bytes = text.len(), "response received");
                states.push(PipelineState::ParsingStrict);
                match parser::parse(&text) {
                    ParseOutcome::Strict(payload) => {
                        (coalesce::coalesce(payload, request), Tier::Strict, None)
                    }
                    ParseOutcome::Repaired(payload) => {
                        states.push(PipelineState::Repairing);
                        warn!(%generation_id, "model response needed syntactic repair");
                        (coalesce::coalesce(payload, request), Tier::Repaired, None)
                    }
                    ParseOutcome::Failed(failure) => {
                        states.push(PipelineState::Repairing);
                        states.push(PipelineState::Synthesizing);
                        let reason = FallbackReason::from(failure);
                        warn!(
                            %generation_id,
                            kind = reason.kind(),
                            error = %reason,
                            "model response unusable, synthesizing fallback"
                        );
                        (synthesize(request), Tier::Synthesized, Some(reason))
                    }
                }
            }
            Err(reason) => {
                states.push(PipelineState::Synthesizing);
                warn!(
                    %generation_id,
                    kind = reason.kind(),
                    error = %reason,
                    "transport failed, synthesizing fallback"
                );
                (synthesize(request), Tier::Synthesized, Some(reason))
            }
        };

        states.push(PipelineState::Done);
        let document = draft.finalize(Utc::now());
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            %generation_id,
            tier = ?tier,
            sections = document.sections.len(),
            elapsed_ms,
            "article ready"
        );

        Generated {
            document,
            diagnostics: Diagnostics {
                generation_id,
                model,
                tier,
                fallback,
                states,
                elapsed_ms,
            },
        }
    }
}

fn synthesize(request: &GenerationRequest) -> Draft {
    coalesce::coalesce_draft(synthesizer::synthesize(request), request)
}
