//! Answer generation.
//!
//! [`AnswerPipeline`] runs retrieval, context composition and link ranking,
//! and decides between two strategies:
//!
//! - augmented: a single language-model call seeded with the composed context
//! - fallback: a deterministic answer built from the search results
//!
//! Generation failures degrade to the fallback. Anything else that goes
//! wrong, including a panic in an injected collaborator, becomes the fixed
//! apology with no links. The caller always gets a well-formed answer.

use crate::config::PipelineConfig;
use crate::events::{EventSink, PipelineEvent, TracingSink};
use crate::rag::context::{compose, ComposedContext};
use crate::rag::fallback::{compose_fallback, FATAL_ERROR_MESSAGE, NO_INFORMATION_MESSAGE};
use crate::rag::prompt::render_prompt;
use crate::rag::rank::rank;
use crate::rag::search::KeywordRetriever;
use crate::store::ContentStore;
use crate::types::{AnswerResult, AnswerSource, SearchHit};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tutor_core::{AppError, AppResult};
use tutor_llm::{ImageAttachment, LlmClient, LlmRequest};

/// Output token cap for a generated answer.
pub const GENERATION_MAX_TOKENS: u32 = 1000;

/// Sampling temperature for a generated answer.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Strategy chosen before any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// No generation client is configured
    NoExternalService,
    /// Try the generation client first
    Augmented,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoExternalService => "no_external_service",
            Self::Augmented => "augmented",
        }
    }
}

/// Why the answer was composed from search results instead of generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoExternalService,
    GenerationFailed,
}

impl FallbackReason {
    /// Provenance tag for a fallback answer.
    pub fn source(self, has_hits: bool) -> AnswerSource {
        match (self, has_hits) {
            (Self::GenerationFailed, _) => AnswerSource::AugmentedFailedFallback,
            (Self::NoExternalService, true) => AnswerSource::HitsFallback,
            (Self::NoExternalService, false) => AnswerSource::NoHitsFallback,
        }
    }
}

struct Generator {
    client: Arc<dyn LlmClient>,
    model: String,
}

/// Question answering over a content store, optionally augmented by a
/// generation service.
pub struct AnswerPipeline {
    store: Arc<dyn ContentStore>,
    config: PipelineConfig,
    generator: Option<Generator>,
    events: Arc<dyn EventSink>,
}

impl AnswerPipeline {
    /// Create a search-only pipeline reporting to `tracing`.
    pub fn new(store: Arc<dyn ContentStore>, config: PipelineConfig) -> Self {
        Self {
            store,
            config,
            generator: None,
            events: Arc::new(TracingSink),
        }
    }

    /// Enable augmented answers through `client` using `model`.
    pub fn with_generator(mut self, client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        self.generator = Some(Generator {
            client,
            model: model.into(),
        });
        self
    }

    /// Report pipeline events to `events` instead of `tracing`.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Strategy this pipeline will try first.
    pub fn strategy(&self) -> Strategy {
        if self.generator.is_some() {
            Strategy::Augmented
        } else {
            Strategy::NoExternalService
        }
    }

    /// Answer a question, with an optional image for the generation service.
    ///
    /// Never fails. The question is expected to be non-empty; validating it
    /// is the caller's job.
    pub async fn answer(&self, question: &str, image: Option<&ImageAttachment>) -> AnswerResult {
        let outcome = AssertUnwindSafe(self.try_answer(question, image))
            .catch_unwind()
            .await;

        let error = match outcome {
            Ok(Ok(result)) => return result,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        self.events.emit(PipelineEvent::FatalError { error });
        let result = AnswerResult {
            answer: FATAL_ERROR_MESSAGE.to_string(),
            links: Vec::new(),
            source: AnswerSource::FatalError,
        };
        self.events.emit(PipelineEvent::AnswerComposed {
            source: result.source,
            links: 0,
        });
        result
    }

    async fn try_answer(&self, question: &str, image: Option<&ImageAttachment>) -> AppResult<AnswerResult> {
        let strategy = self.strategy();
        self.events.emit(PipelineEvent::StrategySelected {
            strategy: strategy.as_str(),
        });

        let retriever = KeywordRetriever::new(
            self.store.clone(),
            self.events.clone(),
            self.config.store_timeout(),
        );
        let hits = retriever.retrieve(question, self.config.top_k).await;
        let composed = compose(&hits, &self.config);

        let result = match &self.generator {
            None => self.fallback(&hits, composed, FallbackReason::NoExternalService),
            Some(generator) => {
                let prompt = render_prompt(question, &composed.context)?;
                match self.generate(generator, prompt, image).await {
                    Ok(answer) => AnswerResult {
                        answer,
                        links: rank(composed.links),
                        source: AnswerSource::Augmented,
                    },
                    Err(e) => {
                        self.events.emit(PipelineEvent::GenerationFailed {
                            provider: generator.client.provider_name().to_string(),
                            error: e.to_string(),
                        });
                        self.fallback(&hits, composed, FallbackReason::GenerationFailed)
                    }
                }
            }
        };

        self.events.emit(PipelineEvent::AnswerComposed {
            source: result.source,
            links: result.links.len(),
        });
        Ok(result)
    }

    /// One generation attempt, bounded by the configured timeout.
    async fn generate(
        &self,
        generator: &Generator,
        prompt: String,
        image: Option<&ImageAttachment>,
    ) -> AppResult<String> {
        let mut request = LlmRequest::new(prompt, generator.model.clone())
            .with_max_tokens(GENERATION_MAX_TOKENS)
            .with_temperature(GENERATION_TEMPERATURE);
        if let Some(image) = image {
            request = request.with_image(image.clone());
        }

        let timeout = self.config.generation_timeout();
        let response = tokio::time::timeout(timeout, generator.client.complete(&request))
            .await
            .map_err(|_| {
                AppError::Llm(format!(
                    "Generation timed out after {:.1}s",
                    timeout.as_secs_f64()
                ))
            })??;

        let answer = response.content.trim();
        if answer.is_empty() {
            return Err(AppError::Llm("Generation returned an empty answer".to_string()));
        }

        self.events.emit(PipelineEvent::GenerationSucceeded {
            provider: generator.client.provider_name().to_string(),
            model: response.model.clone(),
            completion_tokens: response.usage.completion_tokens,
        });
        Ok(answer.to_string())
    }

    /// Search-only answer. Links cover the same hits as the numbered excerpts.
    fn fallback(&self, hits: &[SearchHit], composed: ComposedContext, reason: FallbackReason) -> AnswerResult {
        let mut links = composed.links;
        links.truncate(self.config.context_hits);

        let answer = compose_fallback(
            hits,
            self.config.context_hits,
            self.config.fallback_excerpt_chars,
        );
        let source = reason.source(!hits.is_empty());

        match answer {
            Some(answer) => AnswerResult {
                answer,
                links: rank(links),
                source,
            },
            None => AnswerResult {
                answer: NO_INFORMATION_MESSAGE.to_string(),
                links: Vec::new(),
                source,
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic with non-string payload".to_string()
    }
}
