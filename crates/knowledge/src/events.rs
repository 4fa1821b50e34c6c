//! Structured pipeline events.
//!
//! The answering pipeline reports what happened through an injected
//! [`EventSink`] instead of logging directly, so tests can assert on
//! retrieval and generation outcomes.

use crate::types::AnswerSource;
use std::sync::Mutex;

/// Something observable that happened while answering a question.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Retrieval finished (possibly with zero hits).
    RetrievalCompleted {
        keywords: usize,
        records_scanned: usize,
        hits: usize,
        top_score: Option<u32>,
    },
    /// The content store failed or timed out; treated as no hits.
    StoreUnavailable { error: String },
    /// The strategy chosen for this call.
    StrategySelected { strategy: &'static str },
    /// The generation service answered.
    GenerationSucceeded {
        provider: String,
        model: String,
        completion_tokens: u32,
    },
    /// The generation service failed; the pipeline falls back.
    GenerationFailed { provider: String, error: String },
    /// A final answer was produced.
    AnswerComposed { source: AnswerSource, links: usize },
    /// An unexpected failure was converted into the apology answer.
    FatalError { error: String },
}

/// Receiver for pipeline events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::RetrievalCompleted {
                keywords,
                records_scanned,
                hits,
                top_score,
            } => tracing::debug!(keywords, records_scanned, hits, ?top_score, "Keyword retrieval completed"),
            PipelineEvent::StoreUnavailable { error } => {
                tracing::error!(%error, "Content store unavailable, continuing with no hits")
            }
            PipelineEvent::StrategySelected { strategy } => {
                tracing::debug!(strategy, "Answer strategy selected")
            }
            PipelineEvent::GenerationSucceeded {
                provider,
                model,
                completion_tokens,
            } => tracing::info!(%provider, %model, completion_tokens, "Generated answer"),
            PipelineEvent::GenerationFailed { provider, error } => {
                tracing::error!(%provider, %error, "Generation failed, falling back to search results")
            }
            PipelineEvent::AnswerComposed { source, links } => {
                tracing::info!(source = source.as_str(), links, "Answer composed")
            }
            PipelineEvent::FatalError { error } => {
                tracing::error!(%error, "Answering failed unexpectedly")
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
