//! Course question answering.
//!
//! Keyword retrieval over stored course content, context composition, answer
//! generation with a search-only fallback, and link ranking. Also holds the
//! SQLite content store, analytics records and sample content used by the CLI.

pub mod analytics;
pub mod config;
pub mod events;
pub mod import;
pub mod index;
pub mod rag;
pub mod seed;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use analytics::{AnalyticsStats, QaRecord};
pub use config::PipelineConfig;
pub use events::{EventSink, PipelineEvent, RecordingSink, TracingSink};
pub use index::SqliteStore;
pub use rag::{AnswerPipeline, FallbackReason, KeywordRetriever, Strategy};
pub use store::{ContentStore, MemoryStore};
pub use types::{AnswerResult, AnswerSource, CandidateLink, ContentKind, ContentRecord, SearchHit};
