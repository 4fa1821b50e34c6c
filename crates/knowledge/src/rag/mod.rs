//! Retrieval-augmented answering.

pub mod ask;
pub mod context;
pub mod fallback;
pub mod prompt;
pub mod rank;
pub mod search;

pub use ask::{AnswerPipeline, FallbackReason, Strategy};
pub use context::{compose, ComposedContext};
pub use rank::rank;
pub use search::KeywordRetriever;
