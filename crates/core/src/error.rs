//! Error types for the Tutor workspace.
//!
//! A single error enum covers every failure category. The answering pipeline
//! recovers from `Store` and `Llm` errors by degrading to a safer strategy;
//! `Pipeline` marks an unexpected internal failure that ends in a fixed
//! apology message.

use thiserror::Error;

/// Unified error type for the Tutor workspace.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation service errors (transport, auth, quota, malformed response)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Content store errors (store unavailable, query failure)
    #[error("Store error: {0}")]
    Store(String),

    /// Unexpected failures inside the answering pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
