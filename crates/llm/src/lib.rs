//! Generation service integration for the Tutor workspace.
//!
//! This crate provides a provider-agnostic abstraction for calling a large
//! language model with a single, non-streaming completion request. The
//! answering pipeline only sees the [`LlmClient`] trait, so tests can swap in
//! deterministic stubs without network access.
//!
//! # Providers
//! - **OpenAI**: chat completions API (default, supports image input)
//! - **Ollama**: local LLM runtime (`/api/generate`, supports image input)
//!
//! # Example
//! ```no_run
//! use tutor_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("What is a p-value?", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use types::{ImageAttachment, ProviderType};
