//! Spec RAG LLM
//!
//! Provides the interface used to talk to a chat-completions language model:
//! - Message, tool and response types
//! - The `LlmProvider` trait
//! - `OpenAIProvider` for OpenAI and OpenAI-compatible endpoints
//!
//! Also includes the HTTP client factory.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;
