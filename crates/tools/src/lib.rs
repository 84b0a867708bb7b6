//! Spec RAG Tools
//!
//! Core types and trait definitions for the tools the agent can call.
//!
//! - `ToolResult` - execution result type
//! - `Tool` trait - unified tool interface
//! - `ToolRegistry` - tool registration, definitions, and dispatch
//! - `validate_arguments` - checks model-supplied arguments against a tool schema
//!
//! The concrete tools (PDF reader, SQL executor) live in the main crate's
//! `services::tools` module because they need storage and PDF access.

pub mod executor;
pub mod trait_def;
pub mod validation;

// Re-export core types
pub use executor::ToolResult;
pub use trait_def::{Tool, ToolRegistry};
pub use validation::validate_arguments;
