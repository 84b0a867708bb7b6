//! Spec RAG Core
//!
//! Foundational types shared by every crate in the Spec RAG workspace.
//! This crate depends on nothing else in the workspace.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `context` - Per-call context handed to tools (`ToolContext`)
//! - `proxy` - Outbound proxy settings used by the HTTP client factory

pub mod context;
pub mod error;
pub mod proxy;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Tool Context ───────────────────────────────────────────────────────
pub use context::ToolContext;

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};
