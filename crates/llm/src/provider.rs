//! LLM Provider Trait
//!
//! The agent loop and the extraction service only see this trait, so tests
//! can substitute a scripted provider for the HTTP one.

use async_trait::async_trait;

use super::types::{LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ToolDefinition};

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one chat-completions request and return the parsed reply.
    ///
    /// `system` is sent ahead of `messages`. `request_options` carries the
    /// per-call model, temperature and structured-output format.
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse>;
}

/// Map a non-200 reply of the chat-completions endpoint to an `LlmError`.
///
/// The message comes from `{"error": {"message": ...}}` when the body has
/// one, else from the raw body.
pub(crate) fn status_error(status: u16, body: &str) -> LlmError {
    let message = api_error_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        401 | 403 => LlmError::AuthenticationFailed { message },
        429 => LlmError::RateLimited { message },
        400 | 404 | 422 => LlmError::InvalidRequest { message },
        500..=599 => LlmError::ServerError { status, message },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, message),
        },
    }
}

fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
