//! Tool Context
//!
//! Per-call information handed to a tool when the agent loop dispatches it.
//! Tools only read from the context; the loop owns the conversation.

/// Context for a single tool invocation.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Identifier of the question being answered (one per `answer` call).
    session_id: String,
    /// Identifier the model assigned to this tool call.
    tool_call_id: String,
    /// 1-based round of the agent loop that produced the call.
    round: usize,
}

impl ToolContext {
    /// Create a new ToolContext.
    pub fn new(
        session_id: impl Into<String>,
        tool_call_id: impl Into<String>,
        round: usize,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            tool_call_id: tool_call_id.into(),
            round,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn tool_call_id(&self) -> &str {
        &self.tool_call_id
    }

    pub fn round(&self) -> usize {
        self.round
    }
}
