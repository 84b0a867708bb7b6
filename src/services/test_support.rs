//! Scripted collaborators shared by the service unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use spec_rag_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ToolCall,
    ToolDefinition,
};

use crate::services::pdf::{document_text, DocumentReader};
use crate::utils::error::{AppError, AppResult};

/// One request as seen by the mock provider
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub tools: Vec<ToolDefinition>,
    pub options: LlmRequestOptions,
}

/// Provider returning queued responses in order
pub struct MockLlmProvider {
    /// Responses to return in sequence; each call pops the first response.
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<LlmResult<LlmResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages,
            system,
            tools,
            options: request_options,
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }
}

pub fn text_response(text: &str) -> LlmResult<LlmResponse> {
    Ok(LlmResponse::text("mock-model", text))
}

pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

pub fn tool_response(calls: Vec<ToolCall>) -> LlmResult<LlmResponse> {
    Ok(LlmResponse::with_tool_calls("mock-model", calls))
}

/// In-memory documents keyed by filename; `None` marks an unreadable file
#[derive(Default)]
pub struct StubReader {
    documents: HashMap<String, Option<Vec<String>>>,
}

impl StubReader {
    pub fn with_document(mut self, filename: &str, pages: &[&str]) -> Self {
        self.documents.insert(
            filename.to_string(),
            Some(pages.iter().map(|p| p.to_string()).collect()),
        );
        self
    }

    pub fn with_broken_document(mut self, filename: &str) -> Self {
        self.documents.insert(filename.to_string(), None);
        self
    }
}

impl DocumentReader for StubReader {
    fn list_documents(&self) -> AppResult<Vec<String>> {
        let mut names: Vec<String> = self.documents.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn read_document(&self, filename: &str) -> AppResult<String> {
        match self.documents.get(filename) {
            Some(Some(pages)) => Ok(document_text(filename, pages)),
            Some(None) => Err(AppError::pdf(format!("cannot parse {}", filename))),
            None => Err(AppError::not_found(format!("document {}", filename))),
        }
    }
}
