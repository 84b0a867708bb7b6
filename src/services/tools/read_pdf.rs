//! PDF Reader Tool
//!
//! Gives the agent the raw text of a dataset document, for questions the
//! product table cannot answer.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use spec_rag_core::ToolContext;
use spec_rag_llm::types::ParameterSchema;
use spec_rag_tools::{Tool, ToolResult};

use crate::services::pdf::DocumentReader;
use crate::utils::error::AppError;

pub const READ_PDF_TOOL_NAME: &str = "tool_read_pdf_content";

/// Reads the full text of one dataset PDF.
pub struct ReadPdfTool {
    reader: Arc<dyn DocumentReader>,
}

impl ReadPdfTool {
    pub fn new(reader: Arc<dyn DocumentReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl Tool for ReadPdfTool {
    fn name(&self) -> &str {
        READ_PDF_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Allows to read entire content of arbitrary document from dataset folder in text format."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "filename".to_string(),
            ParameterSchema::string(Some("File name of required document")),
        );
        ParameterSchema::strict_object(None, properties)
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolResult {
        let filename = args
            .get("filename")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        tracing::debug!(
            session = %ctx.session_id(),
            round = ctx.round(),
            filename = %filename,
            "Reading PDF for agent"
        );

        let reader = Arc::clone(&self.reader);
        let name = filename.clone();
        let outcome = tokio::task::spawn_blocking(move || reader.read_document(&name)).await;

        match outcome {
            Ok(Ok(text)) => ToolResult::ok(text),
            Ok(Err(AppError::NotFound(_))) => {
                ToolResult::err("read pdf error: given file does not exist")
            }
            Err(e) => {
                tracing::error!(filename = %filename, error = %e, "PDF task panicked");
                ToolResult::err(format!("read pdf error: {}", e))
            }
            Ok(Err(e)) => {
                tracing::warn!(filename = %filename, error = %e, "PDF tool failed");
                ToolResult::err(format!("read pdf error: {}", e))
            }
        }
    }
}
