//! Product Extraction
//!
//! Turns the text of a spec sheet into a `ProductItem` with a strict
//! structured-output request.
//!
//! On a parse failure the request is retried once with a repair prompt that
//! includes the parse error and the original response.

use std::sync::Arc;

use tracing::debug;

use spec_rag_llm::{
    LlmProvider, LlmRequestOptions, LlmResponse, Message, ResponseFormat, StopReason,
};

use crate::models::product::ProductItem;
use crate::utils::error::{AppError, AppResult};

/// System prompt of the extraction call
pub const EXTRACTION_SYSTEM_PROMPT: &str = "Your task is to parse given text to specified schema. \
Please provide result as much accurate as possible";

/// User message carrying the document text
pub fn build_extraction_user_message(document_text: &str) -> String {
    format!("Document: ```{}```", document_text)
}

/// Build a repair prompt when the initial response fails to parse.
pub fn build_repair_prompt(original_response: &str, parse_error: &str) -> String {
    format!(
        "Your previous response could not be parsed as a valid product object.\n\n\
         Parse error: {}\n\n\
         Your previous response was:\n{}\n\n\
         Please respond with ONLY a JSON object that matches the schema, \
         with every field present. No markdown fences, no explanatory text.",
        parse_error, original_response
    )
}

/// Text content of an extraction response. A refusal or an empty reply is
/// an extraction error.
fn extract_response_text(response: &LlmResponse) -> AppResult<String> {
    if let Some(refusal) = response.refusal.as_deref().filter(|r| !r.trim().is_empty()) {
        return Err(AppError::extraction(format!(
            "model refused to extract the document: {}",
            refusal
        )));
    }
    if let Some(ref text) = response.content {
        if !text.trim().is_empty() {
            return Ok(text.clone());
        }
    }
    Err(AppError::extraction(format!(
        "response contained no text content (model: {}, stop_reason: {:?})",
        response.model, response.stop_reason
    )))
}

/// Pull a JSON object out of a response string.
///
/// Handles responses wrapped in markdown code fences or surrounded by prose.
fn extract_json_from_response(response_text: &str) -> String {
    let trimmed = response_text.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip optional language identifier (e.g., "json")
        let content_start = after_fence.find('\n').map(|nl| nl + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            return content[..end].trim().to_string();
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start <= end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Parse response text into a `ProductItem`.
pub fn parse_product_from_response(response_text: &str) -> Result<ProductItem, String> {
    let json_str = extract_json_from_response(response_text);
    if json_str.is_empty() {
        return Err("response is empty".to_string());
    }

    serde_json::from_str::<ProductItem>(&json_str).map_err(|e| {
        format!(
            "Failed to parse response as a product object: {}. JSON starts with: {:?}",
            e,
            json_str.chars().take(200).collect::<String>()
        )
    })
}

/// Runs extraction calls against a provider
pub struct ProductExtractor {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl ProductExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn request_options(&self) -> LlmRequestOptions {
        LlmRequestOptions {
            model_override: Some(self.model.clone()),
            response_format: Some(ResponseFormat::JsonSchema {
                name: ProductItem::SCHEMA_NAME.to_string(),
                schema: ProductItem::json_schema(),
                strict: true,
            }),
            ..Default::default()
        }
    }

    /// Extract a product from document text.
    pub async fn extract(&self, document_text: &str) -> AppResult<ProductItem> {
        let messages = vec![Message::user(build_extraction_user_message(document_text))];

        let response = self
            .provider
            .send_message(
                messages.clone(),
                Some(EXTRACTION_SYSTEM_PROMPT.to_string()),
                vec![],
                self.request_options(),
            )
            .await?;
        let response_text = extract_response_text(&response)?;
        if response.stop_reason == StopReason::MaxTokens {
            debug!(
                model = %self.model,
                output_tokens = response.usage.output_tokens,
                "extraction: response hit the token limit"
            );
        }

        let first_error = match parse_product_from_response(&response_text) {
            Ok(item) => return Ok(item),
            Err(e) => e,
        };

        tracing::warn!(
            model = %self.model,
            error = %first_error,
            "extraction: first response did not parse, retrying with repair prompt"
        );

        let mut retry_messages = messages;
        retry_messages.push(Message::assistant(&response_text));
        retry_messages.push(Message::user(build_repair_prompt(
            &response_text,
            &first_error,
        )));

        let retry_response = self
            .provider
            .send_message(
                retry_messages,
                Some(EXTRACTION_SYSTEM_PROMPT.to_string()),
                vec![],
                self.request_options(),
            )
            .await?;
        let retry_text = extract_response_text(&retry_response)?;

        parse_product_from_response(&retry_text).map_err(|second_error| {
            AppError::extraction(format!(
                "Failed to extract product after retry. First attempt error: {}. Retry error: {}",
                first_error, second_error
            ))
        })
    }
}
