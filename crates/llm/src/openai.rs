//! OpenAI Provider
//!
//! Implementation of the LlmProvider trait for OpenAI's chat-completions API
//! and compatible endpoints. Supports tool calling and strict structured
//! outputs (`response_format: json_schema`).

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{status_error, LlmProvider};
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, MessageContent, MessageRole,
    ProviderConfig, ResponseFormat, StopReason, ToolCall, ToolDefinition, UsageStats,
};
use crate::http_client::build_http_client;

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const COMPLETIONS_PATH: &str = "/chat/completions";

/// OpenAI provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy.as_ref(), config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Resolve the completions endpoint.
    ///
    /// `base_url` may be either an API root (`https://host/v1`) or the full
    /// completions URL.
    fn endpoint(&self) -> String {
        match self.config.base_url.as_deref() {
            Some(base) => {
                let base = base.trim_end_matches('/');
                if base.ends_with(COMPLETIONS_PATH) {
                    base.to_string()
                } else {
                    format!("{}{}", base, COMPLETIONS_PATH)
                }
            }
            None => OPENAI_API_URL.to_string(),
        }
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
        tools: &[ToolDefinition],
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        let model = request_options
            .model_override
            .as_deref()
            .unwrap_or(&self.config.model);

        let mut body = serde_json::json!({
            "model": model,
            "max_tokens": self.config.max_tokens,
            "n": 1,
            "temperature": request_options
                .temperature_override
                .unwrap_or(self.config.temperature),
        });

        // Convert messages to OpenAI format
        let mut openai_messages: Vec<serde_json::Value> = Vec::new();

        if let Some(sys) = system {
            openai_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }

        for msg in messages {
            openai_messages.push(self.message_to_openai(msg));
        }

        body["messages"] = serde_json::json!(openai_messages);

        if !tools.is_empty() {
            let openai_tools: Vec<serde_json::Value> =
                tools.iter().map(|t| self.tool_to_openai(t)).collect();
            body["tools"] = serde_json::json!(openai_tools);
        }

        if let Some(format) = &request_options.response_format {
            body["response_format"] = Self::response_format_to_openai(format);
        }

        body
    }

    /// Convert a Message to OpenAI API format
    fn message_to_openai(&self, message: &Message) -> serde_json::Value {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        // Tool results are sent as separate `tool` messages in OpenAI format
        if let Some((tool_use_id, content)) = message.content.iter().find_map(|c| match c {
            MessageContent::ToolResult {
                tool_use_id,
                content,
                ..
            } => Some((tool_use_id, content)),
            _ => None,
        }) {
            return serde_json::json!({
                "role": "tool",
                "tool_call_id": tool_use_id,
                "content": content
            });
        }

        let tool_calls: Vec<serde_json::Value> = message
            .content
            .iter()
            .filter_map(|c| {
                if let MessageContent::ToolUse { id, name, input } = c {
                    Some(serde_json::json!({
                        "id": id,
                        "type": "function",
                        "function": {
                            "name": name,
                            "arguments": input.to_string()
                        }
                    }))
                } else {
                    None
                }
            })
            .collect();

        let text_content = message.text_content();

        if !tool_calls.is_empty() {
            let mut msg = serde_json::json!({
                "role": role,
                "tool_calls": tool_calls
            });

            // Always include content field; some OpenAI-compatible APIs
            // require it even when the assistant only emits tool calls.
            if text_content.is_empty() {
                msg["content"] = serde_json::Value::Null;
            } else {
                msg["content"] = serde_json::json!(text_content);
            }

            return msg;
        }

        serde_json::json!({
            "role": role,
            "content": text_content
        })
    }

    /// Convert a ToolDefinition to OpenAI API format
    fn tool_to_openai(&self, tool: &ToolDefinition) -> serde_json::Value {
        let mut function = serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.input_schema
        });
        if tool.strict {
            function["strict"] = serde_json::json!(true);
        }
        serde_json::json!({
            "type": "function",
            "function": function
        })
    }

    fn response_format_to_openai(format: &ResponseFormat) -> serde_json::Value {
        match format {
            ResponseFormat::JsonSchema {
                name,
                schema,
                strict,
            } => serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "schema": schema,
                    "strict": strict
                }
            }),
        }
    }

    /// Parse a response from OpenAI API
    fn parse_response(&self, response: &OpenAIResponse) -> LlmResponse {
        let choice = response.choices.first();

        let mut content = None;
        let mut refusal = None;
        let mut tool_calls = Vec::new();

        if let Some(msg) = choice.and_then(|c| c.message.as_ref()) {
            content = msg.content.clone();
            refusal = msg.refusal.clone();

            for tc in msg.tool_calls.iter().flatten() {
                let arguments = match serde_json::from_str(&tc.function.arguments) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(
                            tool = %tc.function.name,
                            call_id = %tc.id,
                            error = %e,
                            "Tool call arguments are not valid JSON"
                        );
                        serde_json::Value::Null
                    }
                };

                tool_calls.push(ToolCall {
                    id: tc.id.clone(),
                    name: tc.function.name.clone(),
                    arguments,
                });
            }
        }

        let stop_reason = choice
            .and_then(|c| c.finish_reason.as_ref())
            .map(|r| StopReason::from_finish_reason(r))
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .as_ref()
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        LlmResponse {
            content,
            refusal,
            tool_calls,
            stop_reason,
            usage,
            model: response.model.clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(LlmError::MissingApiKey)?;

        let body = self.build_request_body(&messages, system.as_deref(), &tools, &request_options);

        tracing::debug!(
            model = %body["model"],
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            return Err(status_error(status, &body_text));
        }

        let openai_response: OpenAIResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        let parsed = self.parse_response(&openai_response);
        tracing::debug!(
            tool_calls = parsed.tool_calls.len(),
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "Received chat completion"
        );
        Ok(parsed)
    }
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
