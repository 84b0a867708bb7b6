//! Sales Agent
//!
//! Answers a customer question by letting the model call the PDF and SQL
//! tools until it replies without tool calls.
//!
//! Every response that requests tools is stored as a single assistant
//! message, followed by exactly one tool result per call id in call order.

use std::sync::Arc;

use tracing::{debug, error, info};

use spec_rag_core::ToolContext;
use spec_rag_llm::{LlmProvider, LlmRequestOptions, Message};
use spec_rag_tools::ToolRegistry;

use crate::models::settings::RagConfig;
use crate::services::tools::{EXECUTE_SQL_TOOL_NAME, READ_PDF_TOOL_NAME};
use crate::storage::database::create_table_sql;
use crate::utils::error::{AppError, AppResult};

/// Questions answered by `spec-rag demo`
pub const DEMO_QUESTIONS: [&str; 5] = [
    "How much does the XBO 4000 W/HS XL OFR weigh?",
    "Which luminaire is best suited for my home theater?",
    "Give me all lamps with at least 1500W and a lifetime of more than 3000 hours.",
    "What is the smallest unit I can order?",
    "Which luminaire has the SCIP number dd2ddf15-037b-4473-8156-97498e721fb3?",
];

/// System prompt with the tool names and the product table schema.
pub fn build_system_prompt() -> String {
    format!(
        "You are advanced sales assistant.\n\
         In the next message, you will get a customer question about the available assortment.\n\
         Your task is to answer the questions as much precise as possible.\n\
         Feel free to use available tools: {read_pdf}, {execute_sql}.\n\
         \n\
         Database details:\n\
         Engine: sqlite3\n\
         \n\
         !IMPORTANT!\n\
         For filtering text fields instead of equality (operator =), use fuzzy comparison using `like`.\n\
         For example, instead of `varchar_field = \"a\"` use `varchar_field like \"%a%\"`\n\
         This will provide a more sustainable results.\n\
         Also, if you wasn't able to find required data in the database, you have to make one or two more query trying find required data.\n\
         \n\
         Table schema:\n\
         ```\n\
         {ddl}\n\
         ```\n",
        read_pdf = READ_PDF_TOOL_NAME,
        execute_sql = EXECUTE_SQL_TOOL_NAME,
        ddl = create_table_sql(),
    )
}

/// Agent loop settings taken from `RagConfig`
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tool_rounds: usize,
}

impl From<&RagConfig> for AgentSettings {
    fn from(config: &RagConfig) -> Self {
        Self {
            model: config.agent_model.clone(),
            temperature: config.temperature,
            max_tool_rounds: config.max_tool_rounds,
        }
    }
}

/// Question-answering agent over the product database and dataset PDFs
pub struct SalesAgent {
    provider: Arc<dyn LlmProvider>,
    registry: ToolRegistry,
    settings: AgentSettings,
    system_prompt: String,
}

impl SalesAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        registry: ToolRegistry,
        settings: AgentSettings,
    ) -> Self {
        Self {
            provider,
            registry,
            settings,
            system_prompt: build_system_prompt(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn request_options(&self) -> LlmRequestOptions {
        LlmRequestOptions {
            temperature_override: Some(self.settings.temperature),
            model_override: Some(self.settings.model.clone()),
            ..Default::default()
        }
    }

    /// Answer one question.
    ///
    /// Returns the text of the first response without tool calls, or an
    /// empty string when that response carries no text.
    pub async fn answer(&self, question: &str) -> AppResult<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let tools = self.registry.definitions();
        let mut messages = vec![Message::user(question)];

        info!(session = %session_id, question = %question, "Answering question");

        let mut round = 0;
        loop {
            let response = self
                .provider
                .send_message(
                    messages.clone(),
                    Some(self.system_prompt.clone()),
                    tools.clone(),
                    self.request_options(),
                )
                .await?;

            debug!(
                session = %session_id,
                round,
                tool_calls = response.tool_calls.len(),
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "Agent response received"
            );

            if !response.has_tool_calls() {
                info!(session = %session_id, rounds = round, "Question answered");
                return Ok(response.content.unwrap_or_default());
            }

            // Tools of a round past the limit are never run
            round += 1;
            if round > self.settings.max_tool_rounds {
                error!(
                    session = %session_id,
                    max_rounds = self.settings.max_tool_rounds,
                    "Tool loop limit reached"
                );
                return Err(AppError::ToolLoopLimit(self.settings.max_tool_rounds));
            }

            messages.push(Message::assistant_tool_calls(
                response.content.as_deref(),
                &response.tool_calls,
            ));

            for call in &response.tool_calls {
                if !self.registry.contains(&call.name) {
                    error!(session = %session_id, tool = %call.name, "Unknown tool requested");
                    return Err(AppError::UnknownTool(call.name.clone()));
                }

                info!(
                    session = %session_id,
                    round,
                    tool = %call.name,
                    arguments = %call.arguments,
                    "Executing tool"
                );

                let ctx = ToolContext::new(&session_id, &call.id, round);
                let result = self
                    .registry
                    .execute(&call.name, &ctx, call.arguments.clone())
                    .await;

                messages.push(Message::tool_result(
                    &call.id,
                    result.to_content(),
                    !result.success,
                ));
            }
        }
    }
}
