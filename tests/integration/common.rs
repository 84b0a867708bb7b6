//! Shared fixtures for the integration tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use spec_rag::services::pdf::document_text;
use spec_rag::{AppError, AppResult, AppState, DocumentReader, ProductDatabase, ProductItem, RagConfig};
use spec_rag_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ToolCall,
    ToolDefinition,
};

/// Provider that replays scripted responses and records every conversation
pub struct ScriptedProvider {
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    conversations: Mutex<Vec<Vec<Message>>>,
    options: Mutex<Vec<LlmRequestOptions>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<LlmResult<LlmResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            conversations: Mutex::new(Vec::new()),
            options: Mutex::new(Vec::new()),
        })
    }

    pub fn conversations(&self) -> Vec<Vec<Message>> {
        self.conversations.lock().unwrap().clone()
    }

    pub fn options(&self) -> Vec<LlmRequestOptions> {
        self.options.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn send_message(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _tools: Vec<ToolDefinition>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.conversations.lock().unwrap().push(messages);
        self.options.lock().unwrap().push(request_options);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            });
        }
        responses.remove(0)
    }
}

/// Documents held in memory, keyed by filename
#[derive(Default)]
pub struct MemoryReader {
    documents: BTreeMap<String, String>,
}

impl MemoryReader {
    pub fn with(mut self, filename: &str, body: &str) -> Self {
        self.documents.insert(filename.to_string(), body.to_string());
        self
    }
}

impl DocumentReader for MemoryReader {
    fn list_documents(&self) -> AppResult<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read_document(&self, filename: &str) -> AppResult<String> {
        self.documents
            .get(filename)
            .map(|body| document_text(filename, &[body.as_str()]))
            .ok_or_else(|| AppError::not_found(format!("document {}", filename)))
    }
}

pub fn text(content: &str) -> LlmResult<LlmResponse> {
    Ok(LlmResponse::text("scripted", content))
}

pub fn calls(calls: &[(&str, &str, serde_json::Value)]) -> LlmResult<LlmResponse> {
    Ok(LlmResponse::with_tool_calls(
        "scripted",
        calls
            .iter()
            .map(|(id, name, arguments)| ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.clone(),
            })
            .collect(),
    ))
}

/// The XBO 4000 lamp as extracted from its spec sheet
pub fn xbo_4000() -> ProductItem {
    ProductItem {
        product_name: "XBO 4000 W/HS XL OFR".to_string(),
        product_family: "XBO".to_string(),
        application_areas: "Cinema projection".to_string(),
        rated_power: 4000.0,
        lifespan: 3000.0,
        product_weight: 391.0,
        packaging_unit: 1,
        scip_declaration_number: "dd2ddf15-037b-4473-8156-97498e721fb3".to_string(),
        ..Default::default()
    }
}

pub fn xbo_2000() -> ProductItem {
    ProductItem {
        product_name: "XBO 2000 W/SHSC OFR".to_string(),
        product_family: "XBO".to_string(),
        rated_power: 2000.0,
        lifespan: 2000.0,
        product_weight: 260.0,
        packaging_unit: 1,
        ..Default::default()
    }
}

pub fn item_json(item: &ProductItem) -> String {
    serde_json::to_string(item).unwrap()
}

/// App state over an in-memory database
pub fn state_with(
    reader: MemoryReader,
    provider: Arc<ScriptedProvider>,
    config: &RagConfig,
) -> (AppState, ProductDatabase) {
    let db = ProductDatabase::new_in_memory().unwrap();
    let state = AppState::from_parts(config, db.clone(), Arc::new(reader), provider);
    (state, db)
}
