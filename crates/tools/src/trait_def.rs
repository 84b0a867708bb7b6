//! Tool Trait and Registry
//!
//! Defines the unified `Tool` trait interface and `ToolRegistry` for
//! tool registration, lookup, and execution.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use spec_rag_core::ToolContext;
use spec_rag_llm::types::{ParameterSchema, ToolDefinition};

use crate::executor::ToolResult;
use crate::validation::validate_arguments;

/// Unified tool interface.
///
/// Tools are registered in a `ToolRegistry` and dispatched by name when the
/// model requests them.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of this tool (e.g., "tool_execute_sql")
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does
    fn description(&self) -> &str;

    /// JSON schema describing the tool's input parameters
    fn parameters_schema(&self) -> ParameterSchema;

    /// Whether the API should enforce the schema exactly. Default: true.
    fn is_strict(&self) -> bool {
        true
    }

    /// Execute the tool with the given context and arguments.
    ///
    /// Arguments have already been validated against `parameters_schema`
    /// when called through `ToolRegistry::execute`.
    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolResult;
}

/// Registry of available tools.
///
/// Provides O(1) lookup by name and generates tool definitions in
/// registration order.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Insertion order for deterministic iteration
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. If a tool with the same name already exists, it is replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Whether a tool with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool definitions, suitable for sending to LLM providers.
    /// Returned in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters_schema(),
                strict: tool.is_strict(),
            })
            .collect()
    }

    /// Get all registered tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate the arguments and execute a tool by name.
    ///
    /// Returns `ToolResult::err` if the tool is not found or the arguments
    /// do not match its schema.
    pub async fn execute(&self, name: &str, ctx: &ToolContext, args: Value) -> ToolResult {
        let Some(tool) = self.tools.get(name) else {
            return ToolResult::err(format!("Unknown tool: {}", name));
        };

        if let Err(e) = validate_arguments(&tool.parameters_schema(), &args) {
            tracing::warn!(
                tool = %name,
                call_id = %ctx.tool_call_id(),
                error = %e,
                "Rejected tool call arguments"
            );
            return ToolResult::err(e.to_string());
        }

        tool.execute(ctx, args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
