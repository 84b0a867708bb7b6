//! SQL Tool
//!
//! Forwards the model's query verbatim to the product database.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use spec_rag_core::ToolContext;
use spec_rag_llm::types::ParameterSchema;
use spec_rag_tools::{Tool, ToolResult};

use crate::storage::database::ProductDatabase;

pub const EXECUTE_SQL_TOOL_NAME: &str = "tool_execute_sql";

pub struct ExecuteSqlTool {
    db: ProductDatabase,
}

impl ExecuteSqlTool {
    pub fn new(db: ProductDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ExecuteSqlTool {
    fn name(&self) -> &str {
        EXECUTE_SQL_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Executes given SQL query in the database"
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "sql_query".to_string(),
            ParameterSchema::string(Some("SQL query for finding a required data")),
        );
        ParameterSchema::strict_object(None, properties)
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolResult {
        let sql = args
            .get("sql_query")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        tracing::debug!(session = %ctx.session_id(), round = ctx.round(), sql = %sql, "Executing SQL for agent");

        let db = self.db.clone();
        let query = sql.clone();
        let outcome = tokio::task::spawn_blocking(move || db.execute_sql(&query)).await;

        // Engine errors go back to the model so it can fix the query
        let rows = match outcome {
            Ok(Ok(rows)) => rows,
            Err(e) => {
                tracing::error!(sql = %sql, error = %e, "SQL task panicked");
                return ToolResult::err(format!("query error: {}", e));
            }
            Ok(Err(e)) => {
                tracing::error!(sql = %sql, error = %e, "SQL query failed");
                return ToolResult::err(format!("query error: {}", e));
            }
        };

        match serde_json::to_string(&rows) {
            Ok(json) => ToolResult::ok(format!("query results: {}", json)),
            Err(e) => ToolResult::err(format!("query error: {}", e)),
        }
    }
}
