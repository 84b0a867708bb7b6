//! Agent Tools
//!
//! The two tools the question-answering agent may call, and the registry
//! that holds them.

pub mod execute_sql;
pub mod read_pdf;

use std::sync::Arc;

use spec_rag_tools::ToolRegistry;

use crate::services::pdf::DocumentReader;
use crate::storage::database::ProductDatabase;

pub use execute_sql::{ExecuteSqlTool, EXECUTE_SQL_TOOL_NAME};
pub use read_pdf::{ReadPdfTool, READ_PDF_TOOL_NAME};

/// Registry with the PDF reader followed by the SQL executor.
pub fn build_registry(db: ProductDatabase, reader: Arc<dyn DocumentReader>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ReadPdfTool::new(reader)));
    registry.register(Arc::new(ExecuteSqlTool::new(db)));
    registry
}
