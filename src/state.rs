//! Application State
//!
//! Wires the configured services together for one CLI run.

use std::sync::Arc;

use spec_rag_llm::{LlmProvider, OpenAIProvider};

use crate::models::settings::RagConfig;
use crate::services::agent::{AgentSettings, SalesAgent};
use crate::services::extraction::ProductExtractor;
use crate::services::ingest;
use crate::services::pdf::{DocumentReader, PdfDirectoryReader};
use crate::services::tools::build_registry;
use crate::storage::database::{ProductDatabase, QueryRows};
use crate::utils::error::{AppError, AppResult};

/// Services shared by every command
pub struct AppState {
    database: ProductDatabase,
    reader: Arc<dyn DocumentReader>,
    extractor: ProductExtractor,
    agent: SalesAgent,
}

impl AppState {
    /// Open the database and build the OpenAI-backed services.
    pub fn initialize(config: &RagConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::config)?;

        let database = ProductDatabase::open(&config.database_path)?;
        let reader: Arc<dyn DocumentReader> =
            Arc::new(PdfDirectoryReader::new(config.dataset_dir.clone()));
        let provider: Arc<dyn LlmProvider> =
            Arc::new(OpenAIProvider::new(config.provider_config())?);

        tracing::info!(
            dataset = %config.dataset_dir.display(),
            database = %config.database_path.display(),
            agent_model = %config.agent_model,
            extraction_model = %config.extraction_model,
            "Services initialized"
        );

        Ok(Self::from_parts(config, database, reader, provider))
    }

    /// Build the state from already constructed collaborators.
    pub fn from_parts(
        config: &RagConfig,
        database: ProductDatabase,
        reader: Arc<dyn DocumentReader>,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        let extractor = ProductExtractor::new(provider.clone(), config.extraction_model.clone());
        let registry = build_registry(database.clone(), reader.clone());
        let agent = SalesAgent::new(provider, registry, AgentSettings::from(config));

        Self {
            database,
            reader,
            extractor,
            agent,
        }
    }

    /// Populate the database on the first run
    pub async fn ensure_populated(&self) -> AppResult<()> {
        ingest::ensure_populated(&self.database, self.reader.as_ref(), &self.extractor).await
    }

    /// Ingest every dataset document not yet stored
    pub async fn ingest(&self) -> AppResult<usize> {
        ingest::populate_database(&self.database, self.reader.as_ref(), &self.extractor).await
    }

    pub async fn answer(&self, question: &str) -> AppResult<String> {
        self.agent.answer(question).await
    }

    /// Run raw SQL against the product table
    pub fn query(&self, sql: &str) -> AppResult<QueryRows> {
        self.database.execute_sql(sql)
    }
}
