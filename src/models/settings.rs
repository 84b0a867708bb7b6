//! Settings Models
//!
//! Application configuration and settings data structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use spec_rag_core::ProxyConfig;
use spec_rag_llm::ProviderConfig;

/// Application configuration stored in the optional JSON config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Directory holding the product spec-sheet PDFs
    pub dataset_dir: PathBuf,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Model that answers questions and calls tools
    pub agent_model: String,
    /// Model used for structured extraction from PDF text
    pub extraction_model: String,
    /// Sampling temperature for both calls
    pub temperature: f32,
    /// Maximum tool-calling rounds per question
    pub max_tool_rounds: usize,
    /// Maximum tokens to generate per response
    pub max_tokens: u32,
    /// Whole-request timeout for each model call
    pub request_timeout_secs: u64,
    /// API root of an OpenAI-compatible endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Outbound proxy for model calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// API key; only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            database_path: PathBuf::from("rag_data.db"),
            agent_model: "gpt-4o".to_string(),
            extraction_model: "gpt-4o-2024-08-06".to_string(),
            temperature: 0.1,
            max_tool_rounds: 10,
            max_tokens: 4096,
            request_timeout_secs: 120,
            base_url: None,
            proxy: None,
            api_key: None,
        }
    }
}

/// Settings update (partial update), filled from the environment and CLI flags
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub dataset_dir: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub agent_model: Option<String>,
    pub extraction_model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl RagConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(dir) = update.dataset_dir {
            self.dataset_dir = dir;
        }
        if let Some(path) = update.database_path {
            self.database_path = path;
        }
        if let Some(model) = update.agent_model {
            self.agent_model = model;
        }
        if let Some(model) = update.extraction_model {
            self.extraction_model = model;
        }
        if let Some(url) = update.base_url {
            self.base_url = Some(url);
        }
        if let Some(key) = update.api_key {
            self.api_key = Some(key);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Invalid temperature: {}. Must be between 0 and 2",
                self.temperature
            ));
        }

        if self.max_tool_rounds < 1 {
            return Err("max_tool_rounds must be at least 1".to_string());
        }

        if self.agent_model.trim().is_empty() {
            return Err("agent_model must not be empty".to_string());
        }

        if self.extraction_model.trim().is_empty() {
            return Err("extraction_model must not be empty".to_string());
        }

        if self.request_timeout_secs < 1 {
            return Err("request_timeout_secs must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Provider configuration for the agent model
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.agent_model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_secs: self.request_timeout_secs,
            proxy: self.proxy.clone(),
        }
    }
}
