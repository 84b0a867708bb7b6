//! JSON Configuration Management
//!
//! Loads the optional configuration file and layers environment overrides
//! on top of it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{RagConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the API root
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the agent model
pub const ENV_AGENT_MODEL: &str = "SPEC_RAG_AGENT_MODEL";
/// Environment variable overriding the extraction model
pub const ENV_EXTRACTION_MODEL: &str = "SPEC_RAG_EXTRACTION_MODEL";

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    config: RagConfig,
}

impl ConfigService {
    /// Load the configuration.
    ///
    /// With a path, the file must exist. Without one, defaults are used.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let config = match config_path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            Some(path) => {
                return Err(AppError::not_found(format!(
                    "config file {}",
                    path.display()
                )))
            }
            None => RagConfig::default(),
        };

        Ok(Self {
            config_path: config_path.map(Path::to_path_buf),
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<RagConfig> {
        let content = fs::read_to_string(path)?;
        let config: RagConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &RagConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Read overrides from the environment through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn settings_from_env<F>(lookup: F) -> SettingsUpdate
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        SettingsUpdate {
            api_key: get(ENV_API_KEY),
            base_url: get(ENV_BASE_URL),
            agent_model: get(ENV_AGENT_MODEL),
            extraction_model: get(ENV_EXTRACTION_MODEL),
            ..Default::default()
        }
    }

    /// Apply overrides and re-validate
    pub fn apply_overrides(&mut self, update: SettingsUpdate) -> AppResult<&RagConfig> {
        self.config.apply_update(update);
        self.config.validate().map_err(AppError::validation)?;
        Ok(&self.config)
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &RagConfig {
        &self.config
    }

    /// Save the current configuration to the path it was loaded from, or to
    /// `path` when given.
    pub fn save(&self, path: Option<&Path>) -> AppResult<PathBuf> {
        let target = path
            .map(Path::to_path_buf)
            .or_else(|| self.config_path.clone())
            .ok_or_else(|| AppError::config("no config file path to save to"))?;
        Self::save_to_file(&target, &self.config)?;
        Ok(target)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self {
            config_path: None,
            config: RagConfig::default(),
        }
    }
}
