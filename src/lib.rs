//! Spec RAG - Question Answering over Product Spec Sheets
//!
//! This library extracts structured product data from PDF spec sheets with a
//! language model, stores it in SQLite and answers questions through a
//! tool-calling agent.
//! It includes:
//! - Data models and settings
//! - Storage layer (SQLite, JSON config)
//! - Business logic services (PDF reading, extraction, ingestion, agent)
//! - Application state wiring the services for the CLI

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::product::{ProductItem, ProductRecord, PRODUCT_FIELDS};
pub use models::settings::{RagConfig, SettingsUpdate};
pub use services::agent::{AgentSettings, SalesAgent, DEMO_QUESTIONS};
pub use services::extraction::ProductExtractor;
pub use services::pdf::{DocumentReader, PdfDirectoryReader};
pub use state::AppState;
pub use storage::config::ConfigService;
pub use storage::database::ProductDatabase;
pub use utils::error::{AppError, AppResult};
