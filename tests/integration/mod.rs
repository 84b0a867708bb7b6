//! Integration Tests Module
//!
//! End-to-end tests of the spec-sheet pipeline with a scripted language model:
//! ingestion into SQLite, the tool-calling agent, and configuration loading.

// Scripted provider and in-memory document reader
mod common;

// Ingestion and first-run population
mod ingest_test;

// Agent loop over the real tools and database
mod agent_test;

// Config file, environment and CLI overrides
mod config_test;
