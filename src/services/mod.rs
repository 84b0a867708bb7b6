//! Business Logic Services
//!
//! PDF reading, structured extraction, ingestion and the question-answering
//! agent with its tools.

pub mod agent;
pub mod extraction;
pub mod ingest;
pub mod pdf;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;
