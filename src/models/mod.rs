//! Data Models
//!
//! The extracted product record and the application settings.

pub mod product;
pub mod settings;

pub use product::*;
pub use settings::*;
