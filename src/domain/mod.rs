//! Domain layer for confstore
//!
//! This module contains the setting model, the schema table and the error
//! taxonomy. It has no knowledge of files or environment variables.

pub mod error;
pub mod models;
pub mod schema;

// Re-export error types for convenient access
pub use error::{ConfigError, ConfigResult};
pub use schema::{Schema, SchemaEntry, Shape};
