//! Configuration management infrastructure
//!
//! Hierarchical configuration on top of [`ConfigStore`](crate::services::ConfigStore):
//! - YAML / JSON file loading
//! - Local override files
//! - Environment variable overrides (figment)
//! - Hot reload through an atomically swapped document

pub mod loader;
pub mod shared;

pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use shared::SharedConfig;
