//! Confstore - server configuration loading and validation
//!
//! Loads a server's configuration document (YAML or JSON), validates every
//! recognized setting against a schema, fills in defaults and exposes the
//! result as an immutable [`ConfigDocument`] plus a typed [`ServerSettings`]
//! view.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): values, documents, the schema and errors
//! - **Service Layer** (`services`): parsing, layer merging and validation
//! - **Infrastructure Layer** (`infrastructure`): file/env loading, hot reload, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use confstore::{ConfigStore, SettingValue};
//!
//! let doc = ConfigStore::default()
//!     .load(b"redis:\n  host: localhost\n  port: 6379\n")
//!     .unwrap();
//! assert_eq!(doc.get_int("redis.port"), Some(6379));
//! assert_eq!(doc.get("redis.user", "nobody"), SettingValue::from("nobody"));
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ConfigDocument, RetentionMode, RetentionObligation, ServerSettings, Setting, SettingSource,
    SettingValue,
};
pub use domain::{ConfigError, ConfigResult, Schema, SchemaEntry, Shape};
pub use infrastructure::config::{ConfigLoader, SharedConfig};
pub use services::{ConfigStore, Layer, LoadOptions, SourceFormat, Strictness};
