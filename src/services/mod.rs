//! Service layer: the configuration store and document formats.

pub mod config_store;
pub mod format;

pub use config_store::{ConfigStore, Layer, LoadOptions, Strictness};
pub use format::SourceFormat;
