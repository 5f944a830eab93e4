//! Domain models for loaded configuration.

pub mod document;
pub mod retention;
pub mod setting;
pub mod settings;
pub mod value;

pub use document::ConfigDocument;
pub use retention::{InvalidRetention, RetentionMode, RetentionObligation};
pub use setting::{Setting, SettingSource};
pub use settings::{CacheSettings, MemcacheBackend, PreviewSettings, RedisSettings, ServerSettings};
pub use value::{SettingValue, ValueMap};
