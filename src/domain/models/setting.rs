use std::fmt;

use serde::Serialize;

use super::value::SettingValue;

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingSource {
    /// Filled in from the schema default.
    Default,
    /// Primary configuration document.
    Document,
    /// Local override file layered on top of the document.
    Override,
    /// Environment variable.
    Environment,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Document => "document",
            Self::Override => "override",
            Self::Environment => "environment",
        })
    }
}

/// A single named configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    /// Dotted identifier, e.g. `redis.port` or `memcache.local`.
    pub key: String,
    /// Segments of the key inside the nested document. A segment may contain
    /// a dot itself (`["memcache.local"]` vs `["redis", "port"]`).
    #[serde(skip)]
    pub path: Vec<String>,
    pub value: SettingValue,
    pub source: SettingSource,
}

impl Setting {
    pub fn new(path: Vec<String>, value: SettingValue, source: SettingSource) -> Self {
        Self {
            key: path.join("."),
            path,
            value,
            source,
        }
    }
}
