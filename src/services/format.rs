use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::models::{SettingValue, ValueMap};

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Yaml,
    Json,
}

impl SourceFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Parse raw bytes into a document tree.
    ///
    /// Whitespace-only input is an empty document. The root must be a mapping.
    pub fn parse(self, raw: &[u8]) -> ConfigResult<ValueMap> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(ValueMap::new());
        }

        let root = match self {
            Self::Yaml => serde_yaml::from_slice::<serde_yaml::Value>(raw)
                .map(SettingValue::from)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
            Self::Json => serde_json::from_slice::<serde_json::Value>(raw)
                .map(SettingValue::from)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        };

        match root {
            SettingValue::Map(map) => Ok(map),
            SettingValue::Null => Ok(ValueMap::new()),
            other => Err(ConfigError::ParseError(format!(
                "document root must be a mapping, found {}",
                other.kind()
            ))),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown format '{s}', expected yaml or json")),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        })
    }
}
