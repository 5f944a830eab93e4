use std::path::{Path, PathBuf};

use figment::providers::Env;
use tracing::{debug, warn};

use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::models::{ConfigDocument, SettingSource, SettingValue, ValueMap};
use crate::services::{ConfigStore, Layer, SourceFormat};

/// Prefix of environment variables read by the binary.
pub const DEFAULT_ENV_PREFIX: &str = "CONFSTORE_SET_";

/// Configuration loader with hierarchical merging
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    store: ConfigStore,
    base: Option<PathBuf>,
    local: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    pub const fn new(store: ConfigStore) -> Self {
        Self {
            store,
            base: None,
            local: None,
            env_prefix: None,
        }
    }

    /// Primary configuration file; it must exist.
    #[must_use]
    pub fn base_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.base = Some(path.into());
        self
    }

    /// Local override file; skipped when absent.
    #[must_use]
    pub fn local_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.local = Some(path.into());
        self
    }

    /// Read overrides from `<prefix><SEGMENT>__<SEGMENT>` variables.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub const fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Schema defaults
    /// 2. Base file
    /// 3. Local override file (optional)
    /// 4. Environment variables (highest priority)
    ///
    /// File formats are picked from the file extension.
    pub fn load(&self) -> ConfigResult<ConfigDocument> {
        let mut layers = Vec::new();

        if let Some(path) = &self.base {
            layers.push(Layer::new(SettingSource::Document, read_file(path)?));
        }

        if let Some(path) = &self.local {
            if path.exists() {
                layers.push(Layer::new(SettingSource::Override, read_file(path)?));
            } else {
                debug!(path = %path.display(), "local override file not found, skipping");
            }
        }

        if let Some(prefix) = &self.env_prefix {
            let tree = self.env_layer(prefix);
            if !tree.is_empty() {
                layers.push(Layer::new(SettingSource::Environment, tree));
            }
        }

        self.store.load_layers(layers)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(store: &ConfigStore, path: impl AsRef<Path>) -> ConfigResult<ConfigDocument> {
        Self::new(store.clone()).base_file(path.as_ref()).load()
    }

    /// Environment variables mapped onto schema paths.
    ///
    /// Names are matched case-insensitively against schema keys, so
    /// `CONFSTORE_SET_REDIS__PORT` lands on `redis.port` and
    /// `CONFSTORE_SET_MEMCACHE__LOCAL` on the literal key `memcache.local`.
    /// Values stay raw strings; the schema shape decides their type.
    fn env_layer(&self, prefix: &str) -> ValueMap {
        let mut layer = ValueMap::new();

        for (key, value) in Env::prefixed(prefix).split("__").iter() {
            match self.store.schema().entry_ignore_case(key.as_str()) {
                Some(entry) => insert_at(&mut layer, &entry.path, SettingValue::String(value)),
                None => warn!(
                    variable = %format!("{prefix}{}", key.as_str().replace('.', "__").to_uppercase()),
                    "ignoring environment variable with no matching setting"
                ),
            }
        }

        layer
    }
}

fn read_file(path: &Path) -> ConfigResult<ValueMap> {
    let raw = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SourceFormat::from_path(path)
        .parse(&raw)
        .map_err(|err| match err {
            ConfigError::ParseError(msg) => {
                ConfigError::ParseError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
}

fn insert_at(map: &mut ValueMap, path: &[String], value: SettingValue) {
    match path {
        [] => {}
        [leaf] => {
            map.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let child = map
                .entry(head.clone())
                .or_insert_with(|| SettingValue::Map(ValueMap::new()));
            if let SettingValue::Map(inner) = child {
                insert_at(inner, rest, value);
            }
        }
    }
}
