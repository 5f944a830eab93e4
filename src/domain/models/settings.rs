use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::document::ConfigDocument;
use super::retention::RetentionObligation;
use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::schema::{same_identifier, DEFAULT_PREVIEW_PROVIDERS};

/// Memcache implementation selected for a cache role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemcacheBackend {
    #[serde(rename = "APCu")]
    Apcu,
    Redis,
    Memcached,
    ArrayCache,
}

impl MemcacheBackend {
    /// Class identifier as written in configuration files.
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Apcu => r"\OC\Memcache\APCu",
            Self::Redis => r"\OC\Memcache\Redis",
            Self::Memcached => r"\OC\Memcache\Memcached",
            Self::ArrayCache => r"\OC\Memcache\ArrayCache",
        }
    }

    const ALL: [Self; 4] = [Self::Apcu, Self::Redis, Self::Memcached, Self::ArrayCache];
}

impl FromStr for MemcacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| same_identifier(b.identifier(), s))
            .ok_or_else(|| format!("unknown memcache backend '{s}'"))
    }
}

impl fmt::Display for MemcacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Cache backend per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheSettings {
    pub distributed: Option<MemcacheBackend>,
    pub local: Option<MemcacheBackend>,
    pub locking: Option<MemcacheBackend>,
}

/// Redis connection parameters.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RedisSettings {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub dbindex: Option<u32>,
}

impl fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("dbindex", &self.dbindex)
            .finish()
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: 6379,
            user: None,
            password: None,
            dbindex: None,
        }
    }
}

/// Preview generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSettings {
    pub enabled: bool,
    /// Provider identifiers in priority order.
    pub providers: Vec<String>,
    pub max_x: u32,
    pub max_y: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            providers: DEFAULT_PREVIEW_PROVIDERS.iter().map(ToString::to_string).collect(),
            max_x: 4096,
            max_y: 4096,
        }
    }
}

/// Typed view over a [`ConfigDocument`] handed to the features that consume
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerSettings {
    pub default_phone_region: Option<String>,
    pub cache: CacheSettings,
    pub redis: RedisSettings,
    pub rewrite_base: Option<String>,
    pub maintenance: bool,
    /// Hour (0-23) at which the maintenance window begins.
    pub maintenance_window_start: Option<u8>,
    pub previews: PreviewSettings,
    pub trashbin_retention: RetentionObligation,
    pub versions_retention: RetentionObligation,
}

impl ServerSettings {
    pub fn from_document(doc: &ConfigDocument) -> ConfigResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            default_phone_region: doc.get_str("default_phone_region").map(str::to_string),
            cache: CacheSettings {
                distributed: backend(doc, "memcache.distributed")?,
                local: backend(doc, "memcache.local")?,
                locking: backend(doc, "memcache.locking")?,
            },
            redis: RedisSettings {
                host: doc.get_str("redis.host").map(str::to_string),
                port: int(doc, "redis.port")?.unwrap_or(defaults.redis.port),
                user: doc.get_str("redis.user").map(str::to_string),
                password: doc.get_str("redis.password").map(str::to_string),
                dbindex: int(doc, "redis.dbindex")?,
            },
            rewrite_base: doc.get_str("htaccess.RewriteBase").map(str::to_string),
            maintenance: doc.get_bool("maintenance").unwrap_or(defaults.maintenance),
            maintenance_window_start: int(doc, "maintenance_window_start")?,
            previews: PreviewSettings {
                enabled: doc.get_bool("enable_previews").unwrap_or(defaults.previews.enabled),
                providers: doc.get_list("enabledPreviewProviders").map_or(
                    defaults.previews.providers,
                    |list| list.into_iter().map(str::to_string).collect(),
                ),
                max_x: int(doc, "preview_max_x")?.unwrap_or(defaults.previews.max_x),
                max_y: int(doc, "preview_max_y")?.unwrap_or(defaults.previews.max_y),
            },
            trashbin_retention: retention(doc, "trashbin_retention_obligation")?,
            versions_retention: retention(doc, "versions_retention_obligation")?,
        })
    }
}

fn backend(doc: &ConfigDocument, key: &str) -> ConfigResult<Option<MemcacheBackend>> {
    doc.get_str(key)
        .map(|s| {
            s.parse::<MemcacheBackend>()
                .map_err(|e| ConfigError::mismatch(key, "a memcache backend", e))
        })
        .transpose()
}

fn int<T: TryFrom<i64>>(doc: &ConfigDocument, key: &str) -> ConfigResult<Option<T>> {
    doc.get_int(key)
        .map(|i| {
            T::try_from(i).map_err(|_| {
                ConfigError::mismatch(key, std::any::type_name::<T>(), format!("integer {i}"))
            })
        })
        .transpose()
}

fn retention(doc: &ConfigDocument, key: &str) -> ConfigResult<RetentionObligation> {
    doc.get_str(key).map_or(Ok(RetentionObligation::default()), |s| {
        s.parse::<RetentionObligation>()
            .map_err(|e| ConfigError::mismatch(key, "a retention policy", format!("{s:?} ({e})")))
    })
}
