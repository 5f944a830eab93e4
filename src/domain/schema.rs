//! Schema table of recognized settings.
//!
//! Each entry names a key path, the shape its value must be coerced into, an
//! optional default and a few flags. The built-in table covers the settings
//! of a file-hosting server's `custom.config` file; custom tables can be
//! assembled from [`SchemaEntry`] values.

use super::error::{ConfigError, ConfigResult};
use super::models::retention::RetentionObligation;
use super::models::value::{SettingValue, ValueMap};

/// Memcache backend class identifiers accepted by `memcache.*` settings.
pub const MEMCACHE_BACKENDS: &[&str] = &[
    r"\OC\Memcache\APCu",
    r"\OC\Memcache\Redis",
    r"\OC\Memcache\Memcached",
    r"\OC\Memcache\ArrayCache",
];

/// Preview providers enabled when `enabledPreviewProviders` is not set.
pub const DEFAULT_PREVIEW_PROVIDERS: &[&str] = &[
    r"OC\Preview\BMP",
    r"OC\Preview\GIF",
    r"OC\Preview\JPEG",
    r"OC\Preview\Krita",
    r"OC\Preview\MarkDown",
    r"OC\Preview\MP3",
    r"OC\Preview\OpenDocument",
    r"OC\Preview\PNG",
    r"OC\Preview\TXT",
    r"OC\Preview\XBitmap",
];

/// Expected shape of a setting's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    String,
    Integer { min: i64, max: i64 },
    Boolean,
    /// Ordered list of strings; order is significant.
    StringList,
    Mapping,
    /// ISO 3166-1 alpha-2 region code, upper-cased on load.
    RegionCode,
    /// URL path beginning with `/`.
    UrlPath,
    /// One of a fixed set of identifiers, compared case-insensitively and
    /// ignoring a leading backslash.
    OneOf(&'static [&'static str]),
    /// Retention obligation policy string.
    Retention,
}

impl Shape {
    /// Human-readable description of what the shape accepts.
    pub fn expected(&self) -> String {
        match self {
            Self::String => "a string".to_string(),
            Self::Integer { min, max } if *max == i64::MAX => {
                format!("an integer of at least {min}")
            }
            Self::Integer { min, max } => format!("an integer between {min} and {max}"),
            Self::Boolean => "a boolean".to_string(),
            Self::StringList => "a list of strings".to_string(),
            Self::Mapping => "a mapping".to_string(),
            Self::RegionCode => "a two-letter region code".to_string(),
            Self::UrlPath => "a URL path starting with '/'".to_string(),
            Self::OneOf(ids) => format!("one of {}", ids.join(", ")),
            Self::Retention => "a retention policy such as 'auto', 'auto, 30' or '7, 30'".to_string(),
        }
    }

    /// Coerce `value` into this shape or fail with a type mismatch for `key`.
    pub fn coerce(&self, key: &str, value: SettingValue) -> ConfigResult<SettingValue> {
        let mismatch = |found: &SettingValue| ConfigError::mismatch(key, self.expected(), found.describe());

        match self {
            Self::String => match value {
                SettingValue::String(_) => Ok(value),
                SettingValue::Integer(i) => Ok(SettingValue::String(i.to_string())),
                other => Err(mismatch(&other)),
            },
            Self::Integer { min, max } => {
                let parsed = match &value {
                    SettingValue::Integer(i) => Some(*i),
                    SettingValue::String(s) => s.trim().parse::<i64>().ok(),
                    #[allow(clippy::cast_possible_truncation)]
                    SettingValue::Float(x) if x.fract() == 0.0 && x.abs() < 9.0e15 => Some(*x as i64),
                    _ => None,
                };
                match parsed {
                    Some(i) if (*min..=*max).contains(&i) => Ok(SettingValue::Integer(i)),
                    _ => Err(mismatch(&value)),
                }
            }
            Self::Boolean => {
                let parsed = match &value {
                    SettingValue::Boolean(b) => Some(*b),
                    SettingValue::Integer(0) => Some(false),
                    SettingValue::Integer(1) => Some(true),
                    SettingValue::String(s) => parse_bool(s),
                    _ => None,
                };
                parsed.map(SettingValue::Boolean).ok_or_else(|| mismatch(&value))
            }
            Self::StringList => coerce_string_list(value).map_err(|found| mismatch(&found)),
            Self::Mapping => match value {
                SettingValue::Map(_) => Ok(value),
                other => Err(mismatch(&other)),
            },
            Self::RegionCode => match value {
                SettingValue::String(s)
                    if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) =>
                {
                    Ok(SettingValue::String(s.to_ascii_uppercase()))
                }
                other => Err(mismatch(&other)),
            },
            Self::UrlPath => match value {
                SettingValue::String(s) if s.starts_with('/') => Ok(SettingValue::String(s)),
                other => Err(mismatch(&other)),
            },
            Self::OneOf(ids) => match value {
                SettingValue::String(s) if ids.iter().any(|id| same_identifier(id, &s)) => {
                    Ok(SettingValue::String(s))
                }
                other => Err(mismatch(&other)),
            },
            Self::Retention => match value {
                SettingValue::String(s) => match s.parse::<RetentionObligation>() {
                    Ok(_) => Ok(SettingValue::String(s.trim().to_string())),
                    Err(err) => Err(ConfigError::mismatch(
                        key,
                        self.expected(),
                        format!("string {s:?} ({err})"),
                    )),
                },
                other => Err(mismatch(&other)),
            },
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn same_identifier(a: &str, b: &str) -> bool {
    a.trim_start_matches('\\')
        .eq_ignore_ascii_case(b.trim_start_matches('\\'))
}

/// Accepts a list of strings, an index-keyed map (`{0: a, 1: b}`) or a
/// comma-separated string. Returns the offending value on failure.
fn coerce_string_list(value: SettingValue) -> Result<SettingValue, SettingValue> {
    match value {
        SettingValue::List(items) if items.iter().all(|i| i.as_str().is_some()) => {
            Ok(SettingValue::List(items))
        }
        SettingValue::Map(map) => indexed_list(map).map_err(SettingValue::Map),
        SettingValue::String(s) => Ok(SettingValue::List(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(SettingValue::from)
                .collect(),
        )),
        other => Err(other),
    }
}

fn indexed_list(map: ValueMap) -> Result<SettingValue, ValueMap> {
    let all_strings = map.values().all(|v| v.as_str().is_some());
    let mut indices: Vec<usize> = map.keys().filter_map(|k| k.parse().ok()).collect();
    indices.sort_unstable();
    let contiguous = indices.len() == map.len()
        && indices.iter().enumerate().all(|(pos, index)| pos == *index);
    if !all_strings || !contiguous {
        return Err(map);
    }

    let mut indexed: Vec<(usize, SettingValue)> = map
        .into_iter()
        .filter_map(|(k, v)| k.parse().ok().map(|index| (index, v)))
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    Ok(SettingValue::List(indexed.into_iter().map(|(_, v)| v).collect()))
}

/// One recognized setting.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub key: String,
    pub path: Vec<String>,
    pub shape: Shape,
    pub default: Option<SettingValue>,
    pub required: bool,
    /// Value is masked in human-facing output.
    pub secret: bool,
    pub description: String,
}

impl SchemaEntry {
    /// Create an entry from its path segments, e.g. `&["redis", "port"]`.
    pub fn new(path: &[&str], shape: Shape) -> Self {
        let path: Vec<String> = path.iter().map(ToString::to_string).collect();
        Self {
            key: path.join("."),
            path,
            shape,
            default: None,
            required: false,
            secret: false,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<SettingValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Table of recognized settings, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    pub const fn new(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }

    /// Schema with no recognized keys; every key is passthrough.
    pub const fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    #[must_use]
    pub fn with_entry(mut self, entry: SchemaEntry) -> Self {
        self.entries.retain(|e| e.key != entry.key);
        self.entries.push(entry);
        self
    }

    /// Built-in table for server `custom.config` settings.
    pub fn builtin() -> Self {
        let port = Shape::Integer { min: 1, max: 65535 };
        let dimension = Shape::Integer { min: 1, max: i64::MAX };

        Self::new(vec![
            SchemaEntry::new(&["default_phone_region"], Shape::RegionCode)
                .describe("Default region for phone-number parsing"),
            SchemaEntry::new(&["memcache.distributed"], Shape::OneOf(MEMCACHE_BACKENDS))
                .describe("Cache backend shared between servers"),
            SchemaEntry::new(&["memcache.local"], Shape::OneOf(MEMCACHE_BACKENDS))
                .describe("Cache backend local to one server"),
            SchemaEntry::new(&["memcache.locking"], Shape::OneOf(MEMCACHE_BACKENDS))
                .describe("Cache backend used for transactional file locking"),
            SchemaEntry::new(&["redis", "host"], Shape::String).describe("Redis host or socket path"),
            SchemaEntry::new(&["redis", "port"], port)
                .with_default(6379)
                .describe("Redis port"),
            SchemaEntry::new(&["redis", "user"], Shape::String).describe("Redis ACL user"),
            SchemaEntry::new(&["redis", "password"], Shape::String)
                .secret()
                .describe("Redis password"),
            SchemaEntry::new(&["redis", "dbindex"], Shape::Integer { min: 0, max: 65535 })
                .describe("Redis database index"),
            SchemaEntry::new(&["htaccess.RewriteBase"], Shape::UrlPath)
                .describe("Base path for URL rewriting"),
            SchemaEntry::new(&["maintenance_window_start"], Shape::Integer { min: 0, max: 23 })
                .describe("UTC hour at which the background maintenance window begins"),
            SchemaEntry::new(&["maintenance"], Shape::Boolean)
                .with_default(false)
                .describe("Maintenance mode"),
            SchemaEntry::new(&["enable_previews"], Shape::Boolean)
                .with_default(true)
                .describe("Generate preview images"),
            SchemaEntry::new(&["preview_max_x"], dimension)
                .with_default(4096)
                .describe("Maximum preview width in pixels"),
            SchemaEntry::new(&["preview_max_y"], dimension)
                .with_default(4096)
                .describe("Maximum preview height in pixels"),
            SchemaEntry::new(&["enabledPreviewProviders"], Shape::StringList)
                .with_default(DEFAULT_PREVIEW_PROVIDERS.to_vec())
                .describe("Enabled preview generators, in priority order"),
            SchemaEntry::new(&["trashbin_retention_obligation"], Shape::Retention)
                .with_default("auto")
                .describe("Retention policy for deleted files"),
            SchemaEntry::new(&["versions_retention_obligation"], Shape::Retention)
                .with_default("auto")
                .describe("Retention policy for file versions"),
        ])
    }

    pub fn entry(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Case-insensitive lookup, used for environment variable names.
    pub fn entry_ignore_case(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }

    pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether some entry lives strictly below `prefix` (e.g. `["redis"]`).
    pub fn is_namespace(&self, prefix: &[String]) -> bool {
        self.entries
            .iter()
            .any(|e| e.path.len() > prefix.len() && e.path.starts_with(prefix))
    }

    pub fn is_secret(&self, key: &str) -> bool {
        self.entry(key).is_some_and(|e| e.secret)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::builtin()
    }
}
