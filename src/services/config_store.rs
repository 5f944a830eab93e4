use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use figment::providers::Serialized;
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::format::SourceFormat;
use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::models::{ConfigDocument, Setting, SettingSource, SettingValue, ValueMap};
use crate::domain::schema::Schema;

/// Policy for keys the schema does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Keep unknown keys verbatim as passthrough settings.
    #[default]
    Permissive,
    /// Reject unknown keys with [`ConfigError::UnknownKey`].
    Strict,
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("unknown strictness '{s}', expected permissive or strict")),
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub strictness: Strictness,
    #[serde(default)]
    pub format: SourceFormat,
}

/// One parsed input together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub source: SettingSource,
    pub tree: ValueMap,
}

impl Layer {
    pub const fn new(source: SettingSource, tree: ValueMap) -> Self {
        Self { source, tree }
    }
}

/// Parses, validates and defaults configuration documents against a schema.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    schema: Schema,
    options: LoadOptions,
}

impl ConfigStore {
    pub const fn new(schema: Schema, options: LoadOptions) -> Self {
        Self { schema, options }
    }

    #[must_use]
    pub const fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.options.strictness = strictness;
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: SourceFormat) -> Self {
        self.options.format = format;
        self
    }

    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    pub const fn options(&self) -> LoadOptions {
        self.options
    }

    /// Parse and validate a single document.
    ///
    /// Either returns a fully validated document or fails; there is no
    /// partial result.
    pub fn load(&self, raw: &[u8]) -> ConfigResult<ConfigDocument> {
        let tree = self.options.format.parse(raw)?;
        self.load_layers(vec![Layer::new(SettingSource::Document, tree)])
    }

    /// Merge `layers` in order (later layers win), then validate the result.
    ///
    /// Maps are merged recursively; any other value, lists included, is
    /// replaced wholesale. Each setting records the source of the last layer
    /// that supplied it.
    #[instrument(skip_all, fields(layers = layers.len(), strictness = %self.options.strictness))]
    pub fn load_layers(&self, layers: Vec<Layer>) -> ConfigResult<ConfigDocument> {
        let mut merged = merge_layers(&layers)?;

        let mut settings = BTreeMap::new();
        let mut defaulted = 0usize;

        for entry in self.schema.entries() {
            let (value, source) = match take_entry(&mut merged, &entry.path, &entry.key)? {
                Some((raw, path)) => (
                    entry.shape.coerce(&entry.key, raw)?,
                    source_of(&layers, &path),
                ),
                None => match &entry.default {
                    Some(default) => {
                        debug!(key = %entry.key, value = %default, "applying schema default");
                        defaulted += 1;
                        (default.clone(), SettingSource::Default)
                    }
                    None if entry.required => {
                        return Err(ConfigError::MissingRequired(entry.key.clone()));
                    }
                    None => continue,
                },
            };
            settings.insert(
                entry.key.clone(),
                Setting::new(entry.path.clone(), value, source),
            );
        }

        let mut leftovers = Vec::new();
        collect_leftovers(&self.schema, merged, &mut Vec::new(), &mut leftovers)?;
        let passthrough = leftovers.len();

        for (path, value) in leftovers {
            let key = path.join(".");
            if self.options.strictness == Strictness::Strict {
                return Err(ConfigError::UnknownKey(key));
            }
            if settings.contains_key(&key) {
                return Err(ConfigError::AmbiguousKey(key));
            }
            warn!(key = %key, "unrecognized setting retained as passthrough");
            let source = source_of(&layers, &path);
            settings.insert(key, Setting::new(path, value, source));
        }

        info!(
            settings = settings.len(),
            defaulted,
            passthrough,
            "configuration loaded"
        );

        Ok(ConfigDocument::from_settings(settings))
    }
}

/// Deep-merge layers in order. Maps merge key by key; any other value, lists
/// included, is replaced by the later layer.
fn merge_layers(layers: &[Layer]) -> ConfigResult<ValueMap> {
    if layers.is_empty() {
        return Ok(ValueMap::new());
    }
    let figment = layers.iter().fold(Figment::new(), |figment, layer| {
        figment.merge(Serialized::globals(&layer.tree))
    });
    let merged: serde_json::Value = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(format!("merging layers: {e}")))?;
    match SettingValue::from(merged) {
        SettingValue::Map(map) => Ok(map),
        _ => Ok(ValueMap::new()),
    }
}

/// Remove the value for a schema entry, written either along its nested
/// `path` or as a single literal dotted `key` at the top level. Null counts as
/// absent. Returns the value with the path it was found under.
fn take_entry(
    merged: &mut ValueMap,
    path: &[String],
    key: &str,
) -> ConfigResult<Option<(SettingValue, Vec<String>)>> {
    let present = |value: Option<SettingValue>| value.filter(|v| *v != SettingValue::Null);

    let nested = present(take_at(merged, path));
    let literal = if path.len() > 1 {
        present(merged.remove(key))
    } else {
        None
    };

    match (nested, literal) {
        (Some(_), Some(_)) => Err(ConfigError::AmbiguousKey(key.to_string())),
        (Some(value), None) => Ok(Some((value, path.to_vec()))),
        (None, Some(value)) => Ok(Some((value, vec![key.to_string()]))),
        (None, None) => Ok(None),
    }
}

/// Remove and return the value at `path`, pruning maps left empty.
fn take_at(map: &mut ValueMap, path: &[String]) -> Option<SettingValue> {
    match path {
        [] => None,
        [leaf] => map.remove(leaf),
        [head, rest @ ..] => {
            let SettingValue::Map(child) = map.get_mut(head)? else {
                return None;
            };
            let taken = take_at(child, rest);
            if child.is_empty() {
                map.remove(head);
            }
            taken
        }
    }
}

fn lookup<'a>(map: &'a ValueMap, path: &[String]) -> Option<&'a SettingValue> {
    let (first, rest) = path.split_first()?;
    map.get(first)?.pointer(rest)
}

fn source_of(layers: &[Layer], path: &[String]) -> SettingSource {
    layers
        .iter()
        .rev()
        .find(|layer| lookup(&layer.tree, path).is_some())
        .map_or(SettingSource::Document, |layer| layer.source)
}

/// Flatten whatever the schema did not consume into `(path, value)` pairs.
///
/// Maps that are namespaces of schema keys (such as `redis`) are descended
/// into so unknown siblings keep their full path; anything else is kept whole.
fn collect_leftovers(
    schema: &Schema,
    map: ValueMap,
    prefix: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, SettingValue)>,
) -> ConfigResult<()> {
    for (key, value) in map {
        prefix.push(key);
        if schema.is_namespace(prefix) {
            match value {
                SettingValue::Map(inner) => collect_leftovers(schema, inner, prefix, out)?,
                SettingValue::Null => {}
                other => {
                    return Err(ConfigError::mismatch(
                        prefix.join("."),
                        "a mapping",
                        other.describe(),
                    ));
                }
            }
        } else {
            out.push((prefix.clone(), value));
        }
        prefix.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{SchemaEntry, Shape};

    const SAMPLE: &str = r"
default_phone_region: BR
memcache.distributed: \OC\Memcache\Redis
memcache.local: \OC\Memcache\APCu
memcache.locking: \OC\Memcache\Redis
redis:
  host: localhost
  port: 6379
htaccess.RewriteBase: /
maintenance_window_start: 1
enabledPreviewProviders:
  - OC\Preview\PNG
  - OC\Preview\JPEG
  - OC\Preview\GIF
trashbin_retention_obligation: auto,30
versions_retention_obligation: auto,30
";

    fn yaml(raw: &str) -> ValueMap {
        SourceFormat::Yaml.parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_sample_document() {
        let doc = ConfigStore::default().load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.get("maintenance_window_start", -1), SettingValue::Integer(1));
        assert_eq!(doc.get_int("redis.port"), Some(6379));
        assert_eq!(doc.get_str("memcache.local"), Some(r"\OC\Memcache\APCu"));
        assert_eq!(doc.source("redis.host"), Some(SettingSource::Document));
        assert_eq!(doc.source("maintenance"), Some(SettingSource::Default));
    }

    #[test]
    fn test_port_out_of_range_is_type_mismatch() {
        for port in ["0", "65536", "-1"] {
            let raw = format!("redis:\n  port: {port}\n");
            let err = ConfigStore::default().load(raw.as_bytes()).unwrap_err();
            assert!(
                matches!(err, ConfigError::TypeMismatch { ref key, .. } if key == "redis.port"),
                "port {port}: {err}"
            );
        }
    }

    #[test]
    fn test_null_value_falls_back_to_default() {
        let doc = ConfigStore::default().load(b"redis:\n  port: ~\n").unwrap();
        assert_eq!(doc.get_int("redis.port"), Some(6379));
        assert_eq!(doc.source("redis.port"), Some(SettingSource::Default));
    }

    #[test]
    fn test_unknown_keys_permissive_and_strict() {
        let raw = b"trusted_domains: [cloud.example.com]\nredis:\n  host: localhost\n  timeout: 1.5\n";

        let doc = ConfigStore::default().load(raw).unwrap();
        assert_eq!(
            doc.get_list("trusted_domains"),
            Some(vec!["cloud.example.com"])
        );
        assert_eq!(doc.get("redis.timeout", 0), SettingValue::Float(1.5));

        let err = ConfigStore::default()
            .with_strictness(Strictness::Strict)
            .load(raw)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref key) if key == "redis.timeout" || key == "trusted_domains"));
    }

    #[test]
    fn test_namespace_with_scalar_value_is_mismatch() {
        let err = ConfigStore::default().load(b"redis: localhost\n").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref key, .. } if key == "redis"));
    }

    #[test]
    fn test_literal_and_nested_key_collision_is_ambiguous() {
        let err = ConfigStore::default()
            .load(b"redis.port: 6380\nredis:\n  port: 6379\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousKey(ref key) if key == "redis.port"));
    }

    #[test]
    fn test_flat_dotted_key_resolves_to_schema_entry() {
        let doc = ConfigStore::default().load(b"redis.port: 6380\nredis.host: cache\n").unwrap();
        assert_eq!(doc.get_int("redis.port"), Some(6380));
        assert_eq!(doc.get_str("redis.host"), Some("cache"));
        assert_eq!(doc.source("redis.port"), Some(SettingSource::Document));

        let exported = ConfigStore::default().load(doc.to_yaml().unwrap().as_bytes()).unwrap();
        assert!(doc.is_equivalent(&exported));
    }

    #[test]
    fn test_flat_dotted_key_is_validated() {
        let err = ConfigStore::default().load(b"redis.port: 70000\n").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref key, .. } if key == "redis.port"));

        let err = ConfigStore::default().load(b"redis.dbindex: not-a-number\n").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref key, .. } if key == "redis.dbindex"));
    }

    #[test]
    fn test_strict_mode_accepts_flat_dotted_schema_key() {
        let doc = ConfigStore::default()
            .with_strictness(Strictness::Strict)
            .load(b"redis.host: cache\n")
            .unwrap();
        assert_eq!(doc.get_str("redis.host"), Some("cache"));
    }

    #[test]
    fn test_flat_and_nested_in_different_layers_is_ambiguous() {
        let err = ConfigStore::default()
            .load_layers(vec![
                Layer::new(SettingSource::Document, yaml("redis:\n  host: localhost\n")),
                Layer::new(SettingSource::Override, yaml("redis.host: cache\n")),
            ])
            .unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousKey(ref key) if key == "redis.host"));
    }

    #[test]
    fn test_required_entry_missing() {
        let schema = Schema::builtin()
            .with_entry(SchemaEntry::new(&["redis", "host"], Shape::String).required());
        let store = ConfigStore::new(schema, LoadOptions::default());

        let err = store.load(b"maintenance: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(ref key) if key == "redis.host"));
        assert!(store.load(b"redis:\n  host: cache\n").is_ok());
    }

    #[test]
    fn test_layers_merge_and_track_sources() {
        let store = ConfigStore::default();
        let doc = store
            .load_layers(vec![
                Layer::new(SettingSource::Document, yaml("redis:\n  host: localhost\n  port: 6379\n")),
                Layer::new(SettingSource::Override, yaml("redis:\n  port: 6380\n")),
                Layer::new(SettingSource::Environment, yaml("maintenance: 'true'\n")),
            ])
            .unwrap();

        assert_eq!(doc.get_str("redis.host"), Some("localhost"));
        assert_eq!(doc.source("redis.host"), Some(SettingSource::Document));
        assert_eq!(doc.get_int("redis.port"), Some(6380));
        assert_eq!(doc.source("redis.port"), Some(SettingSource::Override));
        assert_eq!(doc.get_bool("maintenance"), Some(true));
        assert_eq!(doc.source("maintenance"), Some(SettingSource::Environment));
    }

    #[test]
    fn test_lists_are_replaced_not_concatenated() {
        let doc = ConfigStore::default()
            .load_layers(vec![
                Layer::new(SettingSource::Document, yaml("enabledPreviewProviders: [PNG, JPEG]\n")),
                Layer::new(SettingSource::Override, yaml("enabledPreviewProviders: [GIF]\n")),
            ])
            .unwrap();
        assert_eq!(doc.get_list("enabledPreviewProviders"), Some(vec!["GIF"]));
    }

    #[test]
    fn test_empty_schema_passes_everything_through() {
        let store = ConfigStore::new(Schema::empty(), LoadOptions::default());
        let doc = store.load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.get("redis", 0).as_map().map(BTreeMap::len), Some(2));
        assert_eq!(doc.get_str("trashbin_retention_obligation"), Some("auto,30"));
    }

    #[test]
    fn test_strictness_from_str() {
        assert_eq!("STRICT".parse::<Strictness>().unwrap(), Strictness::Strict);
        assert_eq!("permissive".parse::<Strictness>().unwrap(), Strictness::Permissive);
        assert!("lenient".parse::<Strictness>().is_err());
    }
}
