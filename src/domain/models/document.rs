use std::collections::BTreeMap;

use serde::Serialize;

use super::retention::RetentionObligation;
use super::setting::{Setting, SettingSource};
use super::value::{SettingValue, ValueMap};
use crate::domain::error::{ConfigError, ConfigResult};
use crate::domain::schema::Schema;

/// Immutable, validated collection of settings for one process run.
///
/// Built by [`ConfigStore`](crate::services::ConfigStore); there is no way to
/// mutate a document once it exists. Share it by reference or `Arc`, or swap
/// whole documents through [`SharedConfig`](crate::infrastructure::config::SharedConfig).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    settings: BTreeMap<String, Setting>,
}

impl ConfigDocument {
    pub(crate) const fn from_settings(settings: BTreeMap<String, Setting>) -> Self {
        Self { settings }
    }

    /// Value for `key`, or `default` if the key is absent.
    pub fn get(&self, key: &str, default: impl Into<SettingValue>) -> SettingValue {
        self.settings
            .get(key)
            .map_or_else(|| default.into(), |s| s.value.clone())
    }

    /// Value for `key`; absence is an error.
    pub fn get_required(&self, key: &str) -> ConfigResult<&SettingValue> {
        self.settings
            .get(key)
            .map(|s| &s.value)
            .ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
    }

    pub fn lookup(&self, key: &str) -> Option<&Setting> {
        self.settings.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key)?.value.as_str()
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.settings.get(key)?.value.as_int()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.settings.get(key)?.value.as_bool()
    }

    /// String list in its stored order.
    pub fn get_list(&self, key: &str) -> Option<Vec<&str>> {
        self.settings.get(key)?.value.as_str_list()
    }

    /// Parsed retention policy; `None` if absent or not a policy string.
    pub fn get_retention(&self, key: &str) -> Option<RetentionObligation> {
        self.get_str(key)?.parse().ok()
    }

    pub fn source(&self, key: &str) -> Option<SettingSource> {
        self.settings.get(key).map(|s| s.source)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    /// All settings, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.values()
    }

    /// Settings `schema` does not recognize, kept verbatim.
    pub fn passthrough<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = &'a Setting> + 'a {
        self.settings.values().filter(|s| schema.entry(&s.key).is_none())
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Same keys mapped to the same values, ignoring where they came from.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.settings.len() == other.settings.len()
            && self
                .settings
                .iter()
                .all(|(key, s)| other.settings.get(key).is_some_and(|o| o.value == s.value))
    }

    /// Re-nest every setting along its path into a document tree.
    pub fn to_tree(&self) -> ValueMap {
        let mut root = ValueMap::new();
        for setting in self.settings.values() {
            insert_at(&mut root, &setting.path, setting.value.clone());
        }
        root
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(&self.to_tree()).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.to_tree())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

fn insert_at(node: &mut ValueMap, path: &[String], value: SettingValue) {
    match path {
        [] => {}
        [leaf] => {
            node.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let child = node
                .entry(head.clone())
                .or_insert_with(|| SettingValue::Map(ValueMap::new()));
            if !matches!(child, SettingValue::Map(_)) {
                *child = SettingValue::Map(ValueMap::new());
            }
            if let SettingValue::Map(map) = child {
                insert_at(map, rest, value);
            }
        }
    }
}
