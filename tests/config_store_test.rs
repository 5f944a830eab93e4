//! Integration tests for loading the sample server configuration.

mod common;

use common::{fixture, sample_document, setup_test_logging};
use confstore::{
    ConfigError, ConfigStore, RetentionMode, Schema, ServerSettings, SettingSource, SettingValue,
    Shape, SourceFormat, Strictness,
};

const PROVIDERS: [&str; 13] = [
    r"OC\Preview\PNG",
    r"OC\Preview\JPEG",
    r"OC\Preview\GIF",
    r"OC\Preview\BMP",
    r"OC\Preview\XBitmap",
    r"OC\Preview\Movie",
    r"OC\Preview\PDF",
    r"OC\Preview\MP3",
    r"OC\Preview\TXT",
    r"OC\Preview\MarkDown",
    r"OC\Preview\Image",
    r"OC\Preview\HEIC",
    r"OC\Preview\TIFF",
];

#[test]
fn test_sample_configuration_loads() {
    setup_test_logging();
    let doc = sample_document();

    assert_eq!(doc.get_int("maintenance_window_start"), Some(1));
    assert_eq!(doc.get_str("default_phone_region"), Some("BR"));
    assert_eq!(doc.get_str("memcache.local"), Some(r"\OC\Memcache\APCu"));
    assert_eq!(doc.get_str("memcache.distributed"), Some(r"\OC\Memcache\Redis"));
    assert_eq!(doc.get_str("redis.host"), Some("localhost"));
    assert_eq!(doc.get_int("redis.port"), Some(6379));
    assert_eq!(doc.get_str("htaccess.RewriteBase"), Some("/"));
}

#[test]
fn test_preview_providers_keep_document_order() {
    let doc = sample_document();
    assert_eq!(doc.get_list("enabledPreviewProviders"), Some(PROVIDERS.to_vec()));
}

#[test]
fn test_retention_obligation_parses_auto_with_maximum() {
    let doc = sample_document();
    for key in ["trashbin_retention_obligation", "versions_retention_obligation"] {
        let policy = doc.get_retention(key).unwrap();
        assert_eq!(policy.mode, RetentionMode::Auto);
        assert_eq!(policy.max_days, Some(30));
        assert_eq!(policy.min_days, None);
    }
}

#[test]
fn test_absent_settings_fall_back_to_defaults() {
    let doc = sample_document();

    assert_eq!(doc.get_bool("maintenance"), Some(false));
    assert_eq!(doc.source("maintenance"), Some(SettingSource::Default));
    assert_eq!(doc.source("redis.port"), Some(SettingSource::Document));

    assert_eq!(doc.get("redis.password", "none"), SettingValue::from("none"));
    assert_eq!(doc.get("no.such.key", 42), SettingValue::Integer(42));
    assert!(matches!(
        doc.get_required("redis.password"),
        Err(ConfigError::MissingRequired(ref key)) if key == "redis.password"
    ));
}

#[test]
fn test_every_schema_key_has_declared_type() {
    let doc = sample_document();
    for entry in Schema::builtin().entries() {
        let Some(value) = doc.lookup(&entry.key).map(|s| &s.value) else {
            assert!(entry.default.is_none(), "{} has a default but is missing", entry.key);
            continue;
        };
        let ok = match entry.shape {
            Shape::Integer { min, max } => value.as_int().is_some_and(|i| (min..=max).contains(&i)),
            Shape::Boolean => value.as_bool().is_some(),
            Shape::StringList => value.as_str_list().is_some(),
            Shape::Mapping => value.as_map().is_some(),
            _ => value.as_str().is_some(),
        };
        assert!(ok, "{} has {} but expected {}", entry.key, value.describe(), entry.shape.expected());
    }
}

#[test]
fn test_server_settings_view() {
    let settings = ServerSettings::from_document(&sample_document()).unwrap();

    assert_eq!(settings.redis.port, 6379);
    assert_eq!(settings.redis.host.as_deref(), Some("localhost"));
    assert_eq!(settings.maintenance_window_start, Some(1));
    assert_eq!(settings.previews.providers.len(), PROVIDERS.len());
    assert_eq!(settings.trashbin_retention.days(), Some(30));
    assert!(settings.previews.enabled);
}

#[test]
fn test_malformed_documents_are_parse_errors() {
    let store = ConfigStore::default();
    for raw in ["redis: [unterminated", "- just\n- a list\n", "42"] {
        let err = store.load(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)), "{raw:?} gave {err:?}");
    }

    let json = store.clone().with_format(SourceFormat::Json);
    assert!(matches!(json.load(b"{\"redis\": "), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_out_of_range_port_is_type_mismatch() {
    let raw = String::from_utf8(fixture("custom.config.yaml"))
        .unwrap()
        .replace("port: 6379", "port: 70000");
    let err = ConfigStore::default().load(raw.as_bytes()).unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { ref key, .. } if key == "redis.port"));
}

#[test]
fn test_strict_store_rejects_unknown_keys() {
    let raw = "maintenance_window_start: 1\noverwrite.cli.url: https://cloud.example.com\n";

    let permissive = ConfigStore::default().load(raw.as_bytes()).unwrap();
    assert_eq!(
        permissive.get_str("overwrite.cli.url"),
        Some("https://cloud.example.com")
    );

    let strict = ConfigStore::default().with_strictness(Strictness::Strict);
    assert!(matches!(
        strict.load(raw.as_bytes()),
        Err(ConfigError::UnknownKey(ref key)) if key == "overwrite.cli.url"
    ));
}

#[test]
fn test_export_reloads_to_equivalent_document() {
    let doc = sample_document();
    let store = ConfigStore::default();

    let from_yaml = store.load(doc.to_yaml().unwrap().as_bytes()).unwrap();
    assert!(doc.is_equivalent(&from_yaml));

    let from_json = store
        .clone()
        .with_format(SourceFormat::Json)
        .load(doc.to_json().unwrap().as_bytes())
        .unwrap();
    assert!(doc.is_equivalent(&from_json));
}

#[test]
fn test_index_keyed_provider_map_matches_list() {
    let from_json = ConfigStore::default()
        .with_format(SourceFormat::Json)
        .load(&fixture("custom.config.json"))
        .unwrap();

    assert_eq!(from_json.get_list("enabledPreviewProviders"), Some(PROVIDERS.to_vec()));
    assert!(sample_document().is_equivalent(&from_json));
}
