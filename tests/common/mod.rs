//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use confstore::{ConfigDocument, ConfigStore};
use tempfile::NamedTempFile;

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Raw bytes of a fixture file.
pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("Failed to read fixture")
}

/// The sample server configuration loaded with the built-in schema.
pub fn sample_document() -> ConfigDocument {
    ConfigStore::default()
        .load(&fixture("custom.config.yaml"))
        .expect("Sample configuration should load")
}

/// Write `contents` to a temporary file with the given suffix.
pub fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    write!(file, "{contents}").expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
