use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating or exporting configuration.
///
/// Every variant is produced at load time; a document that made it out of
/// [`ConfigStore::load`](crate::services::ConfigStore::load) never fails later.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed configuration document: {0}")]
    ParseError(String),

    #[error("Setting '{key}' expects {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Required setting '{0}' is missing")]
    MissingRequired(String),

    #[error("Unrecognized setting '{0}' (strict mode)")]
    UnknownKey(String),

    #[error("Setting '{0}' is defined more than once")]
    AmbiguousKey(String),

    #[error("Failed to read configuration from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

impl ConfigError {
    pub(crate) fn mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
