use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use super::loader::ConfigLoader;
use crate::domain::error::ConfigResult;
use crate::domain::models::ConfigDocument;

/// Hot-reloadable handle to the current configuration document.
///
/// Readers take lock-free snapshots; a reload builds a complete new document
/// first and then swaps a single pointer, so a snapshot is always one whole
/// document. Snapshots taken before a swap keep the old document alive.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<ConfigDocument>>,
}

impl SharedConfig {
    pub fn new(initial: ConfigDocument) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// Current document.
    pub fn snapshot(&self) -> Arc<ConfigDocument> {
        self.inner.load_full()
    }

    /// Install `document`, returning the one it replaced.
    pub fn replace(&self, document: ConfigDocument) -> Arc<ConfigDocument> {
        self.inner.swap(Arc::new(document))
    }

    /// Reload through `loader`. On failure the current document stays.
    pub fn reload(&self, loader: &ConfigLoader) -> ConfigResult<Arc<ConfigDocument>> {
        match loader.load() {
            Ok(document) => {
                let settings = document.len();
                let current = Arc::new(document);
                self.inner.store(Arc::clone(&current));
                info!(settings, "configuration reloaded");
                Ok(current)
            }
            Err(err) => {
                warn!(error = %err, "configuration reload failed, keeping current document");
                Err(err)
            }
        }
    }
}

impl From<ConfigDocument> for SharedConfig {
    fn from(document: ConfigDocument) -> Self {
        Self::new(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ConfigStore;
    use std::io::Write;
    use std::thread;

    fn load(raw: &str) -> ConfigDocument {
        ConfigStore::default().load(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_replace_swaps_whole_document() {
        let shared = SharedConfig::new(load("redis:\n  port: 6379\n"));
        let before = shared.snapshot();

        let previous = shared.replace(load("redis:\n  port: 6380\n"));

        assert_eq!(previous.get_int("redis.port"), Some(6379));
        assert_eq!(before.get_int("redis.port"), Some(6379), "old snapshot stays valid");
        assert_eq!(shared.snapshot().get_int("redis.port"), Some(6380));
    }

    #[test]
    fn test_failed_reload_keeps_current_document() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "redis:\n  port: 70000\n").unwrap();
        file.flush().unwrap();

        let shared = SharedConfig::new(load("redis:\n  port: 6379\n"));
        let loader = ConfigLoader::default().base_file(file.path());

        assert!(shared.reload(&loader).is_err());
        assert_eq!(shared.snapshot().get_int("redis.port"), Some(6379));
    }

    #[test]
    fn test_concurrent_readers_see_consistent_documents() {
        let a = load("redis:\n  host: alpha\n  port: 1001\n");
        let b = load("redis:\n  host: beta\n  port: 2002\n");
        let shared = SharedConfig::new(a.clone());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let doc = shared.snapshot();
                        match (doc.get_str("redis.host"), doc.get_int("redis.port")) {
                            (Some("alpha"), Some(1001)) | (Some("beta"), Some(2002)) => {}
                            other => panic!("torn document observed: {other:?}"),
                        }
                    }
                })
            })
            .collect();

        for i in 0..200 {
            shared.replace(if i % 2 == 0 { b.clone() } else { a.clone() });
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
