//! Builder for configuring cache instances

use std::path::PathBuf;
use std::sync::Arc;

use super::adapter::StoreAdapter;
use super::response::{DEFAULT_NAMESPACE, ResponseCache, StoreBackend};
use crate::fingerprint::SHORT_HASH_LEN;
use crate::store::{FileStore, KeyValueStore, MemoryStore, file};
use crate::{MimirError, Result};

enum StoreSource {
    Backend(StoreBackend),
    Custom(Arc<dyn KeyValueStore>),
}

/// Builder for [`ResponseCache`] instances.
///
/// ```rust
/// # use mimir::ResponseCache;
/// let cache = ResponseCache::builder()
///     .namespace("myapp.llm.")
///     .memory()
///     .build()
///     .unwrap();
/// assert_eq!(cache.namespace(), "myapp.llm.");
/// ```
pub struct ResponseCacheBuilder {
    namespace: String,
    source: StoreSource,
}

impl ResponseCacheBuilder {
    pub fn new() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            source: StoreSource::Backend(StoreBackend::default()),
        }
    }

    /// Set the key prefix. Must not be empty.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Select one of the bundled backends.
    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.source = StoreSource::Backend(backend);
        self
    }

    /// Keep entries in process memory only.
    pub fn memory(self) -> Self {
        self.backend(StoreBackend::Memory)
    }

    /// Keep entries as files under `dir`.
    pub fn file_store(self, dir: impl Into<PathBuf>) -> Self {
        self.backend(StoreBackend::File(dir.into()))
    }

    /// Use a caller-supplied store.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.source = StoreSource::Custom(store);
        self
    }

    /// Build the cache.
    ///
    /// An empty namespace is rejected: it would make clear/count operate on
    /// every key in a shared store. With a file store, a namespace too long
    /// for its keys to fit in a file name is rejected as well.
    pub fn build(self) -> Result<ResponseCache> {
        if self.namespace.is_empty() {
            return Err(MimirError::Configuration(
                "cache namespace must not be empty".to_string(),
            ));
        }

        if matches!(self.source, StoreSource::Backend(StoreBackend::File(_))) {
            let max = file::MAX_KEY_LEN - SHORT_HASH_LEN;
            if self.namespace.len() > max {
                return Err(MimirError::Configuration(format!(
                    "cache namespace is {} bytes, file store allows at most {max}",
                    self.namespace.len()
                )));
            }
        }

        let store: Arc<dyn KeyValueStore> = match self.source {
            StoreSource::Backend(StoreBackend::Memory) => Arc::new(MemoryStore::new()),
            StoreSource::Backend(StoreBackend::File(dir)) => Arc::new(FileStore::new(dir)),
            StoreSource::Custom(store) => store,
        };

        Ok(ResponseCache::from_adapter(StoreAdapter::new(
            self.namespace,
            store,
        )))
    }
}

impl Default for ResponseCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
