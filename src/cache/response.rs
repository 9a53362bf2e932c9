//! Read/compute/write coordination for producer results.
//!
//! [`ResponseCache`] sits in front of an expensive, idempotent producer
//! (typically a call to a remote text-generation service). Inputs are
//! fingerprinted with [`short_hash`](crate::fingerprint::short_hash); a hit
//! returns the stored value without calling the producer, a miss calls the
//! producer and stores the result only if it succeeded.
//!
//! # Locking
//!
//! One `tokio::sync::RwLock` guards every store operation. Lookups take it
//! shared, writes take it exclusive. The lock is never held while the
//! producer runs, so a slow producer blocks nobody.
//!
//! # Concurrent misses
//!
//! Lookup, produce and store are three separate steps. Two concurrent
//! `fetch_or_compute` calls for the same unseen input can both miss and
//! both invoke their producer; the later store wins. There is no
//! single-flight coalescing. What *is* guaranteed:
//!
//! - a hit never invokes the producer;
//! - a producer error (or a cancelled producer future) never reaches the
//!   store;
//! - no store operation is observed half-done.
//!
//! # Failure model
//!
//! Store failures never surface here. They are logged by
//! [`StoreAdapter`] and look like misses or dropped writes. The only error
//! a caller can receive is the producer's own.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tokio::sync::RwLock;
use tracing::debug;

use super::adapter::StoreAdapter;
use super::builder::ResponseCacheBuilder;
use super::entry::CacheEntry;
use crate::fingerprint::short_hash;
use crate::store::{FileStore, KeyValueStore, file};
use crate::{Result, telemetry};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "mimir.response.";

/// Where a cache keeps its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local [`MemoryStore`](crate::store::MemoryStore).
    Memory,
    /// [`FileStore`] rooted at the given directory.
    File(PathBuf),
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::File(file::default_dir())
    }
}

/// Configuration for a [`ResponseCache`].
///
/// ```rust
/// # use mimir::{CacheConfig, StoreBackend};
/// let config = CacheConfig::new()
///     .namespace("myapp.llm.")
///     .backend(StoreBackend::Memory);
/// assert_eq!(config.namespace, "myapp.llm.");
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Key prefix for every entry. Default: `mimir.response.`.
    pub namespace: String,
    /// Backing store. Default: file store under the user cache directory.
    pub backend: StoreBackend,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            backend: StoreBackend::default(),
        }
    }
}

impl CacheConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key prefix.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the backing store.
    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }
}

static SHARED: OnceLock<ResponseCache> = OnceLock::new();

/// Fingerprint-keyed cache of producer results.
pub struct ResponseCache {
    adapter: StoreAdapter,
    lock: RwLock<()>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

impl ResponseCache {
    /// Create a builder for configuring a cache.
    pub fn builder() -> ResponseCacheBuilder {
        ResponseCacheBuilder::new()
    }

    /// Build an independent cache from `config`.
    ///
    /// Fails only if the configuration is invalid (e.g. empty namespace).
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Self::builder()
            .namespace(config.namespace.clone())
            .backend(config.backend.clone())
            .build()
    }

    /// Wrap an existing store under `namespace`, skipping validation.
    pub fn with_store(namespace: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::from_adapter(StoreAdapter::new(namespace, store))
    }

    pub(crate) fn from_adapter(adapter: StoreAdapter) -> Self {
        Self {
            adapter,
            lock: RwLock::new(()),
        }
    }

    /// The process-wide default cache.
    ///
    /// Created on first use with the default namespace and a [`FileStore`]
    /// under the user cache directory. Use [`ResponseCache::new`] or the
    /// builder for isolated instances.
    pub fn shared() -> &'static ResponseCache {
        SHARED.get_or_init(|| {
            Self::with_store(DEFAULT_NAMESPACE, Arc::new(FileStore::at_default_dir()))
        })
    }

    /// The key prefix this cache writes under.
    pub fn namespace(&self) -> &str {
        self.adapter.namespace()
    }

    /// The namespaced store adapter.
    pub fn adapter(&self) -> &StoreAdapter {
        &self.adapter
    }

    /// Return the cached value for `input`, or run `producer` and cache its
    /// result.
    ///
    /// The producer receives an owned copy of `input`. It runs outside the
    /// cache lock. If it fails, the error is returned unchanged and nothing
    /// is stored.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use mimir::ResponseCache;
    /// # use mimir::store::MemoryStore;
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let cache = ResponseCache::with_store("doc.", Arc::new(MemoryStore::new()));
    /// let value = cache
    ///     .fetch_or_compute("2 + 2", |prompt| async move {
    ///         Ok::<_, std::io::Error>(format!("answer to {prompt}: 4"))
    ///     })
    ///     .await
    ///     .unwrap();
    /// assert_eq!(value, "answer to 2 + 2: 4");
    /// assert!(cache.is_cached("2 + 2").await);
    /// # }
    /// ```
    pub async fn fetch_or_compute<F, Fut, E>(
        &self,
        input: &str,
        producer: F,
    ) -> std::result::Result<String, E>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = std::result::Result<String, E>>,
    {
        let key = short_hash(input);

        let cached = {
            let _guard = self.lock.read().await;
            self.adapter.retrieve(&key).await
        };
        if let Some(value) = cached {
            debug!(key = %key, "cache hit");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            return Ok(value);
        }
        debug!(key = %key, "cache miss, invoking producer");
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);

        let value = match producer(input.to_string()).await {
            Ok(value) => {
                metrics::counter!(telemetry::PRODUCER_CALLS_TOTAL, "status" => "ok").increment(1);
                value
            }
            Err(e) => {
                metrics::counter!(telemetry::PRODUCER_CALLS_TOTAL, "status" => "error")
                    .increment(1);
                debug!(key = %key, "producer failed, nothing cached");
                return Err(e);
            }
        };

        {
            let _guard = self.lock.write().await;
            self.adapter.store(&key, &value, input).await;
        }
        Ok(value)
    }

    /// Store `value` for `input` directly, replacing any existing entry.
    pub async fn cache_response(&self, input: &str, value: &str) {
        let key = short_hash(input);
        let _guard = self.lock.write().await;
        self.adapter.store(&key, value, input).await;
    }

    /// Whether a readable entry exists for `input`.
    pub async fn is_cached(&self, input: &str) -> bool {
        let key = short_hash(input);
        let _guard = self.lock.read().await;
        self.adapter.exists(&key).await
    }

    /// The cached value for `input`, if any. Never invokes a producer.
    pub async fn get_cached_response(&self, input: &str) -> Option<String> {
        let key = short_hash(input);
        let cached = {
            let _guard = self.lock.read().await;
            self.adapter.retrieve(&key).await
        };
        let counter = if cached.is_some() {
            telemetry::CACHE_HITS_TOTAL
        } else {
            telemetry::CACHE_MISSES_TOTAL
        };
        metrics::counter!(counter).increment(1);
        cached
    }

    /// The full stored record for `input` (value, original input, write
    /// time), if any.
    pub async fn cached_entry(&self, input: &str) -> Option<CacheEntry> {
        let key = short_hash(input);
        let _guard = self.lock.read().await;
        self.adapter.retrieve_entry(&key).await
    }

    /// Delete the entry for `input`, if any.
    pub async fn remove_cached_response(&self, input: &str) {
        let key = short_hash(input);
        let _guard = self.lock.write().await;
        self.adapter.remove(&key).await;
    }

    /// Delete every entry in this cache's namespace.
    pub async fn clear_cache(&self) {
        let _guard = self.lock.write().await;
        self.adapter.clear_all().await;
    }

    /// Number of entries in this cache's namespace.
    pub async fn cache_count(&self) -> usize {
        let _guard = self.lock.read().await;
        self.adapter.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.backend, StoreBackend::File(file::default_dir()));
    }

    #[test]
    fn cache_config_builder() {
        let config = CacheConfig::new()
            .namespace("x.")
            .backend(StoreBackend::Memory);
        assert_eq!(config.namespace, "x.");
        assert_eq!(config.backend, StoreBackend::Memory);
    }

    #[test]
    fn shared_is_a_single_instance() {
        let a = ResponseCache::shared() as *const ResponseCache;
        let b = ResponseCache::shared() as *const ResponseCache;
        assert_eq!(a, b);
        assert_eq!(ResponseCache::shared().namespace(), DEFAULT_NAMESPACE);
    }
}
