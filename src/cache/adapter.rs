//! Namespaced entry persistence on top of a [`KeyValueStore`].
//!
//! [`StoreAdapter`] never returns an error. Every store or codec failure is
//! logged and degraded to "as if absent": a failed read is a miss, a failed
//! write is dropped, an unreadable store counts zero entries. Caching is an
//! optimisation; it must not take the host application down.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::entry::CacheEntry;
use crate::store::KeyValueStore;
use crate::telemetry;

/// Reads and writes [`CacheEntry`] records under a fixed key prefix.
///
/// Keys passed in are short hashes; the adapter prepends the namespace.
/// Keys in the underlying store outside the namespace are never read,
/// counted or deleted.
#[derive(Clone)]
pub struct StoreAdapter {
    namespace: String,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreAdapter")
            .field("namespace", &self.namespace)
            .field("store", &self.store.name())
            .finish()
    }
}

impl StoreAdapter {
    /// Wrap `store`, scoping all operations to keys starting with `namespace`.
    pub fn new(namespace: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            namespace: namespace.into(),
            store,
        }
    }

    /// The key prefix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The underlying store.
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }

    /// Write an entry for `value`, overwriting any existing one.
    ///
    /// Failures are logged and the write is dropped.
    pub async fn store(&self, key: &str, value: &str, original_input: &str) {
        let full_key = self.full_key(key);
        let bytes = match CacheEntry::new(value, original_input).to_bytes() {
            Ok(b) => b,
            Err(e) => {
                warn!(key = %full_key, error = %e, "failed to serialize cache entry, dropping write");
                metrics::counter!(telemetry::STORE_WRITES_DROPPED_TOTAL).increment(1);
                return;
            }
        };
        match self.store.set(&full_key, bytes).await {
            Ok(()) => debug!(key = %full_key, "stored cache entry"),
            Err(e) => {
                warn!(
                    key = %full_key,
                    store = self.store.name(),
                    error = %e,
                    "failed to write cache entry, dropping write"
                );
                metrics::counter!(telemetry::STORE_WRITES_DROPPED_TOTAL).increment(1);
            }
        }
    }

    /// Read the full entry stored under `key`.
    ///
    /// An entry that fails to decode is deleted and reported as absent, so
    /// one corrupt record cannot keep missing forever.
    pub async fn retrieve_entry(&self, key: &str) -> Option<CacheEntry> {
        let full_key = self.full_key(key);
        let bytes = match self.store.get(&full_key).await {
            Ok(Some(b)) => b,
            Ok(None) => return None,
            Err(e) => {
                warn!(
                    key = %full_key,
                    store = self.store.name(),
                    error = %e,
                    "failed to read cache entry"
                );
                return None;
            }
        };

        match CacheEntry::from_bytes(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key = %full_key, error = %e, "corrupt cache entry, evicting");
                metrics::counter!(telemetry::CORRUPT_ENTRIES_EVICTED_TOTAL).increment(1);
                if let Err(e) = self.store.delete(&full_key).await {
                    warn!(key = %full_key, error = %e, "failed to evict corrupt cache entry");
                }
                None
            }
        }
    }

    /// Read the cached value under `key`.
    pub async fn retrieve(&self, key: &str) -> Option<String> {
        self.retrieve_entry(key).await.map(|entry| entry.value)
    }

    /// Whether a readable entry exists under `key`.
    ///
    /// Goes through [`retrieve_entry`](Self::retrieve_entry), so a corrupt
    /// entry is evicted here too and reported as absent.
    pub async fn exists(&self, key: &str) -> bool {
        self.retrieve_entry(key).await.is_some()
    }

    /// Delete the entry under `key`, if any.
    pub async fn remove(&self, key: &str) {
        let full_key = self.full_key(key);
        if let Err(e) = self.store.delete(&full_key).await {
            warn!(key = %full_key, error = %e, "failed to remove cache entry");
        }
    }

    /// Delete every key in the namespace. Other keys are left alone.
    pub async fn clear_all(&self) {
        let keys = self.namespaced_keys().await;
        let total = keys.len();
        let mut removed = 0usize;
        for key in keys {
            match self.store.delete(&key).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(key = %key, error = %e, "failed to remove cache entry"),
            }
        }
        info!(namespace = %self.namespace, removed, total, "cleared cache");
    }

    /// Number of keys in the namespace.
    pub async fn count(&self) -> usize {
        self.namespaced_keys().await.len()
    }

    async fn namespaced_keys(&self) -> Vec<String> {
        match self.store.keys().await {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.namespace))
                .collect(),
            Err(e) => {
                warn!(
                    namespace = %self.namespace,
                    store = self.store.name(),
                    error = %e,
                    "failed to enumerate cache keys"
                );
                Vec::new()
            }
        }
    }
}
