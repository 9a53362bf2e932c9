//! Key-value store boundary.
//!
//! The cache treats its backing store as an opaque durable map. Anything
//! that can get, set, delete and enumerate byte values by string key can
//! back a [`ResponseCache`](crate::ResponseCache): an embedded database, a
//! preference store, a directory of files.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`] — process-local map, for tests and ephemeral use.
//! - [`FileStore`] — one file per key under a directory, atomic writes.
//!
//! Keys are full keys (namespace prefix included); the store knows nothing
//! about namespaces. Scoping is done by [`StoreAdapter`](crate::cache::StoreAdapter).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::Result;

/// Durable key/value persistence.
///
/// Each individual call must be atomic with respect to other calls on the
/// same store: a concurrent `get` never observes half of a `set`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// Read the raw bytes stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any existing value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Enumerate every key currently in the store.
    async fn keys(&self) -> Result<Vec<String>>;
}
