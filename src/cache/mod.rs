//! Caching subsystem.
//!
//! - [`ResponseCache`] — the coordinator. Fingerprints inputs, answers hits
//!   from the store, runs the producer on misses and persists successes.
//!
//! - [`StoreAdapter`] — namespaced [`CacheEntry`] persistence over any
//!   [`KeyValueStore`](crate::store::KeyValueStore). Swallows and logs store
//!   faults.
//!
//! - [`ResponseCacheBuilder`] / [`CacheConfig`] — construction.

pub mod adapter;
pub mod builder;
pub mod entry;
pub mod response;

pub use adapter::StoreAdapter;
pub use builder::ResponseCacheBuilder;
pub use entry::CacheEntry;
pub use response::{CacheConfig, DEFAULT_NAMESPACE, ResponseCache, StoreBackend};
