//! Mimir - persistent fingerprint-keyed cache for expensive calls
//!
//! Mimir deduplicates expensive, idempotent request/response pairs (calls
//! to a remote text-generation service, for example) by content
//! fingerprint. The first call for an input runs the producer and persists
//! its output. Later calls with the same input are answered from the store.
//! Failed producer calls are never cached.
//!
//! # Example
//!
//! ```rust,no_run
//! use mimir::ResponseCache;
//!
//! # async fn call_model(prompt: String) -> Result<String, std::io::Error> { Ok(prompt) }
//! #[tokio::main]
//! async fn main() -> Result<(), std::io::Error> {
//!     let cache = ResponseCache::shared();
//!
//!     let answer = cache
//!         .fetch_or_compute("What is the capital of France?", call_model)
//!         .await?;
//!
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! # Isolated instances
//!
//! ```rust
//! use mimir::ResponseCache;
//!
//! let cache = ResponseCache::builder()
//!     .namespace("tests.")
//!     .memory()
//!     .build()
//!     .unwrap();
//! # let _ = cache;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod store;
pub mod telemetry;

// Re-export main types at crate root
pub use cache::{
    CacheConfig, CacheEntry, DEFAULT_NAMESPACE, ResponseCache, ResponseCacheBuilder, StoreAdapter,
    StoreBackend,
};
pub use error::{MimirError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore};
