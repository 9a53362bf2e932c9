//! Telemetry metric name constants.
//!
//! Centralised metric names for mimir operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `status` — producer outcome: "ok" or "error"

/// Total lookups answered from the store.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total lookups that found nothing usable in the store.
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";

/// Total producer invocations made on cache misses.
///
/// Labels: `status` ("ok" | "error").
pub const PRODUCER_CALLS_TOTAL: &str = "mimir_producer_calls_total";

/// Total cache writes dropped because serialization or the store failed.
pub const STORE_WRITES_DROPPED_TOTAL: &str = "mimir_store_writes_dropped_total";

/// Total undecodable entries deleted on read.
pub const CORRUPT_ENTRIES_EVICTED_TOTAL: &str = "mimir_corrupt_entries_evicted_total";
