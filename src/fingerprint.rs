//! Content fingerprints for cache keys.
//!
//! Inputs are hashed with SHA-256 over their UTF-8 bytes and rendered as
//! lowercase hex. Unlike `DefaultHasher`, the digest is stable across
//! processes and runs, so it is safe to persist.

use sha2::{Digest, Sha256};

/// Length of [`hash`] output in hex characters.
pub const HASH_LEN: usize = 64;

/// Length of [`short_hash`] output in hex characters.
pub const SHORT_HASH_LEN: usize = 16;

/// Full SHA-256 fingerprint of `input` as 64 lowercase hex characters.
pub fn hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)
}

/// The first 16 hex characters of [`hash`], used as the compact cache key.
pub fn short_hash(input: &str) -> String {
    let mut full = hash(input);
    full.truncate(SHORT_HASH_LEN);
    full
}
