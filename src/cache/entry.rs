//! Persisted cache record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MimirError, Result};

/// Current on-disk record format version.
pub(crate) const ENTRY_VERSION: u32 = 1;

/// One cached producer result, as persisted.
///
/// Serialized as a versioned JSON object. Unknown fields are rejected, so a
/// foreign JSON document stored under one of our keys fails to decode rather
/// than being mistaken for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheEntry {
    /// Record format version.
    pub version: u32,
    /// The producer's output, stored verbatim.
    pub value: String,
    /// The input the value was produced from. Diagnostic only.
    pub original_input: String,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// New entry stamped with the current time.
    pub fn new(value: impl Into<String>, original_input: impl Into<String>) -> Self {
        Self {
            version: ENTRY_VERSION,
            value: value.into(),
            original_input: original_input.into(),
            created_at: Utc::now(),
        }
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored record. Any failure means the bytes are corrupt or
    /// not ours.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let entry: CacheEntry = serde_json::from_slice(bytes)?;
        if entry.version > ENTRY_VERSION {
            return Err(MimirError::Decode(format!(
                "unsupported entry version {} (max supported: {ENTRY_VERSION})",
                entry.version
            )));
        }
        Ok(entry)
    }
}
