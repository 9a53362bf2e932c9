//! Mimir error types

use std::io::ErrorKind;

/// Mimir error types
///
/// These are only ever returned by store backends, configuration loading
/// and the builder. The cache coordinator swallows store errors (logging
/// them) and only surfaces the producer's own error type.
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Storage errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisted bytes parsed but are not a record this version understands.
    #[error("decode error: {0}")]
    Decode(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MimirError {
    /// Whether the failure might go away if the operation were retried.
    ///
    /// Only interrupted/timed-out/would-block I/O qualifies. The cache
    /// itself never retries; this is for callers driving a store directly.
    pub fn is_transient(&self) -> bool {
        match self {
            MimirError::Io(e) => matches!(
                e.kind(),
                ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
