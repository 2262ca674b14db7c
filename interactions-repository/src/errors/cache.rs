//! Error types for the local vote cache.
use thiserror::Error;

/// Represents errors raised while loading or flushing a file-backed cache.
///
/// `LocalVoteCache` itself is infallible; these errors only surface from the
/// explicit `open` and `flush` calls of `FileVoteCache`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
}
