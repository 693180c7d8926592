//! Error types for cache resolution

use std::path::PathBuf;
use thiserror::Error;

/// Opaque error produced by a caller-supplied query executor.
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One failed entry inside a batch resolution.
#[derive(Debug, Error)]
#[error("entry {index} (`{snippet}`): {error}")]
pub struct BatchFailure {
    /// Position of the entry in the input sequence
    pub index: usize,

    /// Truncated SQL text identifying the entry
    pub snippet: String,

    /// The underlying failure
    #[source]
    pub error: CacheError,
}

/// Errors surfaced by `resolve` and `resolve_all`.
///
/// Nothing here is retried internally. Executor, codec and filesystem
/// failures propagate to the call site unchanged; there is no fallback
/// to stale cache data on a fetch failure.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("query execution failed for `{snippet}`: {source}")]
    Executor {
        snippet: String,
        #[source]
        source: ExecutorError,
    },

    /// Serialization or deserialization failed. An unreadable artifact on a
    /// fresh hit is a hard failure, not a silent cache miss.
    #[error("codec failure at {path}: {message}")]
    Codec { path: PathBuf, message: String },

    #[error("filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown serialization format: {0}")]
    UnknownFormat(String),

    #[error("schema mismatch when concatenating tables: expected columns {expected:?}, got {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// An isolated worker thread panicked while resolving an entry.
    #[error("query worker panicked: {0}")]
    WorkerPanic(String),

    #[error("{} of {total} batched queries failed", .failures.len())]
    Batch {
        total: usize,
        failures: Vec<BatchFailure>,
    },
}

impl CacheError {
    /// Wrap a filesystem error with the path it occurred at.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a codec failure with the artifact path it occurred at.
    pub(crate) fn codec(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CacheError::Codec {
            path: path.into(),
            message: message.into(),
        }
    }
}
