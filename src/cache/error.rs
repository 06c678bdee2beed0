use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by a [`super::DistributedCache`] backend.
pub enum CacheBackendError {
    /// The backend could not be reached.
    #[error("cache backend unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },

    /// A single operation failed.
    #[error("cache {op} failed for {key}: {reason}")]
    Operation {
        /// `"get"`, `"set"` or `"delete"`.
        op: &'static str,
        /// Cache key involved.
        key: String,
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for cache backend operations.
pub type CacheResult<T> = Result<T, CacheBackendError>;
