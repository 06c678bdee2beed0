use thiserror::Error;

/// Errors returned by an [`super::ObjectTable`] backend.
#[derive(Error, Debug)]
pub enum TableError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A row breaks the stored-object invariants.
    #[error("row invariant violated: {reason}")]
    InvariantViolation {
        /// Error message.
        reason: String,
    },

    /// Backend-specific failure (connection, worker, driver).
    #[error("table backend error: {0}")]
    Backend(String),
}

/// Convenience result type for table operations.
pub type TableResult<T> = Result<T, TableError>;
