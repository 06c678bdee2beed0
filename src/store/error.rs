use thiserror::Error;

use crate::cache::CacheBackendError;
use crate::crypto::SecretError;
use crate::envelope::EnvelopeError;
use crate::keys::ValidationError;
use crate::storage::TableError;

/// Errors returned by [`super::ObjectStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Bad ref or version.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No row exists for `(object_ref, version)`.
    #[error("object not found: {object_ref} v{version}")]
    NotFound {
        /// Requested ref.
        object_ref: String,
        /// Requested version.
        version: u16,
    },

    /// Payload integrity failure (corrupt envelope, failed decryption, foreign type).
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Tier 2 backend failure.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Tier 1 backend failure under [`crate::cache::CacheErrorPolicy::Throw`].
    #[error(transparent)]
    CacheBackend(#[from] CacheBackendError),

    /// An encrypted object was read or written without a usable secret.
    #[error("a secret is required for {object_ref} v{version}")]
    SecretRequired {
        /// Ref being accessed.
        object_ref: String,
        /// Version being accessed.
        version: u16,
        /// Key id the payload was sealed with, when reading.
        key_id: Option<String>,
    },

    /// The secret provider could not resolve a key id.
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// Programmer error, e.g. an encrypted row of a class that may only be cached in plain form.
    #[error("logic error: {0}")]
    Logic(String),
}

impl StoreError {
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// `true` for stored-data corruption (never retried as a miss).
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Envelope(
                EnvelopeError::CorruptEnvelope { .. }
                    | EnvelopeError::DecryptionFailed { .. }
                    | EnvelopeError::UnexpectedType { .. }
                    | EnvelopeError::UnsupportedSchema { .. }
                    | EnvelopeError::Serialization(_)
            )
        )
    }
}

/// Convenience result type for object store operations.
pub type StoreResult<T> = Result<T, StoreError>;
