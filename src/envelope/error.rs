use thiserror::Error;

use crate::crypto::CipherError;

/// Errors raised while encoding or decoding a stored payload.
///
/// Everything except [`EnvelopeError::EnvelopeTooLarge`] and [`EnvelopeError::Encryption`]
/// signals stored corruption, never absence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The binary envelope is truncated or its length prefixes are inconsistent.
    #[error("corrupt envelope: {reason}")]
    CorruptEnvelope {
        /// Error message.
        reason: String,
    },

    /// IV or tag does not fit a one-byte length prefix.
    #[error("envelope {field} is {len} bytes, maximum is 255")]
    EnvelopeTooLarge {
        /// `"iv"` or `"tag"`.
        field: &'static str,
        /// Actual length.
        len: usize,
    },

    /// Authentication or decryption of the ciphertext failed.
    #[error("failed to decrypt {object_ref} v{version}: {source}")]
    DecryptionFailed {
        /// Ref the payload was read for.
        object_ref: String,
        /// Version the payload was read for.
        version: u16,
        /// Underlying cipher failure.
        #[source]
        source: CipherError,
    },

    /// The payload holds a type the caller does not accept.
    #[error("unexpected stored type: expected {expected}, found {found}")]
    UnexpectedType {
        /// Type tag requested by the caller.
        expected: &'static str,
        /// Type tag found in the payload.
        found: String,
    },

    /// The payload was written by a newer schema than this reader supports.
    #[error("{type_tag} schema {found} is newer than supported schema {supported}")]
    UnsupportedSchema {
        /// Type tag of the payload.
        type_tag: String,
        /// Schema version found in the payload.
        found: u16,
        /// Highest schema version the reader understands.
        supported: u16,
    },

    /// The value could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The cipher refused to encrypt.
    #[error("encryption failed: {0}")]
    Encryption(#[source] CipherError),
}

/// Convenience result type for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
