use thiserror::Error;

/// Errors returned by a [`super::Cipher`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// IV has the wrong size for the cipher.
    #[error("invalid nonce length: expected {expected} bytes, got {actual}")]
    InvalidNonceLength {
        /// Required size.
        expected: usize,
        /// Supplied size.
        actual: usize,
    },

    /// Authentication tag has the wrong size for the cipher.
    #[error("invalid tag length: expected {expected} bytes, got {actual}")]
    InvalidTagLength {
        /// Required size.
        expected: usize,
        /// Supplied size.
        actual: usize,
    },

    /// The AEAD primitive refused to encrypt.
    #[error("encryption failed")]
    EncryptionFailed,

    /// Wrong key, tampered data or mismatched associated data.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Convenience result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Errors returned while resolving or loading secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// No key is registered under this id.
    #[error("unknown secret key id: {key_id}")]
    UnknownKey {
        /// The requested key id.
        key_id: String,
    },

    /// Key material could not be used (bad encoding or size).
    #[error("invalid key material for {key_id}: {reason}")]
    InvalidKeyMaterial {
        /// Key id the material belongs to.
        key_id: String,
        /// Error message.
        reason: String,
    },

    /// A key ring specification could not be parsed.
    #[error("malformed key ring entry {entry:?}: expected id=base64key")]
    Malformed {
        /// The offending entry (never contains key material past the `=`).
        entry: String,
    },
}

/// Convenience result type for secret resolution.
pub type SecretResult<T> = Result<T, SecretError>;
