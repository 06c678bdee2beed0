//! Named symmetric keys.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::{SecretError, SecretResult};
use crate::constants::KEY_SIZE;

/// A named 256-bit symmetric key.
///
/// The `reference` is what gets persisted as a row's `key_id`; the key bytes are
/// wiped on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    #[zeroize(skip)]
    reference: String,
    key: [u8; KEY_SIZE],
}

impl Secret {
    /// Creates a secret from raw key bytes.
    pub fn new(reference: impl Into<String>, key: [u8; KEY_SIZE]) -> Self {
        Self {
            reference: reference.into(),
            key,
        }
    }

    /// Creates a secret from a byte slice, checking its length.
    pub fn from_slice(reference: impl Into<String>, key: &[u8]) -> SecretResult<Self> {
        let reference = reference.into();
        let key: [u8; KEY_SIZE] = key.try_into().map_err(|_| SecretError::InvalidKeyMaterial {
            key_id: reference.clone(),
            reason: format!("expected {} bytes, got {}", KEY_SIZE, key.len()),
        })?;
        Ok(Self::new(reference, key))
    }

    /// Key id persisted alongside payloads encrypted with this secret.
    #[inline]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Raw key bytes.
    #[inline]
    pub fn key_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("reference", &self.reference)
            .field("key", &"<redacted>")
            .finish()
    }
}
