//! Authenticated encryption primitive.

use chacha20poly1305::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce, Tag};

use super::error::{CipherError, CipherResult};
use super::secret::Secret;
use crate::constants::{NONCE_SIZE, TAG_SIZE};

/// Output of [`Cipher::encrypt`]: ciphertext with its detached IV and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Encrypted bytes (same length as the plaintext for stream AEADs).
    pub ciphertext: Vec<u8>,
    /// Per-message IV / nonce.
    pub iv: Vec<u8>,
    /// Authentication tag.
    pub tag: Vec<u8>,
}

/// AEAD cipher with detached IV and tag.
///
/// `associated_data` is authenticated but not encrypted; decryption with different
/// associated data must fail.
pub trait Cipher: Send + Sync {
    /// Encrypts `plaintext` under `secret`, generating a fresh IV.
    fn encrypt(
        &self,
        secret: &Secret,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> CipherResult<Sealed>;

    /// Authenticates and decrypts. Never returns output when authentication fails.
    fn decrypt(
        &self,
        secret: &Secret,
        ciphertext: &[u8],
        iv: &[u8],
        tag: &[u8],
        associated_data: &[u8],
    ) -> CipherResult<Vec<u8>>;
}

/// ChaCha20-Poly1305 with a random 96-bit nonce per message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaChaCipher;

impl ChaChaCipher {
    pub fn new() -> Self {
        Self
    }
}

impl Cipher for ChaChaCipher {
    fn encrypt(
        &self,
        secret: &Secret,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> CipherResult<Sealed> {
        let aead = ChaCha20Poly1305::new(Key::from_slice(secret.key_bytes()));
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

        let mut buffer = plaintext.to_vec();
        let tag = aead
            .encrypt_in_place_detached(&nonce, associated_data, &mut buffer)
            .map_err(|_| CipherError::EncryptionFailed)?;

        Ok(Sealed {
            ciphertext: buffer,
            iv: nonce.to_vec(),
            tag: tag.to_vec(),
        })
    }

    fn decrypt(
        &self,
        secret: &Secret,
        ciphertext: &[u8],
        iv: &[u8],
        tag: &[u8],
        associated_data: &[u8],
    ) -> CipherResult<Vec<u8>> {
        if iv.len() != NONCE_SIZE {
            return Err(CipherError::InvalidNonceLength {
                expected: NONCE_SIZE,
                actual: iv.len(),
            });
        }
        if tag.len() != TAG_SIZE {
            return Err(CipherError::InvalidTagLength {
                expected: TAG_SIZE,
                actual: tag.len(),
            });
        }

        let aead = ChaCha20Poly1305::new(Key::from_slice(secret.key_bytes()));
        let mut buffer = ciphertext.to_vec();
        aead.decrypt_in_place_detached(
            Nonce::from_slice(iv),
            associated_data,
            &mut buffer,
            Tag::from_slice(tag),
        )
        .map_err(|_| CipherError::AuthenticationFailed)?;

        Ok(buffer)
    }
}

/// Associated data binding a payload to its identity: `len(ref) u16 BE || ref || version u16 BE`.
///
/// The length prefix keeps `("ab", 0x6301)` and `("abc", 1)`-style pairs from colliding.
pub fn build_aad(object_ref: &str, version: u16) -> Vec<u8> {
    let ref_bytes = object_ref.as_bytes();
    let mut aad = Vec::with_capacity(2 + ref_bytes.len() + 2);
    aad.extend_from_slice(&(ref_bytes.len() as u16).to_be_bytes());
    aad.extend_from_slice(ref_bytes);
    aad.extend_from_slice(&version.to_be_bytes());
    aad
}
