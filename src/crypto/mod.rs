//! Cipher, secrets and secret resolution.

pub mod cipher;
pub mod error;
pub mod provider;
pub mod secret;

#[cfg(test)]
mod tests;

pub use cipher::{ChaChaCipher, Cipher, Sealed, build_aad};
pub use error::{CipherError, CipherResult, SecretError, SecretResult};
pub use provider::{KeyRing, SecretProvider};
pub use secret::Secret;
