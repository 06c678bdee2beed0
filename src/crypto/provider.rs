//! Secret resolution by key id.

use std::collections::HashMap;
use std::env;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use parking_lot::RwLock;
use zeroize::Zeroizing;

use super::error::{SecretError, SecretResult};
use super::secret::Secret;

/// Resolves the secret a row was encrypted with from its persisted `key_id`.
///
/// Injected into [`crate::store::ObjectStore`]; only used on the decrypt side.
pub trait SecretProvider: Send + Sync {
    /// Returns the secret registered under `key_id`.
    fn resolve(&self, key_id: &str) -> SecretResult<Secret>;
}

/// In-memory key ring keyed by [`Secret::reference`].
#[derive(Default)]
pub struct KeyRing {
    keys: RwLock<HashMap<String, Secret>>,
}

impl KeyRing {
    /// Environment variable read by [`KeyRing::from_env`].
    pub const ENV_KEYS: &'static str = "TIERSTORE_KEYS";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ring from the given secrets.
    pub fn with_secrets(secrets: impl IntoIterator<Item = Secret>) -> Self {
        let ring = Self::new();
        for secret in secrets {
            ring.insert(secret);
        }
        ring
    }

    /// Registers (or replaces) a secret under its reference.
    pub fn insert(&self, secret: Secret) {
        self.keys
            .write()
            .insert(secret.reference().to_string(), secret);
    }

    /// Removes a secret; returns `true` if it was present.
    pub fn remove(&self, key_id: &str) -> bool {
        self.keys.write().remove(key_id).is_some()
    }

    pub fn contains(&self, key_id: &str) -> bool {
        self.keys.read().contains_key(key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Loads `TIERSTORE_KEYS` (`id=base64key[,id=base64key...]`). Unset yields an empty ring.
    pub fn from_env() -> SecretResult<Self> {
        match env::var(Self::ENV_KEYS) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(Self::new()),
        }
    }

    /// Parses a comma-separated `id=base64key` list.
    pub fn parse(list: &str) -> SecretResult<Self> {
        let ring = Self::new();

        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key_id, encoded) = entry.split_once('=').ok_or_else(|| SecretError::Malformed {
                entry: redact(entry),
            })?;
            let key_id = key_id.trim();
            if key_id.is_empty() {
                return Err(SecretError::Malformed {
                    entry: redact(entry),
                });
            }

            let raw = Zeroizing::new(BASE64.decode(encoded.trim()).map_err(|e| {
                SecretError::InvalidKeyMaterial {
                    key_id: key_id.to_string(),
                    reason: e.to_string(),
                }
            })?);
            ring.insert(Secret::from_slice(key_id, &raw)?);
        }

        Ok(ring)
    }
}

impl SecretProvider for KeyRing {
    fn resolve(&self, key_id: &str) -> SecretResult<Secret> {
        self.keys
            .read()
            .get(key_id)
            .cloned()
            .ok_or_else(|| SecretError::UnknownKey {
                key_id: key_id.to_string(),
            })
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<String> = self.keys.read().keys().cloned().collect();
        ids.sort();
        f.debug_struct("KeyRing").field("key_ids", &ids).finish()
    }
}

fn redact(entry: &str) -> String {
    match entry.split_once('=') {
        Some((id, _)) => format!("{}=<redacted>", id),
        None => "<redacted>".to_string(),
    }
}
