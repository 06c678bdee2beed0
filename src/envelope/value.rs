//! Materializable value types and their encryption / cache admission policy.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Tier 1 admission rule for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheAdmission {
    /// Plain values; cached as their serialized frame.
    Plaintext,
    /// Encrypted values; only the encrypted envelope is cached.
    AsCiphertext,
    /// Encrypted values that never enter Tier 1.
    Never,
}

/// Static encryption policy declared by a [`StoredValue`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encryption {
    /// Stored and cached in plain form.
    #[default]
    Disabled,
    /// Encrypted at rest; the envelope may be cached as-is.
    CacheEncrypted,
    /// Encrypted at rest; the decrypted value would have to be cached, which is disallowed,
    /// so the value is only ever held in process-local memory.
    CacheDecrypted,
}

impl Encryption {
    #[inline]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Encryption::Disabled)
    }

    #[inline]
    pub fn cache_admission(self) -> CacheAdmission {
        match self {
            Encryption::Disabled => CacheAdmission::Plaintext,
            Encryption::CacheEncrypted => CacheAdmission::AsCiphertext,
            Encryption::CacheDecrypted => CacheAdmission::Never,
        }
    }
}

/// A typed value persisted through the object store.
///
/// Serialization goes through serde inside a tagged frame
/// (`{"type": TYPE_TAG, "schema": SCHEMA_VERSION, "body": ...}`), so the wire format is
/// explicit per type and checked on every decode.
///
/// # Example
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use tierstore::envelope::{Encryption, StoredValue};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct SmtpConfig {
///     host: String,
///     port: u16,
/// }
///
/// impl StoredValue for SmtpConfig {
///     const TYPE_TAG: &'static str = "app.SmtpConfig";
///     const ENCRYPTION: Encryption = Encryption::CacheEncrypted;
///
///     fn store_key(&self) -> &str {
///         "app.mailer.smtp"
///     }
///
///     fn version(&self) -> u16 {
///         1
///     }
/// }
///
/// assert!(SmtpConfig::accepts_type("app.SmtpConfig"));
/// ```
pub trait StoredValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Stable type name written into every frame.
    const TYPE_TAG: &'static str;

    /// Highest schema version this type can read; written into new frames.
    const SCHEMA_VERSION: u16 = 1;

    /// Encryption and cache admission policy.
    const ENCRYPTION: Encryption = Encryption::Disabled;

    /// Ref this value is stored under.
    fn store_key(&self) -> &str;

    /// Version this value is stored as.
    fn version(&self) -> u16;

    /// Type tags this type may be decoded from. Defaults to [`StoredValue::TYPE_TAG`] only;
    /// override to accept legacy tags after a rename.
    fn accepts_type(type_tag: &str) -> bool {
        type_tag == Self::TYPE_TAG
    }
}
