//! Ref/version validation and cache key construction.
//!
//! [`validate`] is the single gate called by every read, write and purge path before any
//! backend is touched. It returns the canonical [`CacheKey`] shared by Tier 0 and Tier 1.

pub mod error;


pub use error::{ValidationError, ValidationResult};

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{CACHE_KEY_PREFIX, MAX_REF_LEN, VERSION_PAD_WIDTH};

static REF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("ref pattern is a valid regex")
});

/// Canonical cache key: `objectStore:<ref>:<version padded to 5 digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    key: String,
    ref_len: usize,
    version: u16,
}

impl CacheKey {
    /// Returns the key string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Returns the validated ref embedded in the key.
    #[inline]
    pub fn object_ref(&self) -> &str {
        let start = CACHE_KEY_PREFIX.len() + 1;
        &self.key[start..start + self.ref_len]
    }

    /// Returns the validated version.
    #[inline]
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Consumes the key and returns the key string.
    #[inline]
    pub fn into_string(self) -> String {
        self.key
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

/// Validates `(object_ref, version)` and returns the canonical cache key.
pub fn validate(object_ref: &str, version: u16) -> ValidationResult<CacheKey> {
    validate_ref(object_ref)?;
    if version == 0 {
        return Err(ValidationError::ZeroVersion);
    }

    Ok(CacheKey {
        key: format!(
            "{}:{}:{:0width$}",
            CACHE_KEY_PREFIX,
            object_ref,
            version,
            width = VERSION_PAD_WIDTH
        ),
        ref_len: object_ref.len(),
        version,
    })
}

/// Validates a ref on its own.
pub fn validate_ref(object_ref: &str) -> ValidationResult<()> {
    if object_ref.is_empty() {
        return Err(ValidationError::EmptyRef);
    }
    if object_ref.len() > MAX_REF_LEN {
        return Err(ValidationError::RefTooLong {
            len: object_ref.len(),
            max: MAX_REF_LEN,
        });
    }
    if !REF_PATTERN.is_match(object_ref) {
        let (position, ch) = object_ref
            .char_indices()
            .find(|(_, c)| !is_ref_char(*c))
            .unwrap_or((0, '\0'));
        return Err(ValidationError::InvalidRefCharacter { ch, position });
    }
    if object_ref.starts_with('.') || object_ref.contains("..") {
        return Err(ValidationError::PathTraversal {
            object_ref: object_ref.to_string(),
        });
    }
    Ok(())
}

/// Narrows a wide integer into the version space (`1..=65535`).
pub fn version_from_u64(value: u64) -> ValidationResult<u16> {
    match u16::try_from(value) {
        Ok(0) => Err(ValidationError::ZeroVersion),
        Ok(version) => Ok(version),
        Err(_) => Err(ValidationError::VersionOutOfRange { value }),
    }
}

#[inline]
fn is_ref_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}
