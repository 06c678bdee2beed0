//! Cross-cutting, shared constants.
//!
//! The cache key layout (`objectStore:<ref>:<version:05>`) is shared by Tier 0 and Tier 1,
//! so invalidating one key string invalidates both tiers.

/// Namespace prefix for every cache key.
pub const CACHE_KEY_PREFIX: &str = "objectStore";

/// Width the version is zero-padded to inside a cache key (`u16::MAX` has five digits).
pub const VERSION_PAD_WIDTH: usize = 5;

/// Maximum accepted length of an object ref, in bytes.
pub const MAX_REF_LEN: usize = 128;

/// Default Tier 1 time-to-live, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Default maximum number of materialized objects held in Tier 0.
pub const DEFAULT_RUNTIME_CAPACITY: u64 = 10_000;

/// Symmetric key size accepted by [`crate::crypto::ChaChaCipher`].
pub const KEY_SIZE: usize = 32;

/// Nonce (IV) size emitted by [`crate::crypto::ChaChaCipher`].
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
pub const TAG_SIZE: usize = 16;

/// Bytes of envelope header preceding the IV (`iv_length`, `tag_length`).
pub const ENVELOPE_HEADER_LEN: usize = 2;

/// Magic prefix of every Tier 1 record written by this crate.
pub const CACHE_ENTRY_MAGIC: &[u8; 4] = b"TSE1";
