//! Tierstore library crate: versioned, optionally encrypted objects behind a three-tier cache.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`ObjectStore`], [`GetOptions`], [`Fetched`] - Tiered lookup, store and purge
//! - [`StoreConfig`], [`ConfigError`] - Environment-backed configuration
//! - [`StoreError`] - Error taxonomy surfaced to callers
//!
//! ## Tiers
//! - [`RuntimeMemory`] - Tier 0, process-local decoded objects
//! - [`DistributedCache`], [`MemoryCache`] - Tier 1 contract and in-process backend
//! - [`ObjectTable`], [`MemoryTable`], [`FileTable`] - Tier 2 contract and backends
//! - [`CacheErrorPolicy`], [`Tier`] - Cache failure handling and hit reporting
//!
//! ## Payloads
//! - [`StoredValue`], [`Encryption`], [`CacheAdmission`] - Per-type storage contract
//! - [`StoredObject`] - Persisted row
//! - Envelope codec functions in [`envelope`]
//!
//! ## Crypto
//! - [`Secret`], [`SecretProvider`], [`KeyRing`] - Named keys and resolution
//! - [`Cipher`], [`ChaChaCipher`] - Authenticated encryption
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod envelope;
pub mod keys;
pub mod storage;
pub mod store;

#[cfg(test)]
mod fixtures;

#[cfg(any(test, feature = "mock"))]
pub use cache::MockCache;
pub use cache::{
    CacheBackendError, CacheErrorPolicy, CachedEntry, CachedPayload, DistributedCache,
    MemoryCache, RuntimeMemory, Tier,
};
pub use config::{ConfigError, StoreConfig};
pub use crypto::{
    ChaChaCipher, Cipher, CipherError, KeyRing, Secret, SecretError, SecretProvider,
};
pub use envelope::{CacheAdmission, Encryption, EnvelopeError, StoredValue};
pub use keys::{CacheKey, ValidationError, validate};
#[cfg(any(test, feature = "mock"))]
pub use storage::MockTable;
pub use storage::{FileTable, MemoryTable, ObjectTable, StoredObject, TableError};
#[cfg(any(test, feature = "mock"))]
pub use store::MockObjectStore;
pub use store::{Fetched, GetOptions, ObjectStore, StoreError, StoreResult};
