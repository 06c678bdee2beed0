//! Tiered object store: runtime memory, then distributed cache, then table.
//!
//! Reads go Tier 0 → Tier 1 → Tier 2 and backfill on the way out. Only plain frames and
//! encrypted envelopes are ever written to Tier 1; decrypted values stay in Tier 0.
//! Writes go to Tier 2 only; callers that move a "latest" pointer purge explicitly.

pub mod error;


pub use error::{StoreError, StoreResult};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::cache::{
    CacheBackendError, CachedEntry, CachedPayload, DistributedCache, RuntimeMemory, Tier,
};
use crate::config::StoreConfig;
use crate::crypto::{Cipher, Secret, SecretProvider};
use crate::envelope::{self, CacheAdmission, StoredValue};
use crate::keys::{self, CacheKey};
use crate::storage::{ObjectTable, StoredObject};

#[cfg(any(test, feature = "mock"))]
use crate::cache::MockCache;
#[cfg(any(test, feature = "mock"))]
use crate::crypto::ChaChaCipher;
#[cfg(any(test, feature = "mock"))]
use crate::storage::MockTable;

/// Per-call lookup options.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions<'a> {
    /// Consult and backfill Tier 1. `None` uses [`StoreConfig::use_cache`].
    pub use_cache: Option<bool>,
    /// Secret for encrypted objects; takes precedence over the secret provider.
    pub secret: Option<&'a Secret>,
}

impl<'a> GetOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    pub fn with_secret(mut self, secret: &'a Secret) -> Self {
        self.secret = Some(secret);
        self
    }
}

/// A materialized object and the tier that served it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub tier: Tier,
}

impl<T> Fetched<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Tiered, encryption-aware object store.
pub struct ObjectStore<D: ObjectTable, C: DistributedCache> {
    table: D,
    cache: C,
    cipher: Arc<dyn Cipher>,
    secrets: Option<Arc<dyn SecretProvider>>,
    runtime: RuntimeMemory,
    config: StoreConfig,
}

impl<D: ObjectTable, C: DistributedCache> std::fmt::Debug for ObjectStore<D, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("runtime", &self.runtime)
            .field("has_secret_provider", &self.secrets.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl<D: ObjectTable, C: DistributedCache> ObjectStore<D, C> {
    pub fn new(table: D, cache: C, cipher: Arc<dyn Cipher>, config: StoreConfig) -> Self {
        let runtime = RuntimeMemory::with_capacity(config.runtime_capacity);
        Self {
            table,
            cache,
            cipher,
            secrets: None,
            runtime,
            config,
        }
    }

    /// Resolves secrets by `key_id` when no explicit secret is passed to a read.
    pub fn with_secret_provider(mut self, provider: Arc<dyn SecretProvider>) -> Self {
        self.secrets = Some(provider);
        self
    }

    /// Replaces Tier 0, e.g. to scope it to one request.
    pub fn with_runtime(mut self, runtime: RuntimeMemory) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn table(&self) -> &D {
        &self.table
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn runtime(&self) -> &RuntimeMemory {
        &self.runtime
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Ends the current Tier 0 scope.
    pub fn clear_runtime(&self) {
        self.runtime.clear();
    }

    /// Resolves `(object_ref, version)` to a value of type `T`.
    pub async fn get<T: StoredValue>(
        &self,
        object_ref: &str,
        version: u16,
        options: GetOptions<'_>,
    ) -> StoreResult<T> {
        self.fetch(object_ref, version, options)
            .await
            .map(Fetched::into_value)
    }

    /// Like [`ObjectStore::get`], also reporting which tier served the value.
    #[instrument(skip(self, options), fields(type_tag = T::TYPE_TAG))]
    pub async fn fetch<T: StoredValue>(
        &self,
        object_ref: &str,
        version: u16,
        options: GetOptions<'_>,
    ) -> StoreResult<Fetched<T>> {
        let key = keys::validate(object_ref, version)?;

        if let Some(value) = self.runtime.get::<T>(key.as_str()) {
            debug!(cache_key = %key, "Retrieved from runtime memory");
            return Ok(Fetched {
                value,
                tier: Tier::Runtime,
            });
        }

        let use_cache = options.use_cache.unwrap_or(self.config.use_cache);
        if use_cache {
            if let Some(value) = self.lookup_cache::<T>(&key, options.secret).await? {
                debug!(cache_key = %key, "Cache hit");
                self.runtime.insert(key.as_str(), value.clone());
                return Ok(Fetched {
                    value,
                    tier: Tier::Cache,
                });
            }
        } else {
            debug!(cache_key = %key, "Cache bypassed");
        }

        let row = self
            .table
            .find_one(object_ref, version)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                object_ref: object_ref.to_string(),
                version,
            })?;

        let value = self.materialize::<T>(&key, &row, options.secret)?;
        let admitted = if use_cache {
            self.cache_entry_for::<T>(&key, &row)?
        } else {
            None
        };

        self.runtime.insert(key.as_str(), value.clone());
        if let Some(entry) = admitted {
            self.write_cache(&key, &entry).await?;
        }

        info!(cache_key = %key, encrypted = row.is_encrypted(), "Loaded from table");
        Ok(Fetched {
            value,
            tier: Tier::Database,
        })
    }

    /// Encodes `value` (encrypted iff its type enables encryption) and writes its row.
    ///
    /// Existing Tier 0/Tier 1 entries for the same key are left untouched; see
    /// [`ObjectStore::purge`].
    #[instrument(
        skip(self, value, secret),
        fields(
            object_ref = value.store_key(),
            version = value.version(),
            type_tag = T::TYPE_TAG
        )
    )]
    pub async fn store<T: StoredValue>(
        &self,
        value: &T,
        secret: Option<&Secret>,
    ) -> StoreResult<StoredObject> {
        let object_ref = value.store_key();
        let version = value.version();
        let key = keys::validate(object_ref, version)?;

        let encoded = if T::ENCRYPTION.is_enabled() {
            let secret = secret.ok_or_else(|| StoreError::SecretRequired {
                object_ref: object_ref.to_string(),
                version,
                key_id: None,
            })?;
            envelope::encode_encrypted(secret, object_ref, version, value, self.cipher.as_ref())?
        } else {
            if secret.is_some() {
                debug!("Secret ignored for a type without encryption");
            }
            envelope::encode_plain(value)?
        };

        let row = StoredObject {
            object_ref: object_ref.to_string(),
            version,
            payload: encoded.payload,
            key_id: encoded.key_id,
            updated_at: Utc::now().timestamp(),
        };
        self.table.insert_or_replace(row.clone()).await?;

        info!(cache_key = %key, encrypted = row.is_encrypted(), "Stored object");
        Ok(row)
    }

    /// Removes `(object_ref, version)` from Tier 0 and Tier 1. Idempotent.
    #[instrument(skip(self))]
    pub async fn purge(&self, object_ref: &str, version: u16) -> StoreResult<()> {
        let key = keys::validate(object_ref, version)?;

        self.runtime.remove(key.as_str());
        if let Err(e) = self.cache.delete(key.as_str()).await {
            self.config.cache_error_policy.handle(e)?;
        }

        debug!(cache_key = %key, "Purged");
        Ok(())
    }

    async fn lookup_cache<T: StoredValue>(
        &self,
        key: &CacheKey,
        secret: Option<&Secret>,
    ) -> StoreResult<Option<T>> {
        let bytes = match self.cache.get(key.as_str()).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(cache_key = %key, "Cache miss");
                return Ok(None);
            }
            Err(e) => {
                self.config.cache_error_policy.handle(e)?;
                return Ok(None);
            }
        };

        let Some(entry) = CachedEntry::from_bytes(&bytes) else {
            warn!(cache_key = %key, len = bytes.len(), "Discarding unreadable cache entry");
            return Ok(None);
        };
        if entry.object_ref != key.object_ref() || entry.version != key.version() {
            warn!(
                cache_key = %key,
                found_ref = %entry.object_ref,
                found_version = entry.version,
                "Discarding cache entry for another object"
            );
            return Ok(None);
        }
        if !T::accepts_type(&entry.type_tag) {
            warn!(
                cache_key = %key,
                expected = T::TYPE_TAG,
                found = %entry.type_tag,
                "Discarding cache entry of foreign type"
            );
            return Ok(None);
        }

        match entry.payload {
            CachedPayload::Plain(frame) => {
                if T::ENCRYPTION.is_enabled() {
                    warn!(cache_key = %key, "Discarding plaintext cache entry for an encrypted type");
                    return Ok(None);
                }
                match envelope::decode_plain::<T>(&frame) {
                    Ok(value) => Ok(Some(value)),
                    Err(e) => {
                        warn!(cache_key = %key, error = %e, "Discarding undecodable cache entry");
                        Ok(None)
                    }
                }
            }
            CachedPayload::Encrypted { key_id, envelope } => {
                if !matches!(T::ENCRYPTION.cache_admission(), CacheAdmission::AsCiphertext) {
                    warn!(
                        cache_key = %key,
                        key_id = %key_id,
                        "Discarding envelope cache entry for a type not cached as ciphertext"
                    );
                    return Ok(None);
                }
                let secret = self.resolve_secret(key, &key_id, secret)?;
                let value = envelope::decode_encrypted::<T>(
                    &secret,
                    key.object_ref(),
                    key.version(),
                    &envelope,
                    self.cipher.as_ref(),
                )?;
                Ok(Some(value))
            }
        }
    }

    fn materialize<T: StoredValue>(
        &self,
        key: &CacheKey,
        row: &StoredObject,
        secret: Option<&Secret>,
    ) -> StoreResult<T> {
        match &row.key_id {
            Some(key_id) => {
                let secret = self.resolve_secret(key, key_id, secret)?;
                Ok(envelope::decode_encrypted(
                    &secret,
                    &row.object_ref,
                    row.version,
                    &row.payload,
                    self.cipher.as_ref(),
                )?)
            }
            None => Ok(envelope::decode_plain(&row.payload)?),
        }
    }

    fn resolve_secret(
        &self,
        key: &CacheKey,
        key_id: &str,
        explicit: Option<&Secret>,
    ) -> StoreResult<Secret> {
        if let Some(secret) = explicit {
            if secret.reference() != key_id {
                debug!(
                    cache_key = %key,
                    key_id,
                    supplied = secret.reference(),
                    "Supplied secret does not match the payload key id"
                );
            }
            return Ok(secret.clone());
        }

        match &self.secrets {
            Some(provider) => Ok(provider.resolve(key_id)?),
            None => Err(StoreError::SecretRequired {
                object_ref: key.object_ref().to_string(),
                version: key.version(),
                key_id: Some(key_id.to_string()),
            }),
        }
    }

    fn cache_entry_for<T: StoredValue>(
        &self,
        key: &CacheKey,
        row: &StoredObject,
    ) -> StoreResult<Option<CachedEntry>> {
        let payload = match (&row.key_id, T::ENCRYPTION.cache_admission()) {
            (None, CacheAdmission::Plaintext) => CachedPayload::Plain(row.payload.clone()),
            (None, _) => {
                warn!(cache_key = %key, "Plain row for an encrypted type, not caching");
                return Ok(None);
            }
            (Some(key_id), CacheAdmission::AsCiphertext) => CachedPayload::Encrypted {
                key_id: key_id.clone(),
                envelope: row.payload.clone(),
            },
            (Some(_), CacheAdmission::Never) => {
                debug!(cache_key = %key, "Encrypted type not admitted to cache");
                return Ok(None);
            }
            (Some(_), CacheAdmission::Plaintext) => {
                return Err(StoreError::Logic(format!(
                    "cannot cache encrypted object of this class: {} ({})",
                    T::TYPE_TAG,
                    key
                )));
            }
        };

        Ok(Some(CachedEntry {
            object_ref: row.object_ref.clone(),
            version: row.version,
            type_tag: T::TYPE_TAG.to_string(),
            payload,
        }))
    }

    async fn write_cache(&self, key: &CacheKey, entry: &CachedEntry) -> StoreResult<()> {
        let result = match entry.to_bytes() {
            Ok(bytes) => {
                self.cache
                    .set(key.as_str(), bytes, self.config.cache_ttl)
                    .await
            }
            Err(reason) => Err(CacheBackendError::Operation {
                op: "set",
                key: key.to_string(),
                reason,
            }),
        };

        if let Err(e) = result {
            self.config.cache_error_policy.handle(e)?;
        }
        Ok(())
    }
}

/// Type alias for an object store backed by mocks.
#[cfg(any(test, feature = "mock"))]
pub type MockObjectStore = ObjectStore<MockTable, MockCache>;

#[cfg(any(test, feature = "mock"))]
impl ObjectStore<MockTable, MockCache> {
    /// Creates a store over [`MockTable`] and [`MockCache`] with ChaCha20-Poly1305.
    pub fn new_mock() -> Self {
        Self::new_mock_with_config(StoreConfig::default())
    }

    pub fn new_mock_with_config(config: StoreConfig) -> Self {
        Self::new(
            MockTable::new(),
            MockCache::new(),
            Arc::new(ChaChaCipher::new()),
            config,
        )
    }

    pub fn mock_table(&self) -> &MockTable {
        &self.table
    }

    pub fn mock_cache(&self) -> &MockCache {
        &self.cache
    }
}
