//! Tier 1: the distributed cache contract and an in-process implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::error::CacheResult;

/// Shared byte cache (Tier 1) with per-entry TTL.
///
/// Backends provide their own atomicity for single-key operations.
pub trait DistributedCache: Send + Sync {
    /// Returns the bytes under `key`, or `None` on a miss.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = CacheResult<Option<Vec<u8>>>> + Send;

    /// Stores `value` under `key`; a zero `ttl` means no expiry.
    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl std::future::Future<Output = CacheResult<()>> + Send;

    /// Removes `key`; removing a missing key is not an error.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = CacheResult<()>> + Send;
}

#[derive(Clone)]
struct CachedBytes {
    bytes: Arc<Vec<u8>>,
    ttl: Option<Duration>,
}

struct PerEntryTtl;

impl Expiry<String, CachedBytes> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedBytes,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedBytes,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// In-process [`DistributedCache`] backed by moka, honoring per-entry TTL.
///
/// Useful for single-node deployments and tests; clones share the same entries.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, CachedBytes>,
}

impl MemoryCache {
    const DEFAULT_CAPACITY: u64 = 100_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a cache with a max entry capacity.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl DistributedCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|c| c.bytes.as_ref().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let ttl = (!ttl.is_zero()).then_some(ttl);
        self.entries.insert(
            key.to_string(),
            CachedBytes {
                bytes: Arc::new(value),
                ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.invalidate(key);
        Ok(())
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockCache;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::RwLock;

    use super::DistributedCache;
    use crate::cache::error::{CacheBackendError, CacheResult};

    /// Map-backed [`DistributedCache`] with call counters, TTL capture and failure injection.
    #[derive(Debug, Default, Clone)]
    pub struct MockCache {
        entries: Arc<RwLock<HashMap<String, (Vec<u8>, Duration)>>>,
        get_calls: Arc<AtomicUsize>,
        set_calls: Arc<AtomicUsize>,
        delete_calls: Arc<AtomicUsize>,
        fail_get: Arc<AtomicBool>,
        fail_set: Arc<AtomicBool>,
        fail_delete: Arc<AtomicBool>,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        /// Writes raw bytes directly (for poisoned-entry scenarios).
        pub fn insert_raw(&self, key: &str, value: Vec<u8>) {
            self.entries
                .write()
                .insert(key.to_string(), (value, Duration::ZERO));
        }

        /// Reads raw bytes without counting the call.
        pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
            self.entries.read().get(key).map(|(v, _)| v.clone())
        }

        /// TTL the entry was last written with.
        pub fn ttl_of(&self, key: &str) -> Option<Duration> {
            self.entries.read().get(key).map(|(_, ttl)| *ttl)
        }

        pub fn contains(&self, key: &str) -> bool {
            self.entries.read().contains_key(key)
        }

        pub fn len(&self) -> usize {
            self.entries.read().len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.read().is_empty()
        }

        pub fn get_calls(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }

        pub fn set_calls(&self) -> usize {
            self.set_calls.load(Ordering::SeqCst)
        }

        pub fn delete_calls(&self) -> usize {
            self.delete_calls.load(Ordering::SeqCst)
        }

        pub fn reset_counters(&self) {
            self.get_calls.store(0, Ordering::SeqCst);
            self.set_calls.store(0, Ordering::SeqCst);
            self.delete_calls.store(0, Ordering::SeqCst);
        }

        pub fn set_fail_get(&self, fail: bool) {
            self.fail_get.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_set(&self, fail: bool) {
            self.fail_set.store(fail, Ordering::SeqCst);
        }

        pub fn set_fail_delete(&self, fail: bool) {
            self.fail_delete.store(fail, Ordering::SeqCst);
        }

        fn injected(op: &'static str, key: &str) -> CacheBackendError {
            CacheBackendError::Operation {
                op,
                key: key.to_string(),
                reason: "injected failure".to_string(),
            }
        }
    }

    impl DistributedCache for MockCache {
        async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(Self::injected("get", key));
            }
            Ok(self.peek(key))
        }

        async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
            self.set_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(Self::injected("set", key));
            }
            self.entries.write().insert(key.to_string(), (value, ttl));
            Ok(())
        }

        async fn delete(&self, key: &str) -> CacheResult<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(Self::injected("delete", key));
            }
            self.entries.write().remove(key);
            Ok(())
        }
    }
}
