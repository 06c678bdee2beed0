//! Tier 0: process-local memory of materialized objects.
//!
//! Keys are the same strings as Tier 1 keys ([`crate::keys::CacheKey`]), so one purge clears
//! both tiers. Values are type-erased; a lookup for the wrong type is a miss.

use std::any::Any;
use std::sync::Arc;

use moka::sync::Cache;

use crate::constants::DEFAULT_RUNTIME_CAPACITY;

type ErasedValue = Arc<dyn Any + Send + Sync>;

/// In-memory map of decoded objects keyed by cache key (LRU eviction).
///
/// Clones share the same entries; create a new instance per execution scope when objects
/// must not outlive it.
#[derive(Clone)]
pub struct RuntimeMemory {
    entries: Cache<String, ErasedValue>,
}

impl RuntimeMemory {
    /// Creates runtime memory with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RUNTIME_CAPACITY)
    }

    /// Creates runtime memory with a max entry capacity.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns a clone of the value under `key` if it holds a `T`.
    ///
    /// An entry of another type is evicted so the caller falls through to the next tier.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let erased = self.entries.get(key)?;
        match erased.downcast_ref::<T>() {
            Some(value) => Some(value.clone()),
            None => {
                tracing::warn!(
                    cache_key = key,
                    expected = std::any::type_name::<T>(),
                    "Runtime entry holds a different type, evicting"
                );
                self.entries.invalidate(key);
                None
            }
        }
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert<T>(&self, key: &str, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.entries.insert(key.to_string(), Arc::new(value));
    }

    /// Removes the entry under `key`; returns `true` if one was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Returns `true` if any value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries (approximate until pending tasks run).
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Drops every entry, ending the current scope.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for RuntimeMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuntimeMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeMemory")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
