use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::TableResult;
use super::model::StoredObject;

/// Durable row store (Tier 2) keyed by `(object_ref, version)`.
///
/// Backends provide their own atomicity for single-row operations.
pub trait ObjectTable: Send + Sync {
    /// Fetches one row; `Ok(None)` when absent.
    fn find_one(
        &self,
        object_ref: &str,
        version: u16,
    ) -> impl std::future::Future<Output = TableResult<Option<StoredObject>>> + Send;

    /// Writes a row, replacing any row with the same `(object_ref, version)`.
    fn insert_or_replace(
        &self,
        row: StoredObject,
    ) -> impl std::future::Future<Output = TableResult<()>> + Send;
}

/// Process-local table; rows live as long as the last clone.
#[derive(Debug, Default, Clone)]
pub struct MemoryTable {
    rows: Arc<RwLock<HashMap<(String, u16), StoredObject>>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Versions stored under `object_ref`, ascending.
    pub fn versions(&self, object_ref: &str) -> Vec<u16> {
        let mut versions: Vec<u16> = self
            .rows
            .read()
            .keys()
            .filter(|(r, _)| r == object_ref)
            .map(|(_, v)| *v)
            .collect();
        versions.sort_unstable();
        versions
    }

    fn get(&self, object_ref: &str, version: u16) -> Option<StoredObject> {
        self.rows
            .read()
            .get(&(object_ref.to_string(), version))
            .cloned()
    }

    fn put(&self, row: StoredObject) {
        self.rows
            .write()
            .insert((row.object_ref.clone(), row.version), row);
    }
}

impl ObjectTable for MemoryTable {
    async fn find_one(&self, object_ref: &str, version: u16) -> TableResult<Option<StoredObject>> {
        Ok(self.get(object_ref, version))
    }

    async fn insert_or_replace(&self, row: StoredObject) -> TableResult<()> {
        row.check_invariants()?;
        self.put(row);
        Ok(())
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTable;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::{MemoryTable, ObjectTable, StoredObject};
    use crate::storage::error::{TableError, TableResult};

    /// [`MemoryTable`] with call counters and failure injection.
    #[derive(Debug, Default, Clone)]
    pub struct MockTable {
        inner: MemoryTable,
        find_calls: Arc<AtomicUsize>,
        insert_calls: Arc<AtomicUsize>,
        fail_reads: Arc<AtomicBool>,
    }

    impl MockTable {
        pub fn new() -> Self {
            Self::default()
        }

        /// Inserts a row without invariant checks (for corrupt-row scenarios).
        pub fn insert_raw(&self, row: StoredObject) {
            self.inner.put(row);
        }

        /// Reads a row without counting the call.
        pub fn peek(&self, object_ref: &str, version: u16) -> Option<StoredObject> {
            self.inner.get(object_ref, version)
        }

        pub fn find_calls(&self) -> usize {
            self.find_calls.load(Ordering::SeqCst)
        }

        pub fn insert_calls(&self) -> usize {
            self.insert_calls.load(Ordering::SeqCst)
        }

        pub fn reset_counters(&self) {
            self.find_calls.store(0, Ordering::SeqCst);
            self.insert_calls.store(0, Ordering::SeqCst);
        }

        /// Makes every subsequent `find_one` fail with [`TableError::Backend`].
        pub fn set_fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.inner.len()
        }

        pub fn is_empty(&self) -> bool {
            self.inner.is_empty()
        }
    }

    impl ObjectTable for MockTable {
        async fn find_one(
            &self,
            object_ref: &str,
            version: u16,
        ) -> TableResult<Option<StoredObject>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(TableError::Backend("injected read failure".to_string()));
            }
            self.inner.find_one(object_ref, version).await
        }

        async fn insert_or_replace(&self, row: StoredObject) -> TableResult<()> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.insert_or_replace(row).await
        }
    }
}
