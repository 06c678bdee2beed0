//! Tier 2: the durable row store contract, row model and backends.

pub mod error;
pub mod file;
mod model;
pub mod table;


pub use error::{TableError, TableResult};
pub use file::FileTable;
pub use model::{ArchivedStoredObject, StoredObject};
#[cfg(any(test, feature = "mock"))]
pub use table::MockTable;
pub use table::{MemoryTable, ObjectTable};
