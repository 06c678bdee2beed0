//! File-backed table (one rkyv file per row).

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::{TableError, TableResult};
use super::model::StoredObject;
use super::table::ObjectTable;
use crate::constants::VERSION_PAD_WIDTH;
use crate::keys;

const ROW_EXTENSION: &str = "row";

/// Durable table rooted at a directory: `<root>/<object_ref>/<version:05>.row`.
///
/// Writes go to a temp file in the target directory and are renamed into place, so a
/// reader sees either the previous row or the new one.
#[derive(Debug, Clone)]
pub struct FileTable {
    root: PathBuf,
}

impl FileTable {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the row file for `(object_ref, version)`.
    ///
    /// The ref is validated first, so it can never escape the root.
    pub fn row_path(&self, object_ref: &str, version: u16) -> TableResult<PathBuf> {
        keys::validate(object_ref, version).map_err(|e| TableError::InvariantViolation {
            reason: e.to_string(),
        })?;
        Ok(self.root.join(object_ref).join(format!(
            "{:0width$}.{}",
            version,
            ROW_EXTENSION,
            width = VERSION_PAD_WIDTH
        )))
    }

    fn read_row(path: &Path, object_ref: &str, version: u16) -> TableResult<Option<StoredObject>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let row = StoredObject::from_bytes(&bytes)?;
        if row.object_ref != object_ref || row.version != version {
            tracing::warn!(
                path = %path.display(),
                expected_ref = object_ref,
                expected_version = version,
                found_ref = %row.object_ref,
                found_version = row.version,
                "Row identity does not match its location"
            );
            return Err(TableError::InvariantViolation {
                reason: format!(
                    "row at {} holds {} v{}",
                    path.display(),
                    row.object_ref,
                    row.version
                ),
            });
        }

        Ok(Some(row))
    }

    fn write_row(path: &Path, row: &StoredObject) -> TableResult<()> {
        let dir = path.parent().ok_or_else(|| TableError::InvariantViolation {
            reason: format!("row path {} has no parent", path.display()),
        })?;
        fs::create_dir_all(dir)?;

        let bytes = row.to_bytes()?;
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| TableError::Io(e.error))?;
        Ok(())
    }
}

impl ObjectTable for FileTable {
    async fn find_one(&self, object_ref: &str, version: u16) -> TableResult<Option<StoredObject>> {
        let path = self.row_path(object_ref, version)?;
        let object_ref = object_ref.to_string();

        tokio::task::spawn_blocking(move || Self::read_row(&path, &object_ref, version))
            .await
            .map_err(|e| TableError::Backend(format!("read worker failed: {}", e)))?
    }

    async fn insert_or_replace(&self, row: StoredObject) -> TableResult<()> {
        row.check_invariants()?;
        let path = self.row_path(&row.object_ref, row.version)?;

        tokio::task::spawn_blocking(move || Self::write_row(&path, &row))
            .await
            .map_err(|e| TableError::Backend(format!("write worker failed: {}", e)))?
    }
}
