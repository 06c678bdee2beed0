//! Storage model types.

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use super::error::{TableError, TableResult};
use crate::envelope::Envelope;
use crate::keys;

/// A persisted row, keyed by the immutable `(object_ref, version)` pair.
///
/// Stored as `rkyv` bytes by [`super::FileTable`].
///
/// # Example
/// ```rust
/// use tierstore::storage::StoredObject;
///
/// let row = StoredObject {
///     object_ref: "app.mailer.smtp".to_string(),
///     version: 1,
///     payload: br#"{"type":"app.SmtpConfig","schema":1,"body":{}}"#.to_vec(),
///     key_id: None,
///     updated_at: 1_702_500_000,
/// };
/// assert!(row.check_invariants().is_ok());
/// assert!(!row.is_encrypted());
/// ```
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct StoredObject {
    /// Stable identifier of the object family.
    pub object_ref: String,
    /// Logical version under `object_ref` (never zero).
    pub version: u16,
    /// Serialized frame (plain) or encrypted envelope.
    pub payload: Vec<u8>,
    /// Secret reference; set iff `payload` is an encrypted envelope.
    pub key_id: Option<String>,
    /// Unix seconds of the write.
    pub updated_at: i64,
}

impl StoredObject {
    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.key_id.is_some()
    }

    /// Checks ref/version validity and that `key_id` rows carry a well-formed envelope.
    pub fn check_invariants(&self) -> TableResult<()> {
        keys::validate(&self.object_ref, self.version).map_err(|e| {
            TableError::InvariantViolation {
                reason: e.to_string(),
            }
        })?;

        if let Some(key_id) = &self.key_id {
            if key_id.is_empty() {
                return Err(TableError::InvariantViolation {
                    reason: format!(
                        "{} v{} has an empty key_id",
                        self.object_ref, self.version
                    ),
                });
            }
            Envelope::parse(&self.payload).map_err(|e| TableError::InvariantViolation {
                reason: format!(
                    "{} v{} has key_id {} but {}",
                    self.object_ref, self.version, key_id, e
                ),
            })?;
        }

        Ok(())
    }

    /// Serializes the row with rkyv.
    pub fn to_bytes(&self) -> TableResult<AlignedVec> {
        rkyv::to_bytes::<RkyvError>(self).map_err(|e| TableError::Serialization(format!("{:?}", e)))
    }

    /// Deserializes (and validates) an rkyv row from arbitrary, possibly unaligned bytes.
    pub fn from_bytes(bytes: &[u8]) -> TableResult<Self> {
        let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);
        rkyv::from_bytes::<Self, RkyvError>(&aligned)
            .map_err(|e| TableError::Serialization(format!("{:?}", e)))
    }
}
