//! Tier 1 record format.
//!
//! `[4 bytes magic "TSE1"][rkyv CachedEntry]`. A record carries its own identity and type
//! tag so a foreign or relocated entry can be recognized and skipped before decoding.

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::constants::CACHE_ENTRY_MAGIC;

/// Cached payload: either the plain value frame or the encrypted envelope.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub enum CachedPayload {
    /// Serialized value frame of a non-encrypted type.
    Plain(Vec<u8>),
    /// Encrypted envelope exactly as stored in Tier 2.
    Encrypted {
        /// Secret reference the envelope was sealed with.
        key_id: String,
        /// Envelope bytes.
        envelope: Vec<u8>,
    },
}

/// A Tier 1 record.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct CachedEntry {
    pub object_ref: String,
    pub version: u16,
    pub type_tag: String,
    pub payload: CachedPayload,
}

impl CachedEntry {
    #[inline]
    pub fn is_encrypted(&self) -> bool {
        matches!(self.payload, CachedPayload::Encrypted { .. })
    }

    /// Encodes the record (magic prefix + rkyv).
    pub fn to_bytes(&self) -> Result<Vec<u8>, String> {
        let archived = rkyv::to_bytes::<RkyvError>(self).map_err(|e| format!("{:?}", e))?;
        let mut out = Vec::with_capacity(CACHE_ENTRY_MAGIC.len() + archived.len());
        out.extend_from_slice(CACHE_ENTRY_MAGIC);
        out.extend_from_slice(&archived);
        Ok(out)
    }

    /// Decodes a record; `None` for anything not written by [`CachedEntry::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let body = bytes.strip_prefix(CACHE_ENTRY_MAGIC.as_slice())?;
        let mut aligned = AlignedVec::<16>::with_capacity(body.len());
        aligned.extend_from_slice(body);
        rkyv::from_bytes::<Self, RkyvError>(&aligned).ok()
    }
}
