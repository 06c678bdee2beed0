//! Binary envelope layout and the encode/decode entry points.
//!
//! Encrypted layout:
//!
//! ```text
//! [1 byte iv_len][1 byte tag_len][iv_len bytes IV][tag_len bytes tag][ciphertext...]
//! ```
//!
//! The plaintext inside the ciphertext, and the whole payload of a plain row, is the
//! serialized value frame (see [`super::StoredValue`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{EnvelopeError, EnvelopeResult};
use super::value::StoredValue;
use crate::constants::ENVELOPE_HEADER_LEN;
use crate::crypto::{Cipher, Secret, build_aad};

/// Borrowed view of a parsed encrypted envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub iv: &'a [u8],
    pub tag: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Splits `bytes` into IV, tag and ciphertext, checking the length prefixes.
    pub fn parse(bytes: &'a [u8]) -> EnvelopeResult<Self> {
        if bytes.len() < ENVELOPE_HEADER_LEN {
            return Err(EnvelopeError::CorruptEnvelope {
                reason: format!("envelope is {} bytes, header needs 2", bytes.len()),
            });
        }

        let iv_len = bytes[0] as usize;
        let tag_len = bytes[1] as usize;
        let body = &bytes[ENVELOPE_HEADER_LEN..];
        if body.len() < iv_len + tag_len {
            return Err(EnvelopeError::CorruptEnvelope {
                reason: format!(
                    "envelope body is {} bytes, iv ({}) and tag ({}) need {}",
                    body.len(),
                    iv_len,
                    tag_len,
                    iv_len + tag_len
                ),
            });
        }

        let (iv, rest) = body.split_at(iv_len);
        let (tag, ciphertext) = rest.split_at(tag_len);
        Ok(Self {
            iv,
            tag,
            ciphertext,
        })
    }

    /// Serializes the envelope into its binary layout.
    pub fn to_bytes(&self) -> EnvelopeResult<Vec<u8>> {
        let iv_len = u8::try_from(self.iv.len()).map_err(|_| EnvelopeError::EnvelopeTooLarge {
            field: "iv",
            len: self.iv.len(),
        })?;
        let tag_len =
            u8::try_from(self.tag.len()).map_err(|_| EnvelopeError::EnvelopeTooLarge {
                field: "tag",
                len: self.tag.len(),
            })?;

        let mut out = Vec::with_capacity(
            ENVELOPE_HEADER_LEN + self.iv.len() + self.tag.len() + self.ciphertext.len(),
        );
        out.push(iv_len);
        out.push(tag_len);
        out.extend_from_slice(self.iv);
        out.extend_from_slice(self.tag);
        out.extend_from_slice(self.ciphertext);
        Ok(out)
    }
}

/// Output of an encode step: payload bytes plus the key id when encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub payload: Vec<u8>,
    pub key_id: Option<String>,
}

impl Encoded {
    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.key_id.is_some()
    }
}

#[derive(Serialize)]
struct FrameOut<'a, T> {
    #[serde(rename = "type")]
    type_tag: &'a str,
    schema: u16,
    body: &'a T,
}

#[derive(Deserialize)]
struct FrameIn {
    #[serde(rename = "type")]
    type_tag: String,
    schema: u16,
    body: serde_json::Value,
}

fn serialize_frame<T: StoredValue>(value: &T) -> EnvelopeResult<Vec<u8>> {
    serde_json::to_vec(&FrameOut {
        type_tag: T::TYPE_TAG,
        schema: T::SCHEMA_VERSION,
        body: value,
    })
    .map_err(|e| EnvelopeError::Serialization(e.to_string()))
}

fn deserialize_frame<T: StoredValue>(bytes: &[u8]) -> EnvelopeResult<T> {
    let frame: FrameIn =
        serde_json::from_slice(bytes).map_err(|e| EnvelopeError::Serialization(e.to_string()))?;

    if !T::accepts_type(&frame.type_tag) {
        return Err(EnvelopeError::UnexpectedType {
            expected: T::TYPE_TAG,
            found: frame.type_tag,
        });
    }
    if frame.schema > T::SCHEMA_VERSION {
        return Err(EnvelopeError::UnsupportedSchema {
            type_tag: frame.type_tag,
            found: frame.schema,
            supported: T::SCHEMA_VERSION,
        });
    }

    serde_json::from_value(frame.body).map_err(|e| EnvelopeError::Serialization(e.to_string()))
}

/// Serializes `value` without encryption.
pub fn encode_plain<T: StoredValue>(value: &T) -> EnvelopeResult<Encoded> {
    Ok(Encoded {
        payload: serialize_frame(value)?,
        key_id: None,
    })
}

/// Deserializes a plain payload, restricted to types `T` accepts.
pub fn decode_plain<T: StoredValue>(bytes: &[u8]) -> EnvelopeResult<T> {
    deserialize_frame(bytes)
}

/// Serializes and encrypts `value`, binding `(object_ref, version)` as associated data.
pub fn encode_encrypted<T: StoredValue>(
    secret: &Secret,
    object_ref: &str,
    version: u16,
    value: &T,
    cipher: &dyn Cipher,
) -> EnvelopeResult<Encoded> {
    let plaintext = serialize_frame(value)?;
    let aad = build_aad(object_ref, version);
    let sealed = cipher
        .encrypt(secret, &plaintext, &aad)
        .map_err(EnvelopeError::Encryption)?;

    let payload = Envelope {
        iv: &sealed.iv,
        tag: &sealed.tag,
        ciphertext: &sealed.ciphertext,
    }
    .to_bytes()?;

    debug!(
        object_ref,
        version,
        key_id = secret.reference(),
        payload_len = payload.len(),
        "Encoded encrypted envelope"
    );

    Ok(Encoded {
        payload,
        key_id: Some(secret.reference().to_string()),
    })
}

/// Authenticates, decrypts and deserializes an encrypted envelope.
///
/// Fails closed: no bytes of an unauthenticated plaintext ever reach deserialization.
pub fn decode_encrypted<T: StoredValue>(
    secret: &Secret,
    object_ref: &str,
    version: u16,
    envelope_bytes: &[u8],
    cipher: &dyn Cipher,
) -> EnvelopeResult<T> {
    let envelope = Envelope::parse(envelope_bytes)?;
    let aad = build_aad(object_ref, version);

    let plaintext = cipher
        .decrypt(
            secret,
            envelope.ciphertext,
            envelope.iv,
            envelope.tag,
            &aad,
        )
        .map_err(|source| EnvelopeError::DecryptionFailed {
            object_ref: object_ref.to_string(),
            version,
            source,
        })?;

    deserialize_frame(&plaintext)
}
