//! Envelope codec: typed values to payload bytes and back, plain or encrypted.

pub mod codec;
pub mod error;
pub mod value;


pub use codec::{
    Encoded, Envelope, decode_encrypted, decode_plain, encode_encrypted, encode_plain,
};
pub use error::{EnvelopeError, EnvelopeResult};
pub use value::{CacheAdmission, Encryption, StoredValue};
