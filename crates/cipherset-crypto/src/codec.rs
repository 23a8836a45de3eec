//! CBOR encoding of key material and key formats.
//!
//! Serialized keys live inside `KeyData::value` and templates inside
//! `KeyTemplate::value`. Only the key manager for the matching type URL ever
//! decodes them.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors from encoding or decoding key structures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// CBOR serialization failed
    #[error("cbor encoding failed: {reason}")]
    Encode {
        /// Reason reported by the encoder
        reason: String,
    },

    /// Bytes are not a valid encoding of the expected structure
    #[error("cbor decoding failed: {reason}")]
    Decode {
        /// Reason reported by the decoder
        reason: String,
    },
}

/// Encode `value` as CBOR.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut encoded = Vec::new();
    ciborium::ser::into_writer(value, &mut encoded)
        .map_err(|e| CodecError::Encode { reason: e.to_string() })?;
    Ok(encoded)
}

/// Decode a CBOR-encoded `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    ciborium::de::from_reader(bytes).map_err(|e| CodecError::Decode { reason: e.to_string() })
}
