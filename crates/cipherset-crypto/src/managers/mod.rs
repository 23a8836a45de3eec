//! Key managers for the algorithms in [`crate::subtle`].
//!
//! Each manager owns one type URL. It decodes the CBOR key structure stored in
//! `KeyData::value`, checks version and parameters and builds the primitive.
//! Managers that generate keys or nonces carry an [`Environment`].
//!
//! [`Environment`]: cipherset_core::Environment

pub mod aes_gcm;
pub mod ecdsa;
pub mod ed25519;
pub mod hmac;
pub mod xchacha;

pub use self::{
    aes_gcm::{AES_GCM_TYPE_URL, AesGcmKeyManager},
    ecdsa::{
        ECDSA_PRIVATE_TYPE_URL, ECDSA_PUBLIC_TYPE_URL, EcdsaPrivateKeyManager,
        EcdsaPublicKeyManager,
    },
    ed25519::{
        ED25519_PRIVATE_TYPE_URL, ED25519_PUBLIC_TYPE_URL, Ed25519PrivateKeyManager,
        Ed25519PublicKeyManager,
    },
    hmac::{HMAC_TYPE_URL, HmacKeyManager},
    xchacha::{XCHACHA20_POLY1305_TYPE_URL, XChaCha20Poly1305KeyManager},
};

use cipherset_core::{CryptoError, KeyData, KeyTemplate, KeysetError};
use serde::{Serialize, de::DeserializeOwned};

use crate::{codec, keys::KEY_VERSION};

/// Decode the key structure held by `key_data`.
fn decode_key<T: DeserializeOwned>(key_data: &KeyData) -> Result<T, KeysetError> {
    codec::decode(&key_data.value)
        .map_err(|e| key_material_invalid(&key_data.type_url, e.to_string()))
}

/// Decode the key format held by `template`.
fn decode_format<T: DeserializeOwned>(template: &KeyTemplate) -> Result<T, KeysetError> {
    codec::decode(&template.value).map_err(|e| KeysetError::InvalidKeyFormat {
        type_url: template.type_url.clone(),
        reason: e.to_string(),
    })
}

/// Encode a freshly generated key structure.
fn encode_key<T: Serialize>(type_url: &str, key: &T) -> Result<Vec<u8>, KeysetError> {
    codec::encode(key).map_err(|e| key_material_invalid(type_url, e.to_string()))
}

fn check_key_version(type_url: &str, version: u32) -> Result<(), KeysetError> {
    if version == KEY_VERSION {
        Ok(())
    } else {
        Err(key_material_invalid(type_url, format!("unsupported key version {version}")))
    }
}

fn check_format_version(type_url: &str, version: u32) -> Result<(), KeysetError> {
    if version == KEY_VERSION {
        Ok(())
    } else {
        Err(KeysetError::InvalidKeyFormat {
            type_url: type_url.to_string(),
            reason: format!("unsupported key format version {version}"),
        })
    }
}

fn key_material_invalid(type_url: &str, reason: String) -> KeysetError {
    KeysetError::KeyMaterialInvalid { type_url: type_url.to_string(), reason }
}

/// A primitive constructor rejected decoded key bytes.
fn rejected(type_url: &str, error: CryptoError) -> KeysetError {
    key_material_invalid(type_url, error.to_string())
}

/// Public key managers never generate keys; public keys are derived from
/// private ones.
fn public_keys_are_derived(template: &KeyTemplate) -> KeysetError {
    KeysetError::InvalidKeyFormat {
        type_url: template.type_url.clone(),
        reason: "public keys are derived from private keys".to_string(),
    }
}
