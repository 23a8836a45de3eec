//! AES-GCM key manager.

use cipherset_core::{
    Aead, Environment, KeyData, KeyFactory, KeyManager, KeyMaterialType, KeyTemplate, KeysetError,
};

use super::{
    check_format_version, check_key_version, decode_format, decode_key, encode_key, rejected,
};
use crate::{
    keys::{AesGcmKey, AesGcmKeyFormat, KEY_VERSION},
    subtle::AesGcm,
};

/// Type URL of AES-GCM keys
pub const AES_GCM_TYPE_URL: &str = "type.cipherset/AesGcmKey";

/// Builds [`AesGcm`] primitives and generates 128- or 256-bit keys.
#[derive(Debug, Clone)]
pub struct AesGcmKeyManager<E: Environment> {
    env: E,
}

impl<E: Environment> AesGcmKeyManager<E> {
    /// Create a manager drawing keys and IVs from `env`.
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: Environment> KeyFactory for AesGcmKeyManager<E> {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        let format: AesGcmKeyFormat = decode_format(template)?;
        check_format_version(AES_GCM_TYPE_URL, format.version)?;
        if !matches!(format.key_size, 16 | 32) {
            return Err(KeysetError::InvalidKeyFormat {
                type_url: AES_GCM_TYPE_URL.to_string(),
                reason: format!("unsupported key size {}", format.key_size),
            });
        }

        let key = AesGcmKey {
            version: KEY_VERSION,
            key_value: self.env.random_vec(format.key_size as usize),
        };
        Ok(KeyData::new(
            AES_GCM_TYPE_URL,
            encode_key(AES_GCM_TYPE_URL, &key)?,
            KeyMaterialType::Symmetric,
        ))
    }
}

impl<E: Environment> KeyManager<dyn Aead> for AesGcmKeyManager<E> {
    fn key_type(&self) -> &str {
        AES_GCM_TYPE_URL
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Aead>, KeysetError> {
        let key: AesGcmKey = decode_key(key_data)?;
        check_key_version(AES_GCM_TYPE_URL, key.version)?;

        let aead = AesGcm::new(&key.key_value, self.env.clone())
            .map_err(|e| rejected(AES_GCM_TYPE_URL, e))?;
        Ok(Box::new(aead))
    }
}
