//! HMAC key manager.

use cipherset_core::{
    Environment, KeyData, KeyFactory, KeyManager, KeyMaterialType, KeyTemplate, KeysetError, Mac,
};

use super::{
    check_format_version, check_key_version, decode_format, decode_key, encode_key, rejected,
};
use crate::{
    keys::{HmacKey, HmacKeyFormat, HmacParams, KEY_VERSION},
    subtle::{
        HmacMac,
        hmac::{MIN_KEY_SIZE, MIN_TAG_SIZE},
    },
};

/// Type URL of HMAC keys
pub const HMAC_TYPE_URL: &str = "type.cipherset/HmacKey";

/// Largest key a template may ask for (64 bytes)
pub const MAX_KEY_SIZE: usize = 64;

/// Builds [`HmacMac`] primitives and generates HMAC keys.
#[derive(Debug, Clone)]
pub struct HmacKeyManager<E: Environment> {
    env: E,
}

impl<E: Environment> HmacKeyManager<E> {
    /// Create a manager drawing keys from `env`.
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

fn check_params(params: &HmacParams) -> Result<(), String> {
    let tag_size = params.tag_size as usize;
    if tag_size < MIN_TAG_SIZE {
        return Err(format!("tag size {tag_size} below minimum {MIN_TAG_SIZE}"));
    }
    if tag_size > params.hash.digest_size() {
        return Err(format!("tag size {tag_size} exceeds {:?} digest", params.hash));
    }
    Ok(())
}

impl<E: Environment> KeyFactory for HmacKeyManager<E> {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        let format: HmacKeyFormat = decode_format(template)?;
        check_format_version(HMAC_TYPE_URL, format.version)?;

        let invalid = |reason| KeysetError::InvalidKeyFormat {
            type_url: HMAC_TYPE_URL.to_string(),
            reason,
        };
        check_params(&format.params).map_err(invalid)?;
        let key_size = format.key_size as usize;
        if !(MIN_KEY_SIZE..=MAX_KEY_SIZE).contains(&key_size) {
            return Err(invalid(format!(
                "key size {key_size} outside {MIN_KEY_SIZE}..={MAX_KEY_SIZE}"
            )));
        }

        let key = HmacKey {
            version: KEY_VERSION,
            params: format.params,
            key_value: self.env.random_vec(key_size),
        };
        Ok(KeyData::new(
            HMAC_TYPE_URL,
            encode_key(HMAC_TYPE_URL, &key)?,
            KeyMaterialType::Symmetric,
        ))
    }
}

impl<E: Environment> KeyManager<dyn Mac> for HmacKeyManager<E> {
    fn key_type(&self) -> &str {
        HMAC_TYPE_URL
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Mac>, KeysetError> {
        let key: HmacKey = decode_key(key_data)?;
        check_key_version(HMAC_TYPE_URL, key.version)?;

        let mac = HmacMac::new(&key.key_value, key.params.hash, key.params.tag_size as usize)
            .map_err(|e| rejected(HMAC_TYPE_URL, e))?;
        Ok(Box::new(mac))
    }
}
