//! XChaCha20-Poly1305 key manager.

use cipherset_core::{
    Aead, Environment, KeyData, KeyFactory, KeyManager, KeyMaterialType, KeyTemplate, KeysetError,
};

use super::{
    check_format_version, check_key_version, decode_format, decode_key, encode_key, rejected,
};
use crate::{
    keys::{KEY_VERSION, XChaCha20Poly1305Key, XChaCha20Poly1305KeyFormat},
    subtle::{XChaCha20Poly1305, xchacha::KEY_SIZE},
};

/// Type URL of XChaCha20-Poly1305 keys
pub const XCHACHA20_POLY1305_TYPE_URL: &str = "type.cipherset/XChaCha20Poly1305Key";

/// Builds [`XChaCha20Poly1305`] primitives and generates 256-bit keys.
#[derive(Debug, Clone)]
pub struct XChaCha20Poly1305KeyManager<E: Environment> {
    env: E,
}

impl<E: Environment> XChaCha20Poly1305KeyManager<E> {
    /// Create a manager drawing keys and nonces from `env`.
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: Environment> KeyFactory for XChaCha20Poly1305KeyManager<E> {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        let format: XChaCha20Poly1305KeyFormat = decode_format(template)?;
        check_format_version(XCHACHA20_POLY1305_TYPE_URL, format.version)?;

        let key =
            XChaCha20Poly1305Key { version: KEY_VERSION, key_value: self.env.random_vec(KEY_SIZE) };
        Ok(KeyData::new(
            XCHACHA20_POLY1305_TYPE_URL,
            encode_key(XCHACHA20_POLY1305_TYPE_URL, &key)?,
            KeyMaterialType::Symmetric,
        ))
    }
}

impl<E: Environment> KeyManager<dyn Aead> for XChaCha20Poly1305KeyManager<E> {
    fn key_type(&self) -> &str {
        XCHACHA20_POLY1305_TYPE_URL
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Aead>, KeysetError> {
        let key: XChaCha20Poly1305Key = decode_key(key_data)?;
        check_key_version(XCHACHA20_POLY1305_TYPE_URL, key.version)?;

        let aead = XChaCha20Poly1305::new(&key.key_value, self.env.clone())
            .map_err(|e| rejected(XCHACHA20_POLY1305_TYPE_URL, e))?;
        Ok(Box::new(aead))
    }
}
