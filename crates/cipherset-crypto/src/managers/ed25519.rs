//! Ed25519 key managers.

use cipherset_core::{
    Environment, KeyData, KeyFactory, KeyManager, KeyMaterialType, KeyTemplate, KeysetError,
    Signer, Verifier,
};

use super::{
    check_format_version, check_key_version, decode_format, decode_key, encode_key,
    public_keys_are_derived, rejected,
};
use crate::{
    keys::{Ed25519KeyFormat, Ed25519PrivateKey, Ed25519PublicKey, KEY_VERSION},
    subtle::{Ed25519Sign, Ed25519Verify, ed25519::SECRET_KEY_SIZE},
};

/// Type URL of Ed25519 private keys
pub const ED25519_PRIVATE_TYPE_URL: &str = "type.cipherset/Ed25519PrivateKey";

/// Type URL of Ed25519 public keys
pub const ED25519_PUBLIC_TYPE_URL: &str = "type.cipherset/Ed25519PublicKey";

/// Builds [`Ed25519Sign`] primitives, generates key pairs and derives public
/// keys.
#[derive(Debug, Clone)]
pub struct Ed25519PrivateKeyManager<E: Environment> {
    env: E,
}

impl<E: Environment> Ed25519PrivateKeyManager<E> {
    /// Create a manager drawing secret seeds from `env`.
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: Environment> KeyFactory for Ed25519PrivateKeyManager<E> {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        let format: Ed25519KeyFormat = decode_format(template)?;
        check_format_version(ED25519_PRIVATE_TYPE_URL, format.version)?;

        let seed = self.env.random_vec(SECRET_KEY_SIZE);
        let signer = Ed25519Sign::new(&seed).map_err(|e| rejected(ED25519_PRIVATE_TYPE_URL, e))?;

        let key = Ed25519PrivateKey {
            version: KEY_VERSION,
            public_key: Ed25519PublicKey {
                version: KEY_VERSION,
                key_value: signer.public_key().to_vec(),
            },
            key_value: seed,
        };
        Ok(KeyData::new(
            ED25519_PRIVATE_TYPE_URL,
            encode_key(ED25519_PRIVATE_TYPE_URL, &key)?,
            KeyMaterialType::AsymmetricPrivate,
        ))
    }

    fn public_key_data(&self, private_key: &KeyData) -> Result<KeyData, KeysetError> {
        let key: Ed25519PrivateKey = decode_key(private_key)?;
        check_key_version(ED25519_PRIVATE_TYPE_URL, key.version)?;

        Ok(KeyData::new(
            ED25519_PUBLIC_TYPE_URL,
            encode_key(ED25519_PUBLIC_TYPE_URL, &key.public_key)?,
            KeyMaterialType::AsymmetricPublic,
        ))
    }
}

impl<E: Environment> KeyManager<dyn Signer> for Ed25519PrivateKeyManager<E> {
    fn key_type(&self) -> &str {
        ED25519_PRIVATE_TYPE_URL
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Signer>, KeysetError> {
        let key: Ed25519PrivateKey = decode_key(key_data)?;
        check_key_version(ED25519_PRIVATE_TYPE_URL, key.version)?;

        let signer =
            Ed25519Sign::new(&key.key_value).map_err(|e| rejected(ED25519_PRIVATE_TYPE_URL, e))?;
        Ok(Box::new(signer))
    }
}

/// Builds [`Ed25519Verify`] primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519PublicKeyManager;

impl KeyFactory for Ed25519PublicKeyManager {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        Err(public_keys_are_derived(template))
    }
}

impl KeyManager<dyn Verifier> for Ed25519PublicKeyManager {
    fn key_type(&self) -> &str {
        ED25519_PUBLIC_TYPE_URL
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Verifier>, KeysetError> {
        let key: Ed25519PublicKey = decode_key(key_data)?;
        check_key_version(ED25519_PUBLIC_TYPE_URL, key.version)?;

        let verifier =
            Ed25519Verify::new(&key.key_value).map_err(|e| rejected(ED25519_PUBLIC_TYPE_URL, e))?;
        Ok(Box::new(verifier))
    }
}
