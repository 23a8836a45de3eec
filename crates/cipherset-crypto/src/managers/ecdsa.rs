//! ECDSA P-256 key managers.

use cipherset_core::{
    Environment, KeyData, KeyFactory, KeyManager, KeyMaterialType, KeyTemplate, KeysetError,
    Signer, Verifier,
};

use super::{
    check_format_version, check_key_version, decode_format, decode_key, encode_key,
    public_keys_are_derived, rejected,
};
use crate::{
    keys::{
        EcdsaKeyFormat, EcdsaParams, EcdsaPrivateKey, EcdsaPublicKey, EllipticCurve, HashType,
        KEY_VERSION,
    },
    subtle::{EcdsaSign, EcdsaVerify, ecdsa::SECRET_KEY_SIZE},
};

/// Type URL of ECDSA private keys
pub const ECDSA_PRIVATE_TYPE_URL: &str = "type.cipherset/EcdsaPrivateKey";

/// Type URL of ECDSA public keys
pub const ECDSA_PUBLIC_TYPE_URL: &str = "type.cipherset/EcdsaPublicKey";

/// Only P-256 with SHA-256 is supported.
fn check_params(params: &EcdsaParams) -> Result<(), String> {
    match (params.curve, params.hash) {
        (EllipticCurve::NistP256, HashType::Sha256) => Ok(()),
        (curve, hash) => Err(format!("unsupported curve and hash {curve:?}/{hash:?}")),
    }
}

/// Builds [`EcdsaSign`] primitives, generates key pairs and derives public
/// keys.
#[derive(Debug, Clone)]
pub struct EcdsaPrivateKeyManager<E: Environment> {
    env: E,
}

impl<E: Environment> EcdsaPrivateKeyManager<E> {
    /// Create a manager drawing private scalars from `env`.
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: Environment> KeyFactory for EcdsaPrivateKeyManager<E> {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        let format: EcdsaKeyFormat = decode_format(template)?;
        check_format_version(ECDSA_PRIVATE_TYPE_URL, format.version)?;
        check_params(&format.params).map_err(|reason| KeysetError::InvalidKeyFormat {
            type_url: ECDSA_PRIVATE_TYPE_URL.to_string(),
            reason,
        })?;

        // Rejection sampling: a zero or out-of-range scalar is redrawn.
        let (scalar, signer) = loop {
            let scalar = self.env.random_vec(SECRET_KEY_SIZE);
            if let Ok(signer) = EcdsaSign::new(&scalar, format.params.encoding) {
                break (scalar, signer);
            }
        };

        let key = EcdsaPrivateKey {
            version: KEY_VERSION,
            public_key: EcdsaPublicKey {
                version: KEY_VERSION,
                params: format.params,
                point: signer.public_point(),
            },
            key_value: scalar,
        };
        Ok(KeyData::new(
            ECDSA_PRIVATE_TYPE_URL,
            encode_key(ECDSA_PRIVATE_TYPE_URL, &key)?,
            KeyMaterialType::AsymmetricPrivate,
        ))
    }

    fn public_key_data(&self, private_key: &KeyData) -> Result<KeyData, KeysetError> {
        let key: EcdsaPrivateKey = decode_key(private_key)?;
        check_key_version(ECDSA_PRIVATE_TYPE_URL, key.version)?;

        Ok(KeyData::new(
            ECDSA_PUBLIC_TYPE_URL,
            encode_key(ECDSA_PUBLIC_TYPE_URL, &key.public_key)?,
            KeyMaterialType::AsymmetricPublic,
        ))
    }
}

impl<E: Environment> KeyManager<dyn Signer> for EcdsaPrivateKeyManager<E> {
    fn key_type(&self) -> &str {
        ECDSA_PRIVATE_TYPE_URL
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Signer>, KeysetError> {
        let key: EcdsaPrivateKey = decode_key(key_data)?;
        check_key_version(ECDSA_PRIVATE_TYPE_URL, key.version)?;
        check_params(&key.public_key.params)
            .map_err(|reason| super::key_material_invalid(ECDSA_PRIVATE_TYPE_URL, reason))?;

        let signer = EcdsaSign::new(&key.key_value, key.public_key.params.encoding)
            .map_err(|e| rejected(ECDSA_PRIVATE_TYPE_URL, e))?;
        Ok(Box::new(signer))
    }
}

/// Builds [`EcdsaVerify`] primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaPublicKeyManager;

impl KeyFactory for EcdsaPublicKeyManager {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        Err(public_keys_are_derived(template))
    }
}

impl KeyManager<dyn Verifier> for EcdsaPublicKeyManager {
    fn key_type(&self) -> &str {
        ECDSA_PUBLIC_TYPE_URL
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Verifier>, KeysetError> {
        let key: EcdsaPublicKey = decode_key(key_data)?;
        check_key_version(ECDSA_PUBLIC_TYPE_URL, key.version)?;
        check_params(&key.params)
            .map_err(|reason| super::key_material_invalid(ECDSA_PUBLIC_TYPE_URL, reason))?;

        let verifier = EcdsaVerify::new(&key.point, key.params.encoding)
            .map_err(|e| rejected(ECDSA_PUBLIC_TYPE_URL, e))?;
        Ok(Box::new(verifier))
    }
}
