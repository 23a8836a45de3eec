//! Registry configuration.
//!
//! A [`Config`] lists which key types to register and whether new keys of
//! each type may be generated. [`register`] turns it into key managers in a
//! [`Registry`]; [`standard_registry`] does so for every built-in type.

use cipherset_core::{Aead, Environment, KeysetError, Mac, Registry, Signer, Verifier};
use serde::{Deserialize, Serialize};

use crate::managers::{
    AES_GCM_TYPE_URL, AesGcmKeyManager, ECDSA_PRIVATE_TYPE_URL, ECDSA_PUBLIC_TYPE_URL,
    ED25519_PRIVATE_TYPE_URL, ED25519_PUBLIC_TYPE_URL, EcdsaPrivateKeyManager,
    EcdsaPublicKeyManager, Ed25519PrivateKeyManager, Ed25519PublicKeyManager, HMAC_TYPE_URL,
    HmacKeyManager, XCHACHA20_POLY1305_TYPE_URL, XChaCha20Poly1305KeyManager,
};

/// Primitive family a key type is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// [`Aead`]
    Aead,
    /// [`Mac`]
    Mac,
    /// [`Signer`]
    Signer,
    /// [`Verifier`]
    Verifier,
}

/// One key type to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTypeEntry {
    /// Family the key type's primitives belong to
    pub primitive: PrimitiveKind,
    /// Type URL of the key type
    pub type_url: String,
    /// Whether the registry may generate new keys of this type
    pub new_key_allowed: bool,
}

impl KeyTypeEntry {
    fn new(primitive: PrimitiveKind, type_url: &str, new_key_allowed: bool) -> Self {
        Self { primitive, type_url: type_url.to_string(), new_key_allowed }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Key types in registration order
    pub entries: Vec<KeyTypeEntry>,
}

impl Config {
    /// AES-GCM and XChaCha20-Poly1305.
    pub fn aead() -> Self {
        Self {
            entries: vec![
                KeyTypeEntry::new(PrimitiveKind::Aead, AES_GCM_TYPE_URL, true),
                KeyTypeEntry::new(PrimitiveKind::Aead, XCHACHA20_POLY1305_TYPE_URL, true),
            ],
        }
    }

    /// HMAC-SHA2.
    pub fn mac() -> Self {
        Self { entries: vec![KeyTypeEntry::new(PrimitiveKind::Mac, HMAC_TYPE_URL, true)] }
    }

    /// Ed25519 and ECDSA P-256, private and public halves.
    ///
    /// Public key types never generate keys; they are derived from private
    /// keys.
    pub fn signature() -> Self {
        Self {
            entries: vec![
                KeyTypeEntry::new(PrimitiveKind::Signer, ED25519_PRIVATE_TYPE_URL, true),
                KeyTypeEntry::new(PrimitiveKind::Verifier, ED25519_PUBLIC_TYPE_URL, false),
                KeyTypeEntry::new(PrimitiveKind::Signer, ECDSA_PRIVATE_TYPE_URL, true),
                KeyTypeEntry::new(PrimitiveKind::Verifier, ECDSA_PUBLIC_TYPE_URL, false),
            ],
        }
    }

    /// Every built-in key type.
    pub fn standard() -> Self {
        let entries = [Self::aead(), Self::mac(), Self::signature()]
            .into_iter()
            .flat_map(|config| config.entries)
            .collect();
        Self { entries }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::standard()
    }
}

/// Register the key managers named by `config`.
///
/// Managers that generate keys or nonces get a clone of `env`.
///
/// # Errors
///
/// - `NoKeyManagerFound` if an entry names a type URL / family pair with no
///   built-in manager
/// - `DuplicateKeyManager` if the registry already holds a conflicting
///   registration
pub fn register<E: Environment>(
    registry: &mut Registry,
    config: &Config,
    env: &E,
) -> Result<(), KeysetError> {
    for entry in &config.entries {
        let allowed = entry.new_key_allowed;
        match (entry.primitive, entry.type_url.as_str()) {
            (PrimitiveKind::Aead, AES_GCM_TYPE_URL) => {
                registry.register::<dyn Aead, _>(AesGcmKeyManager::new(env.clone()), allowed)?;
            },
            (PrimitiveKind::Aead, XCHACHA20_POLY1305_TYPE_URL) => {
                registry.register::<dyn Aead, _>(
                    XChaCha20Poly1305KeyManager::new(env.clone()),
                    allowed,
                )?;
            },
            (PrimitiveKind::Mac, HMAC_TYPE_URL) => {
                registry.register::<dyn Mac, _>(HmacKeyManager::new(env.clone()), allowed)?;
            },
            (PrimitiveKind::Signer, ED25519_PRIVATE_TYPE_URL) => {
                registry.register::<dyn Signer, _>(
                    Ed25519PrivateKeyManager::new(env.clone()),
                    allowed,
                )?;
            },
            (PrimitiveKind::Verifier, ED25519_PUBLIC_TYPE_URL) => {
                registry.register::<dyn Verifier, _>(Ed25519PublicKeyManager, allowed)?;
            },
            (PrimitiveKind::Signer, ECDSA_PRIVATE_TYPE_URL) => {
                registry
                    .register::<dyn Signer, _>(EcdsaPrivateKeyManager::new(env.clone()), allowed)?;
            },
            (PrimitiveKind::Verifier, ECDSA_PUBLIC_TYPE_URL) => {
                registry.register::<dyn Verifier, _>(EcdsaPublicKeyManager, allowed)?;
            },
            _ => {
                return Err(KeysetError::NoKeyManagerFound { type_url: entry.type_url.clone() });
            },
        }
    }

    tracing::debug!(entries = config.entries.len(), "registered configured key types");
    Ok(())
}

/// A fresh registry holding every built-in key type.
pub fn standard_registry<E: Environment>(env: &E) -> Result<Registry, KeysetError> {
    let mut registry = Registry::new();
    register(&mut registry, &Config::standard(), env)?;
    Ok(registry)
}
