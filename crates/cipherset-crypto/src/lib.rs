//! Cipherset Cryptographic Primitives
//!
//! Concrete algorithms for `cipherset-core` keysets: single-key primitives,
//! the key managers that build them from serialized keys, and templates for
//! generating new keys.
//!
//! # Layers
//!
//! ```text
//! KeyTemplate ──▶ KeyManager::new_key_data ──▶ KeyData (CBOR key structure)
//!                                                  │
//!                                                  ▼
//!                              KeyManager::primitive ──▶ subtle primitive
//! ```
//!
//! Key structures are CBOR-encoded and versioned; secret bytes are zeroized
//! on drop. Randomness for key generation and nonces comes from an
//! [`Environment`](cipherset_core::Environment); production uses
//! [`SystemEnv`].
//!
//! # Algorithms
//!
//! - AEAD: AES-128/256-GCM, XChaCha20-Poly1305
//! - MAC: HMAC-SHA256, HMAC-SHA512 with truncated tags
//! - Signatures: Ed25519, ECDSA P-256 (DER or IEEE P1363 encoding)
//!
//! # Usage
//!
//! ```
//! use cipherset_core::{Aead, AeadSet, KeysetHandle};
//! use cipherset_crypto::{SystemEnv, standard_registry, templates};
//!
//! let env = SystemEnv::new();
//! let registry = standard_registry(&env).unwrap();
//! let handle = KeysetHandle::generate(&templates::aes256_gcm(), &registry, env).unwrap();
//!
//! let aead: AeadSet = handle.primitive(&registry).unwrap();
//! let ciphertext = aead.encrypt(b"hello", b"context").unwrap();
//! assert_eq!(aead.decrypt(&ciphertext, b"context").unwrap(), b"hello");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod config;
pub mod env;
pub mod keys;
pub mod managers;
pub mod subtle;
pub mod templates;

pub use codec::CodecError;
pub use config::{Config, KeyTypeEntry, PrimitiveKind, register, standard_registry};
pub use env::SystemEnv;
pub use managers::{
    AES_GCM_TYPE_URL, AesGcmKeyManager, ECDSA_PRIVATE_TYPE_URL, ECDSA_PUBLIC_TYPE_URL,
    ED25519_PRIVATE_TYPE_URL, ED25519_PUBLIC_TYPE_URL, EcdsaPrivateKeyManager,
    EcdsaPublicKeyManager, Ed25519PrivateKeyManager, Ed25519PublicKeyManager, HMAC_TYPE_URL,
    HmacKeyManager, XCHACHA20_POLY1305_TYPE_URL, XChaCha20Poly1305KeyManager,
};
