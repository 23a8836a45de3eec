//! Single-key primitives.
//!
//! Each type here implements one `cipherset-core` family trait for exactly
//! one key. Key managers build them from serialized keys; the keyset adapters
//! combine them.

pub mod aes_gcm;
pub mod ecdsa;
pub mod ed25519;
pub mod hmac;
pub mod xchacha;

pub use self::aes_gcm::AesGcm;
pub use self::ecdsa::{EcdsaSign, EcdsaVerify};
pub use self::ed25519::{Ed25519Sign, Ed25519Verify};
pub use self::hmac::HmacMac;
pub use self::xchacha::XChaCha20Poly1305;

/// Poly1305 and GCM tag size (16 bytes)
pub const AEAD_TAG_SIZE: usize = 16;
