//! Serialized key structures.
//!
//! `*Key` types are what key managers store in `KeyData::value`; `*KeyFormat`
//! types are what templates store in `KeyTemplate::value`. Every structure
//! carries a version; only [`KEY_VERSION`] is understood.
//!
//! Secret key bytes are zeroized when the structure is dropped.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// The only supported key and key-format version.
pub const KEY_VERSION: u32 = 0;

/// Hash function used by HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashType {
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
}

impl HashType {
    /// Digest length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

/// Wire encoding of ECDSA signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureEncoding {
    /// ASN.1 DER `SEQUENCE { r, s }`
    Der,
    /// Fixed-width `r || s`
    IeeeP1363,
}

/// Curve of an ECDSA key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EllipticCurve {
    /// NIST P-256
    NistP256,
}

/// AES-GCM key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesGcmKey {
    /// Structure version
    pub version: u32,
    /// 16 or 32 raw key bytes
    pub key_value: Vec<u8>,
}

/// Parameters for generating an AES-GCM key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesGcmKeyFormat {
    /// Structure version
    pub version: u32,
    /// Key length in bytes
    pub key_size: u32,
}

/// XChaCha20-Poly1305 key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XChaCha20Poly1305Key {
    /// Structure version
    pub version: u32,
    /// 32 raw key bytes
    pub key_value: Vec<u8>,
}

/// Parameters for generating an XChaCha20-Poly1305 key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XChaCha20Poly1305KeyFormat {
    /// Structure version
    pub version: u32,
}

/// HMAC parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacParams {
    /// Underlying hash
    pub hash: HashType,
    /// Tag length in bytes after truncation
    pub tag_size: u32,
}

/// HMAC key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacKey {
    /// Structure version
    pub version: u32,
    /// Hash and tag size
    pub params: HmacParams,
    /// Raw key bytes
    pub key_value: Vec<u8>,
}

/// Parameters for generating an HMAC key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacKeyFormat {
    /// Structure version
    pub version: u32,
    /// Hash and tag size
    pub params: HmacParams,
    /// Key length in bytes
    pub key_size: u32,
}

/// Ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519PublicKey {
    /// Structure version
    pub version: u32,
    /// 32-byte compressed point
    pub key_value: Vec<u8>,
}

/// Ed25519 private key with its public half.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519PrivateKey {
    /// Structure version
    pub version: u32,
    /// Matching public key
    pub public_key: Ed25519PublicKey,
    /// 32-byte secret seed
    pub key_value: Vec<u8>,
}

/// Parameters for generating an Ed25519 key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519KeyFormat {
    /// Structure version
    pub version: u32,
}

/// ECDSA parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaParams {
    /// Curve
    pub curve: EllipticCurve,
    /// Hash applied to the message. Only SHA-256 pairs with P-256.
    pub hash: HashType,
    /// Signature encoding
    pub encoding: SignatureEncoding,
}

/// ECDSA public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaPublicKey {
    /// Structure version
    pub version: u32,
    /// Curve, hash and encoding
    pub params: EcdsaParams,
    /// Uncompressed SEC1 point
    pub point: Vec<u8>,
}

/// ECDSA private key with its public half.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaPrivateKey {
    /// Structure version
    pub version: u32,
    /// Matching public key
    pub public_key: EcdsaPublicKey,
    /// Big-endian private scalar
    pub key_value: Vec<u8>,
}

/// Parameters for generating an ECDSA key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaKeyFormat {
    /// Structure version
    pub version: u32,
    /// Curve, hash and encoding
    pub params: EcdsaParams,
}

impl Drop for AesGcmKey {
    fn drop(&mut self) {
        self.key_value.zeroize();
    }
}

impl Drop for XChaCha20Poly1305Key {
    fn drop(&mut self) {
        self.key_value.zeroize();
    }
}

impl Drop for HmacKey {
    fn drop(&mut self) {
        self.key_value.zeroize();
    }
}

impl Drop for Ed25519PrivateKey {
    fn drop(&mut self) {
        self.key_value.zeroize();
    }
}

impl Drop for EcdsaPrivateKey {
    fn drop(&mut self) {
        self.key_value.zeroize();
    }
}
