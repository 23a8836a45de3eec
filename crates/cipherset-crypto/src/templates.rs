//! Ready-made key templates.
//!
//! Every template uses the TINK output prefix. Use
//! [`KeyTemplate::with_prefix`] for RAW, LEGACY or CRUNCHY keys.

use cipherset_core::{KeyTemplate, OutputPrefixType};
use serde::Serialize;

use crate::{
    codec,
    keys::{
        AesGcmKeyFormat, EcdsaKeyFormat, EcdsaParams, Ed25519KeyFormat, EllipticCurve, HashType,
        HmacKeyFormat, HmacParams, KEY_VERSION, SignatureEncoding, XChaCha20Poly1305KeyFormat,
    },
    managers::{
        AES_GCM_TYPE_URL, ECDSA_PRIVATE_TYPE_URL, ED25519_PRIVATE_TYPE_URL, HMAC_TYPE_URL,
        XCHACHA20_POLY1305_TYPE_URL,
    },
};

fn template<T: Serialize>(type_url: &str, format: &T) -> KeyTemplate {
    let Ok(value) = codec::encode(format) else {
        unreachable!("key formats are plain structs and always encode");
    };
    KeyTemplate::new(type_url, value, OutputPrefixType::Tink)
}

fn aes_gcm(key_size: u32) -> KeyTemplate {
    template(AES_GCM_TYPE_URL, &AesGcmKeyFormat { version: KEY_VERSION, key_size })
}

fn hmac(hash: HashType, key_size: u32, tag_size: u32) -> KeyTemplate {
    template(
        HMAC_TYPE_URL,
        &HmacKeyFormat { version: KEY_VERSION, params: HmacParams { hash, tag_size }, key_size },
    )
}

fn ecdsa(encoding: SignatureEncoding) -> KeyTemplate {
    template(
        ECDSA_PRIVATE_TYPE_URL,
        &EcdsaKeyFormat {
            version: KEY_VERSION,
            params: EcdsaParams {
                curve: EllipticCurve::NistP256,
                hash: HashType::Sha256,
                encoding,
            },
        },
    )
}

/// AES-128-GCM.
pub fn aes128_gcm() -> KeyTemplate {
    aes_gcm(16)
}

/// AES-256-GCM.
pub fn aes256_gcm() -> KeyTemplate {
    aes_gcm(32)
}

/// XChaCha20-Poly1305.
pub fn xchacha20_poly1305() -> KeyTemplate {
    template(XCHACHA20_POLY1305_TYPE_URL, &XChaCha20Poly1305KeyFormat { version: KEY_VERSION })
}

/// HMAC-SHA256, 32-byte key, 16-byte tag.
pub fn hmac_sha256_128bit_tag() -> KeyTemplate {
    hmac(HashType::Sha256, 32, 16)
}

/// HMAC-SHA256, 32-byte key, 32-byte tag.
pub fn hmac_sha256_256bit_tag() -> KeyTemplate {
    hmac(HashType::Sha256, 32, 32)
}

/// HMAC-SHA512, 64-byte key, 32-byte tag.
pub fn hmac_sha512_256bit_tag() -> KeyTemplate {
    hmac(HashType::Sha512, 64, 32)
}

/// HMAC-SHA512, 64-byte key, 64-byte tag.
pub fn hmac_sha512_512bit_tag() -> KeyTemplate {
    hmac(HashType::Sha512, 64, 64)
}

/// Ed25519.
pub fn ed25519() -> KeyTemplate {
    template(ED25519_PRIVATE_TYPE_URL, &Ed25519KeyFormat { version: KEY_VERSION })
}

/// ECDSA P-256 with SHA-256, DER-encoded signatures.
pub fn ecdsa_p256() -> KeyTemplate {
    ecdsa(SignatureEncoding::Der)
}

/// ECDSA P-256 with SHA-256, IEEE P1363 signatures.
pub fn ecdsa_p256_ieee_p1363() -> KeyTemplate {
    ecdsa(SignatureEncoding::IeeeP1363)
}
