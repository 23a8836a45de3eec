//! ECDSA over NIST P-256 with SHA-256.
//!
//! Signatures are encoded either as ASN.1 DER or as fixed-width IEEE P1363
//! `r || s` (64 bytes).

use cipherset_core::{CryptoError, Signer, Verifier};
use p256::ecdsa::{
    Signature, SigningKey, VerifyingKey,
    signature::{Signer as _, Verifier as _},
};

use crate::keys::SignatureEncoding;

/// Private scalar size (32 bytes)
pub const SECRET_KEY_SIZE: usize = 32;

/// Uncompressed SEC1 point size (65 bytes)
pub const PUBLIC_POINT_SIZE: usize = 65;

/// ECDSA P-256 signer for one private key.
pub struct EcdsaSign {
    signing_key: SigningKey,
    encoding: SignatureEncoding,
}

impl EcdsaSign {
    /// Create a signer from a big-endian private scalar.
    ///
    /// # Errors
    ///
    /// - `Algorithm` if the scalar is zero, out of range or of the wrong size
    pub fn new(secret: &[u8], encoding: SignatureEncoding) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(secret).map_err(|e| CryptoError::Algorithm {
            reason: format!("invalid P-256 private key: {e}"),
        })?;
        Ok(Self { signing_key, encoding })
    }

    /// Uncompressed SEC1 encoding of the matching public key.
    pub fn public_point(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
    }
}

impl Signer for EcdsaSign {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signature: Signature = self
            .signing_key
            .try_sign(data)
            .map_err(|e| CryptoError::Algorithm { reason: format!("ECDSA signing failed: {e}") })?;

        Ok(match self.encoding {
            SignatureEncoding::Der => signature.to_der().as_bytes().to_vec(),
            SignatureEncoding::IeeeP1363 => signature.to_bytes().to_vec(),
        })
    }
}

/// ECDSA P-256 verifier for one public key.
pub struct EcdsaVerify {
    verifying_key: VerifyingKey,
    encoding: SignatureEncoding,
}

impl EcdsaVerify {
    /// Create a verifier from a SEC1-encoded public point.
    pub fn new(point: &[u8], encoding: SignatureEncoding) -> Result<Self, CryptoError> {
        let verifying_key = VerifyingKey::from_sec1_bytes(point).map_err(|e| {
            CryptoError::Algorithm { reason: format!("invalid P-256 public key: {e}") }
        })?;
        Ok(Self { verifying_key, encoding })
    }
}

impl Verifier for EcdsaVerify {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        let signature = match self.encoding {
            SignatureEncoding::Der => Signature::from_der(signature),
            SignatureEncoding::IeeeP1363 => Signature::from_slice(signature),
        }
        .map_err(|_| CryptoError::SignatureVerificationFailed)?;

        self.verifying_key
            .verify(data, &signature)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}
