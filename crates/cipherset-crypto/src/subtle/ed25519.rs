//! Ed25519 signatures.

use cipherset_core::{CryptoError, Signer, Verifier};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};

/// Secret seed size (32 bytes)
pub const SECRET_KEY_SIZE: usize = 32;

/// Compressed public key size (32 bytes)
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Signature size (64 bytes)
pub const SIGNATURE_SIZE: usize = 64;

/// Ed25519 signer for one private key.
pub struct Ed25519Sign {
    signing_key: SigningKey,
}

impl Ed25519Sign {
    /// Create a signer from a 32-byte secret seed.
    pub fn new(secret: &[u8]) -> Result<Self, CryptoError> {
        let seed: &[u8; SECRET_KEY_SIZE] = secret.try_into().map_err(|_| CryptoError::Algorithm {
            reason: format!("invalid Ed25519 secret key size {}", secret.len()),
        })?;
        Ok(Self { signing_key: SigningKey::from_bytes(seed) })
    }

    /// Public key matching this signer.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl Signer for Ed25519Sign {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.signing_key.sign(data).to_bytes().to_vec())
    }
}

/// Ed25519 verifier for one public key.
pub struct Ed25519Verify {
    verifying_key: VerifyingKey,
}

impl Ed25519Verify {
    /// Create a verifier from a 32-byte compressed public key.
    pub fn new(public: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |reason: String| CryptoError::Algorithm { reason };

        let bytes: &[u8; PUBLIC_KEY_SIZE] = public
            .try_into()
            .map_err(|_| invalid(format!("invalid Ed25519 public key size {}", public.len())))?;
        let verifying_key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| invalid(format!("invalid Ed25519 public key: {e}")))?;

        Ok(Self { verifying_key })
    }
}

impl Verifier for Ed25519Verify {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        let signature =
            Signature::from_slice(signature).map_err(|_| CryptoError::SignatureVerificationFailed)?;
        self.verifying_key
            .verify(data, &signature)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}
