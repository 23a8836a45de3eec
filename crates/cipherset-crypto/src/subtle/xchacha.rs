//! XChaCha20-Poly1305 with a random 192-bit nonce.
//!
//! Output layout: `nonce (24) || ciphertext || tag (16)`. The extended nonce
//! makes random nonces safe for any realistic number of messages per key.

use chacha20poly1305::{
    XNonce,
    aead::{Aead as _, KeyInit, Payload},
};
use cipherset_core::{Aead, CryptoError, Environment};

use super::AEAD_TAG_SIZE;

/// Size of the random nonce prepended to every ciphertext
pub const NONCE_SIZE: usize = 24;

/// Key size (32 bytes)
pub const KEY_SIZE: usize = 32;

/// XChaCha20-Poly1305 AEAD for one key.
pub struct XChaCha20Poly1305<E: Environment> {
    cipher: chacha20poly1305::XChaCha20Poly1305,
    env: E,
}

impl<E: Environment> XChaCha20Poly1305<E> {
    /// Create a cipher from a 32-byte key.
    pub fn new(key: &[u8], env: E) -> Result<Self, CryptoError> {
        let cipher = chacha20poly1305::XChaCha20Poly1305::new_from_slice(key).map_err(|_| {
            CryptoError::Algorithm {
                reason: format!("invalid XChaCha20-Poly1305 key size {}", key.len()),
            }
        })?;
        Ok(Self { cipher, env })
    }
}

impl<E: Environment> Aead for XChaCha20Poly1305<E> {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce = [0u8; NONCE_SIZE];
        self.env.random_bytes(&mut nonce);

        let payload = Payload { msg: plaintext, aad: associated_data };
        let Ok(sealed) = self.cipher.encrypt(XNonce::from_slice(&nonce), payload) else {
            unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
        };

        let mut ciphertext = Vec::with_capacity(NONCE_SIZE + sealed.len());
        ciphertext.extend_from_slice(&nonce);
        ciphertext.extend_from_slice(&sealed);
        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < NONCE_SIZE + AEAD_TAG_SIZE {
            return Err(CryptoError::DecryptionFailed);
        }

        let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);
        let payload = Payload { msg: sealed, aad: associated_data };

        self.cipher
            .decrypt(XNonce::from_slice(nonce), payload)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}
