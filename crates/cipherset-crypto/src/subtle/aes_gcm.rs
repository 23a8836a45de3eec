//! AES-GCM with a random 96-bit IV.
//!
//! Output layout: `iv (12) || ciphertext || tag (16)`.

use aes_gcm::{
    Aes128Gcm, Aes256Gcm, Nonce,
    aead::{Aead as _, KeyInit, Payload, consts::U12},
};
use cipherset_core::{Aead, CryptoError, Environment};

use super::AEAD_TAG_SIZE;

/// Size of the random IV prepended to every ciphertext
pub const IV_SIZE: usize = 12;

enum Cipher {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

/// AES-128-GCM or AES-256-GCM, chosen by key length.
pub struct AesGcm<E: Environment> {
    cipher: Cipher,
    env: E,
}

impl<E: Environment> AesGcm<E> {
    /// Create a cipher from a 16- or 32-byte key.
    ///
    /// # Errors
    ///
    /// - `Algorithm` if the key has any other length
    pub fn new(key: &[u8], env: E) -> Result<Self, CryptoError> {
        let invalid =
            || CryptoError::Algorithm { reason: format!("invalid AES-GCM key size {}", key.len()) };

        let cipher = match key.len() {
            16 => Cipher::Aes128(Aes128Gcm::new_from_slice(key).map_err(|_| invalid())?),
            32 => Cipher::Aes256(Aes256Gcm::new_from_slice(key).map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };
        Ok(Self { cipher, env })
    }
}

impl<E: Environment> Aead for AesGcm<E> {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut iv = [0u8; IV_SIZE];
        self.env.random_bytes(&mut iv);

        let nonce = Nonce::<U12>::from_slice(&iv);
        let payload = Payload { msg: plaintext, aad: associated_data };
        let sealed = match &self.cipher {
            Cipher::Aes128(cipher) => cipher.encrypt(nonce, payload),
            Cipher::Aes256(cipher) => cipher.encrypt(nonce, payload),
        }
        .map_err(|_| CryptoError::Algorithm { reason: "AES-GCM encryption failed".to_string() })?;

        let mut ciphertext = Vec::with_capacity(IV_SIZE + sealed.len());
        ciphertext.extend_from_slice(&iv);
        ciphertext.extend_from_slice(&sealed);
        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < IV_SIZE + AEAD_TAG_SIZE {
            return Err(CryptoError::DecryptionFailed);
        }

        let (iv, sealed) = ciphertext.split_at(IV_SIZE);
        let nonce = Nonce::<U12>::from_slice(iv);
        let payload = Payload { msg: sealed, aad: associated_data };

        let opened = match &self.cipher {
            Cipher::Aes128(cipher) => cipher.decrypt(nonce, payload),
            Cipher::Aes256(cipher) => cipher.decrypt(nonce, payload),
        };
        opened.map_err(|_| CryptoError::DecryptionFailed)
    }
}
