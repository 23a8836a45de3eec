//! Keyset-backed AEAD.
//!
//! Encryption always uses the primary key and prefixes the ciphertext with
//! its identifier. Decryption tries every key that may have produced the
//! ciphertext (see [`PrimitiveSet::candidates`]) and returns the first
//! plaintext that authenticates.
//!
//! # Legacy keys
//!
//! For LEGACY keys the sentinel byte is appended to the plaintext before
//! sealing. On decryption a LEGACY candidate must yield a plaintext ending in
//! the sentinel, which is then stripped; a plaintext without it counts as a
//! failed attempt.

use crate::{
    error::CryptoError,
    format::{LEGACY_SENTINEL, with_legacy_sentinel},
    keyset::OutputPrefixType,
    primitive::{Aead, Wrapper},
    primitive_set::{Entry, PrimitiveSet},
};

/// AEAD over all enabled keys of a keyset.
#[derive(Debug)]
pub struct AeadSet {
    set: PrimitiveSet<dyn Aead>,
}

impl AeadSet {
    /// Wrap a resolved set.
    pub fn new(set: PrimitiveSet<dyn Aead>) -> Self {
        Self { set }
    }

    /// The underlying primitive set.
    pub fn primitive_set(&self) -> &PrimitiveSet<dyn Aead> {
        &self.set
    }

    fn try_decrypt(
        entry: &Entry<dyn Aead>,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Option<Vec<u8>> {
        let mut plaintext = match entry.primitive().decrypt(ciphertext, associated_data) {
            Ok(plaintext) => plaintext,
            Err(_) => {
                tracing::trace!(key_id = entry.key_id(), "candidate key did not decrypt");
                return None;
            },
        };

        if entry.output_prefix_type() == OutputPrefixType::Legacy {
            if plaintext.last() != Some(&LEGACY_SENTINEL) {
                tracing::trace!(key_id = entry.key_id(), "legacy plaintext missing sentinel");
                return None;
            }
            plaintext.pop();
        }

        Some(plaintext)
    }
}

impl Aead for AeadSet {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let primary = self.set.primary().ok_or(CryptoError::NoPrimaryKey)?;

        let plaintext = with_legacy_sentinel(primary.output_prefix_type(), plaintext);
        let ciphertext = primary.primitive().encrypt(&plaintext, associated_data)?;

        Ok(primary.identifier().prepend_to(&ciphertext))
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.set
            .candidates(ciphertext)
            .find_map(|(entry, payload)| Self::try_decrypt(entry, payload, associated_data))
            .ok_or(CryptoError::DecryptionFailed)
    }
}

impl Wrapper for AeadSet {
    type Primitive = dyn Aead;

    fn wrap(set: PrimitiveSet<dyn Aead>) -> Self {
        Self::new(set)
    }
}
