//! Keyset-backed digital signatures.
//!
//! [`SignerSet`] signs with the primary private key and prefixes the
//! signature with its identifier. [`VerifierSet`] holds the matching public
//! keys and accepts a signature if any candidate key verifies it. LEGACY keys
//! sign and verify `data || 0x00`.

use crate::{
    error::CryptoError,
    format::with_legacy_sentinel,
    primitive::{Signer, Verifier, Wrapper},
    primitive_set::PrimitiveSet,
};

/// Signer over all enabled keys of a private keyset.
#[derive(Debug)]
pub struct SignerSet {
    set: PrimitiveSet<dyn Signer>,
}

impl SignerSet {
    /// Wrap a resolved set.
    pub fn new(set: PrimitiveSet<dyn Signer>) -> Self {
        Self { set }
    }

    /// The underlying primitive set.
    pub fn primitive_set(&self) -> &PrimitiveSet<dyn Signer> {
        &self.set
    }
}

impl Signer for SignerSet {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let primary = self.set.primary().ok_or(CryptoError::NoPrimaryKey)?;

        let data = with_legacy_sentinel(primary.output_prefix_type(), data);
        let signature = primary.primitive().sign(&data)?;

        Ok(primary.identifier().prepend_to(&signature))
    }
}

impl Wrapper for SignerSet {
    type Primitive = dyn Signer;

    fn wrap(set: PrimitiveSet<dyn Signer>) -> Self {
        Self::new(set)
    }
}

/// Verifier over all enabled keys of a public keyset.
#[derive(Debug)]
pub struct VerifierSet {
    set: PrimitiveSet<dyn Verifier>,
}

impl VerifierSet {
    /// Wrap a resolved set.
    pub fn new(set: PrimitiveSet<dyn Verifier>) -> Self {
        Self { set }
    }

    /// The underlying primitive set.
    pub fn primitive_set(&self) -> &PrimitiveSet<dyn Verifier> {
        &self.set
    }
}

impl Verifier for VerifierSet {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        let verified = self.set.candidates(signature).any(|(entry, raw_signature)| {
            let data = with_legacy_sentinel(entry.output_prefix_type(), data);
            let accepted = entry.primitive().verify(raw_signature, &data).is_ok();
            if !accepted {
                tracing::trace!(key_id = entry.key_id(), "candidate key did not verify signature");
            }
            accepted
        });

        if verified {
            Ok(())
        } else {
            Err(CryptoError::SignatureVerificationFailed)
        }
    }
}

impl Wrapper for VerifierSet {
    type Primitive = dyn Verifier;

    fn wrap(set: PrimitiveSet<dyn Verifier>) -> Self {
        Self::new(set)
    }
}
