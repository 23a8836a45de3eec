//! Primitive family contracts.
//!
//! These are the capabilities callers use. Concrete algorithms implement them
//! for a single key; the adapters in [`crate::aead`], [`crate::mac`] and
//! [`crate::signature`] implement them again over a whole
//! [`PrimitiveSet`](crate::PrimitiveSet).

use crate::{error::CryptoError, primitive_set::PrimitiveSet};

/// Authenticated encryption with associated data.
pub trait Aead: Send + Sync {
    /// Encrypt `plaintext`, binding `associated_data` to the ciphertext.
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt `ciphertext`, which must have been produced with the same
    /// `associated_data`.
    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8])
    -> Result<Vec<u8>, CryptoError>;
}

/// Message authentication code.
pub trait Mac: Send + Sync {
    /// Compute a tag over `data`.
    fn compute_mac(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Check that `tag` authenticates `data`.
    ///
    /// `Ok(())` means the tag is valid; any failure is
    /// [`CryptoError::MacVerificationFailed`].
    fn verify_mac(&self, tag: &[u8], data: &[u8]) -> Result<(), CryptoError>;
}

/// Digital signature creation.
pub trait Signer: Send + Sync {
    /// Sign `data`.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// Digital signature verification.
pub trait Verifier: Send + Sync {
    /// Check that `signature` is valid for `data`.
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), CryptoError>;
}

/// A family adapter built from a primitive set.
///
/// Lets [`KeysetHandle`](crate::KeysetHandle) resolve a keyset straight into
/// the adapter the caller asked for.
pub trait Wrapper: Sized {
    /// Primitive family the set holds, e.g. `dyn Aead`.
    type Primitive: ?Sized + Send + Sync + 'static;

    /// Wrap a resolved set.
    fn wrap(set: PrimitiveSet<Self::Primitive>) -> Self;
}
