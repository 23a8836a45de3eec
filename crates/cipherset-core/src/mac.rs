//! Keyset-backed MAC.
//!
//! Tags are computed with the primary key and prefixed with its identifier.
//! Verification tries every candidate key and succeeds on the first that
//! accepts the tag. LEGACY keys MAC `data || 0x00` on both sides.

use crate::{
    error::CryptoError,
    format::with_legacy_sentinel,
    primitive::{Mac, Wrapper},
    primitive_set::PrimitiveSet,
};

/// MAC over all enabled keys of a keyset.
#[derive(Debug)]
pub struct MacSet {
    set: PrimitiveSet<dyn Mac>,
}

impl MacSet {
    /// Wrap a resolved set.
    pub fn new(set: PrimitiveSet<dyn Mac>) -> Self {
        Self { set }
    }

    /// The underlying primitive set.
    pub fn primitive_set(&self) -> &PrimitiveSet<dyn Mac> {
        &self.set
    }
}

impl Mac for MacSet {
    fn compute_mac(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let primary = self.set.primary().ok_or(CryptoError::NoPrimaryKey)?;

        let data = with_legacy_sentinel(primary.output_prefix_type(), data);
        let tag = primary.primitive().compute_mac(&data)?;

        Ok(primary.identifier().prepend_to(&tag))
    }

    fn verify_mac(&self, tag: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        let verified = self.set.candidates(tag).any(|(entry, raw_tag)| {
            let data = with_legacy_sentinel(entry.output_prefix_type(), data);
            let accepted = entry.primitive().verify_mac(raw_tag, &data).is_ok();
            if !accepted {
                tracing::trace!(key_id = entry.key_id(), "candidate key did not verify mac");
            }
            accepted
        });

        if verified {
            Ok(())
        } else {
            Err(CryptoError::MacVerificationFailed)
        }
    }
}

impl Wrapper for MacSet {
    type Primitive = dyn Mac;

    fn wrap(set: PrimitiveSet<dyn Mac>) -> Self {
        Self::new(set)
    }
}
