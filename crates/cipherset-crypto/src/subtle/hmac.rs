//! HMAC-SHA2 with truncated tags.

use cipherset_core::{CryptoError, Mac};
use hmac::{Hmac, Mac as _};
use sha2::{Sha256, Sha512};
use zeroize::Zeroize;

use crate::keys::HashType;

/// Shortest accepted key (16 bytes)
pub const MIN_KEY_SIZE: usize = 16;

/// Shortest accepted tag (10 bytes)
pub const MIN_TAG_SIZE: usize = 10;

/// HMAC over SHA-256 or SHA-512, truncated to `tag_size` bytes.
pub struct HmacMac {
    key: Vec<u8>,
    hash: HashType,
    tag_size: usize,
}

impl HmacMac {
    /// Create a MAC.
    ///
    /// # Errors
    ///
    /// - `Algorithm` if the key is shorter than [`MIN_KEY_SIZE`] or the tag
    ///   size is outside `MIN_TAG_SIZE..=digest size`
    pub fn new(key: &[u8], hash: HashType, tag_size: usize) -> Result<Self, CryptoError> {
        if key.len() < MIN_KEY_SIZE {
            return Err(CryptoError::Algorithm {
                reason: format!("HMAC key too short: {} bytes", key.len()),
            });
        }
        if !(MIN_TAG_SIZE..=hash.digest_size()).contains(&tag_size) {
            return Err(CryptoError::Algorithm {
                reason: format!("invalid tag size {tag_size} for {hash:?}"),
            });
        }
        Ok(Self { key: key.to_vec(), hash, tag_size })
    }

    /// Tag length in bytes.
    pub fn tag_size(&self) -> usize {
        self.tag_size
    }
}

impl Mac for HmacMac {
    fn compute_mac(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut tag = match self.hash {
            HashType::Sha256 => {
                let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&self.key) else {
                    unreachable!("HMAC accepts keys of any length");
                };
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            },
            HashType::Sha512 => {
                let Ok(mut mac) = Hmac::<Sha512>::new_from_slice(&self.key) else {
                    unreachable!("HMAC accepts keys of any length");
                };
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            },
        };
        tag.truncate(self.tag_size);
        Ok(tag)
    }

    /// Constant-time comparison of the leftmost `tag_size` bytes.
    fn verify_mac(&self, tag: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        if tag.len() != self.tag_size {
            return Err(CryptoError::MacVerificationFailed);
        }

        let verified = match self.hash {
            HashType::Sha256 => {
                let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&self.key) else {
                    unreachable!("HMAC accepts keys of any length");
                };
                mac.update(data);
                mac.verify_truncated_left(tag)
            },
            HashType::Sha512 => {
                let Ok(mut mac) = Hmac::<Sha512>::new_from_slice(&self.key) else {
                    unreachable!("HMAC accepts keys of any length");
                };
                mac.update(data);
                mac.verify_truncated_left(tag)
            },
        };
        verified.map_err(|_| CryptoError::MacVerificationFailed)
    }
}

impl Drop for HmacMac {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
