//! Keyed toy primitives for exercising resolution without real cryptography.
//!
//! Every "key" is a `u64`. Outputs are authenticated with a SipHash-based tag
//! over the key and inputs, which is enough to tell keys apart reliably in
//! tests. None of this is secure.

#![allow(dead_code)]

use std::{
    hash::{DefaultHasher, Hash, Hasher},
    sync::atomic::{AtomicU64, Ordering},
};

use cipherset_core::{
    Aead, CryptoError, Key, KeyData, KeyFactory, KeyManager, KeyMaterialType, KeyStatus,
    KeyTemplate, Keyset, KeysetError, Mac, OutputPrefixType, Registry, Signer, Verifier,
};

pub const AEAD_TYPE: &str = "type.test/ToyAead";
pub const MAC_TYPE: &str = "type.test/ToyMac";
pub const SIGNER_TYPE: &str = "type.test/ToySigner";
pub const VERIFIER_TYPE: &str = "type.test/ToyVerifier";

/// Length of every toy tag.
pub const TAG_SIZE: usize = 8;

fn tag(key: u64, parts: &[&[u8]]) -> [u8; TAG_SIZE] {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    for part in parts {
        part.hash(&mut hasher);
    }
    hasher.finish().to_be_bytes()
}

/// `plaintext XOR key byte || tag(key, plaintext, aad)`
pub struct ToyAead(pub u64);

impl Aead for ToyAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mask = self.0 as u8;
        let mut out: Vec<u8> = plaintext.iter().map(|b| b ^ mask).collect();
        out.extend_from_slice(&tag(self.0, &[plaintext, associated_data]));
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let split = ciphertext.len().checked_sub(TAG_SIZE).ok_or(CryptoError::DecryptionFailed)?;
        let (body, received) = ciphertext.split_at(split);
        let mask = self.0 as u8;
        let plaintext: Vec<u8> = body.iter().map(|b| b ^ mask).collect();

        if tag(self.0, &[plaintext.as_slice(), associated_data]) == received {
            Ok(plaintext)
        } else {
            Err(CryptoError::DecryptionFailed)
        }
    }
}

pub struct ToyMac(pub u64);

impl Mac for ToyMac {
    fn compute_mac(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(tag(self.0, &[data]).to_vec())
    }

    fn verify_mac(&self, received: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        if tag(self.0, &[data]) == received {
            Ok(())
        } else {
            Err(CryptoError::MacVerificationFailed)
        }
    }
}

pub struct ToySigner(pub u64);

impl Signer for ToySigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(tag(self.0, &[b"sig".as_slice(), data]).to_vec())
    }
}

pub struct ToyVerifier(pub u64);

impl Verifier for ToyVerifier {
    fn verify(&self, signature: &[u8], data: &[u8]) -> Result<(), CryptoError> {
        if tag(self.0, &[b"sig".as_slice(), data]) == signature {
            Ok(())
        } else {
            Err(CryptoError::SignatureVerificationFailed)
        }
    }
}

fn parse_key(key_data: &KeyData) -> Result<u64, KeysetError> {
    let bytes: [u8; 8] =
        key_data.value.as_slice().try_into().map_err(|_| KeysetError::KeyMaterialInvalid {
            type_url: key_data.type_url.clone(),
            reason: format!("expected 8 bytes, got {}", key_data.value.len()),
        })?;
    Ok(u64::from_be_bytes(bytes))
}

/// Generates keys 1000, 1001, ...
#[derive(Default)]
pub struct Counter(AtomicU64);

impl Counter {
    fn next(&self) -> Vec<u8> {
        (1000 + self.0.fetch_add(1, Ordering::SeqCst)).to_be_bytes().to_vec()
    }
}

#[derive(Default)]
pub struct ToyAeadManager(Counter);

impl KeyFactory for ToyAeadManager {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        Ok(KeyData::new(template.type_url.clone(), self.0.next(), KeyMaterialType::Symmetric))
    }
}

impl KeyManager<dyn Aead> for ToyAeadManager {
    fn key_type(&self) -> &str {
        AEAD_TYPE
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Aead>, KeysetError> {
        Ok(Box::new(ToyAead(parse_key(key_data)?)))
    }
}

#[derive(Default)]
pub struct ToyMacManager(Counter);

impl KeyFactory for ToyMacManager {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        Ok(KeyData::new(template.type_url.clone(), self.0.next(), KeyMaterialType::Symmetric))
    }
}

impl KeyManager<dyn Mac> for ToyMacManager {
    fn key_type(&self) -> &str {
        MAC_TYPE
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Mac>, KeysetError> {
        Ok(Box::new(ToyMac(parse_key(key_data)?)))
    }
}

#[derive(Default)]
pub struct ToySignerManager(Counter);

impl KeyFactory for ToySignerManager {
    fn new_key_data(&self, template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        Ok(KeyData::new(
            template.type_url.clone(),
            self.0.next(),
            KeyMaterialType::AsymmetricPrivate,
        ))
    }

    fn public_key_data(&self, private_key: &KeyData) -> Result<KeyData, KeysetError> {
        Ok(KeyData::new(
            VERIFIER_TYPE,
            private_key.value.clone(),
            KeyMaterialType::AsymmetricPublic,
        ))
    }
}

impl KeyManager<dyn Signer> for ToySignerManager {
    fn key_type(&self) -> &str {
        SIGNER_TYPE
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Signer>, KeysetError> {
        Ok(Box::new(ToySigner(parse_key(key_data)?)))
    }
}

pub struct ToyVerifierManager;

impl KeyFactory for ToyVerifierManager {
    fn new_key_data(&self, _template: &KeyTemplate) -> Result<KeyData, KeysetError> {
        Err(KeysetError::NewKeyForbidden { type_url: VERIFIER_TYPE.to_string() })
    }
}

impl KeyManager<dyn Verifier> for ToyVerifierManager {
    fn key_type(&self) -> &str {
        VERIFIER_TYPE
    }

    fn primitive(&self, key_data: &KeyData) -> Result<Box<dyn Verifier>, KeysetError> {
        Ok(Box::new(ToyVerifier(parse_key(key_data)?)))
    }
}

/// Registry with every toy manager.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register::<dyn Aead, _>(ToyAeadManager::default(), true).unwrap();
    registry.register::<dyn Mac, _>(ToyMacManager::default(), true).unwrap();
    registry.register::<dyn Signer, _>(ToySignerManager::default(), true).unwrap();
    registry.register::<dyn Verifier, _>(ToyVerifierManager, false).unwrap();
    registry
}

/// Enabled key of `type_url` whose toy key value is `key`.
pub fn key(type_url: &str, key_id: u32, prefix: OutputPrefixType, key: u64) -> Key {
    let material_type = if type_url == SIGNER_TYPE {
        KeyMaterialType::AsymmetricPrivate
    } else {
        KeyMaterialType::Symmetric
    };
    Key::enabled(key_id, prefix, KeyData::new(type_url, key.to_be_bytes().to_vec(), material_type))
}

pub fn aead_key(key_id: u32, prefix: OutputPrefixType, key: u64) -> Key {
    self::key(AEAD_TYPE, key_id, prefix, key)
}

pub fn mac_key(key_id: u32, prefix: OutputPrefixType, key: u64) -> Key {
    self::key(MAC_TYPE, key_id, prefix, key)
}

pub fn with_status(mut key: Key, status: KeyStatus) -> Key {
    key.status = status;
    key
}

pub fn keyset(primary_key_id: u32, keys: Vec<Key>) -> Keyset {
    Keyset::new(primary_key_id, keys)
}

/// Deterministic environment handing out 1, 2, 3, ... as random words.
#[derive(Clone, Default)]
pub struct SequenceEnv(std::sync::Arc<std::sync::atomic::AtomicU32>);

impl cipherset_core::Environment for SequenceEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        for chunk in buffer.chunks_mut(4) {
            let word = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            chunk.copy_from_slice(&word.to_be_bytes()[..chunk.len()]);
        }
    }
}
