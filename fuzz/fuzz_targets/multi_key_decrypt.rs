//! Fuzz target for decryption across a multi-key keyset
//!
//! # Strategy
//!
//! - Keysets of 1..=8 AEAD keys with mixed algorithms and prefix types
//! - Seeded randomness so every run is reproducible
//! - Encrypt with the primary, then decrypt valid, tampered and arbitrary
//!   ciphertexts
//!
//! # Invariants
//!
//! - Round trip through the keyset always succeeds
//! - Tampered or arbitrary ciphertexts fail with `DecryptionFailed` only
//! - Nothing panics on adversarial input

#![no_main]

use std::sync::{Arc, Mutex};

use arbitrary::Arbitrary;
use cipherset_core::{
    Aead, AeadSet, CryptoError, Environment, KeysetManager, OutputPrefixType,
};
use cipherset_crypto::{standard_registry, templates};
use libfuzzer_sys::fuzz_target;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

#[derive(Clone)]
struct FuzzEnv(Arc<Mutex<ChaCha20Rng>>);

impl Environment for FuzzEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        let Ok(mut rng) = self.0.lock() else {
            unreachable!("fuzz env is single-threaded");
        };
        rng.fill_bytes(buffer);
    }
}

#[derive(Debug, Clone, Arbitrary)]
struct KeySpec {
    algorithm: u8,
    prefix_type: u8,
}

#[derive(Debug, Clone, Arbitrary)]
enum Operation {
    RoundTrip { plaintext: Vec<u8>, associated_data: Vec<u8> },
    FlipBit { plaintext: Vec<u8>, position: u16 },
    Truncate { plaintext: Vec<u8>, keep: u16 },
    Arbitrary { ciphertext: Vec<u8> },
}

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    seed: u64,
    keys: Vec<KeySpec>,
    primary: u8,
    operations: Vec<Operation>,
}

fuzz_target!(|scenario: Scenario| {
    if scenario.keys.is_empty() || scenario.keys.len() > 8 {
        return;
    }

    let env = FuzzEnv(Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(scenario.seed))));
    let Ok(registry) = standard_registry(&env) else {
        unreachable!("built-in key types always register");
    };
    let mut manager = KeysetManager::new(registry.clone(), env);

    let mut key_ids = Vec::new();
    for spec in &scenario.keys {
        let template = match spec.algorithm % 3 {
            0 => templates::aes128_gcm(),
            1 => templates::aes256_gcm(),
            _ => templates::xchacha20_poly1305(),
        };
        let prefix_type = match spec.prefix_type % 4 {
            0 => OutputPrefixType::Tink,
            1 => OutputPrefixType::Legacy,
            2 => OutputPrefixType::Crunchy,
            _ => OutputPrefixType::Raw,
        };
        let Ok(key_id) = manager.add(&template.with_prefix(prefix_type)) else {
            unreachable!("built-in templates always generate");
        };
        key_ids.push(key_id);
    }
    let primary = key_ids[scenario.primary as usize % key_ids.len()];
    assert!(manager.set_primary(primary).is_ok());

    let Ok(aead) = manager.handle().primitive::<AeadSet>(&registry) else {
        panic!("keyset of enabled keys with a primary must resolve");
    };

    for operation in scenario.operations {
        match operation {
            Operation::RoundTrip { plaintext, associated_data } => {
                // INVARIANT 1: round trip
                let Ok(ciphertext) = aead.encrypt(&plaintext, &associated_data) else {
                    panic!("encryption with a primary must succeed");
                };
                assert_eq!(aead.decrypt(&ciphertext, &associated_data), Ok(plaintext));
            },
            Operation::FlipBit { plaintext, position } => {
                let Ok(mut ciphertext) = aead.encrypt(&plaintext, b"") else {
                    panic!("encryption with a primary must succeed");
                };
                let bit = position as usize % (ciphertext.len() * 8);
                ciphertext[bit / 8] ^= 1 << (bit % 8);

                // INVARIANT 2: tampering is detected generically
                assert_eq!(aead.decrypt(&ciphertext, b""), Err(CryptoError::DecryptionFailed));
            },
            Operation::Truncate { plaintext, keep } => {
                let Ok(ciphertext) = aead.encrypt(&plaintext, b"") else {
                    panic!("encryption with a primary must succeed");
                };
                let keep = keep as usize % ciphertext.len();
                assert_eq!(
                    aead.decrypt(&ciphertext[..keep], b""),
                    Err(CryptoError::DecryptionFailed)
                );
            },
            Operation::Arbitrary { ciphertext } => {
                // INVARIANT 3: arbitrary input only ever fails generically
                if let Err(error) = aead.decrypt(&ciphertext, b"") {
                    assert_eq!(error, CryptoError::DecryptionFailed);
                }
            },
        }
    }
});
