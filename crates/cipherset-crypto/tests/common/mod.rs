//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cipherset_core::{Environment, KeyTemplate, KeysetHandle, Registry};
use cipherset_crypto::standard_registry;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

// Seeded environment so keys, key ids and nonces are reproducible
#[derive(Clone)]
pub struct TestEnv(Arc<Mutex<ChaCha20Rng>>);

impl TestEnv {
    pub fn with_seed(seed: u64) -> Self {
        Self(Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))))
    }
}

impl Environment for TestEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        self.0.lock().unwrap().fill_bytes(buffer);
    }
}

/// Standard registry drawing randomness from `env`.
pub fn registry(env: &TestEnv) -> Registry {
    standard_registry(env).unwrap()
}

/// Handle with one fresh primary generated from `template`.
pub fn generate(template: &KeyTemplate, registry: &Registry, env: &TestEnv) -> KeysetHandle {
    KeysetHandle::generate(template, registry, env.clone()).unwrap()
}
