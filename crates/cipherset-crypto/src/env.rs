//! Production environment backed by the OS RNG.

use cipherset_core::Environment;

/// Production environment using OS cryptographic randomness.
///
/// # Panics
///
/// Panics if the OS RNG fails. Keys and nonces cannot be generated safely
/// without it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - keys and nonces need entropy");
    }
}
