// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Mutex;

use rand_core::{SeedableRng, TryRngCore};
use thiserror::Error;

/// Cryptographically-secure random number generator based on the ChaCha20 stream cipher.
///
/// Used to produce one-time key material: symmetric attachment keys, signing key seeds and stream
/// nonces. The generator is seeded from the operating system; under test it can be constructed
/// from a fixed seed so key material (and thus sealed output) is reproducible.
#[derive(Debug)]
pub struct Rng {
    inner: Mutex<rand_chacha::ChaCha20Rng>,
}

impl Default for Rng {
    fn default() -> Self {
        Self {
            inner: Mutex::new(rand_chacha::ChaCha20Rng::from_os_rng()),
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
impl Rng {
    /// Deterministic generator for tests.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: Mutex::new(rand_chacha::ChaCha20Rng::from_seed(seed)),
        }
    }
}

impl Rng {
    /// Fills a fixed-size array with random bytes.
    pub fn random_array<const N: usize>(&self) -> Result<[u8; N], RngError> {
        let mut bytes = [0u8; N];
        self.fill(&mut bytes)?;
        Ok(bytes)
    }

    /// Returns a vector of `len` random bytes.
    pub fn random_vec(&self, len: usize) -> Result<Vec<u8>, RngError> {
        let mut bytes = vec![0u8; len];
        self.fill(&mut bytes)?;
        Ok(bytes)
    }

    fn fill(&self, bytes: &mut [u8]) -> Result<(), RngError> {
        let mut inner = self.inner.lock().map_err(|_| RngError::LockPoisoned)?;
        inner
            .try_fill_bytes(bytes)
            .map_err(|_| RngError::NotEnoughRandomness)
    }
}

#[derive(Debug, Error)]
pub enum RngError {
    #[error("rng lock is poisoned")]
    LockPoisoned,

    #[error("unable to collect enough randomness")]
    NotEnoughRandomness,
}
