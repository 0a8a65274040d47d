// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic fixtures for writing tests against this crate.
use crate::crypto::ed25519::SigningKey;
use crate::crypto::Rng;
use crate::keys::{AttachmentKey, StreamNonce};

/// Complete set of key material for one sealed stream, derived from a fixed seed so sealed
/// output is reproducible across test runs.
pub struct TestSetup {
    pub rng: Rng,
    pub key: AttachmentKey,
    pub signing_key: SigningKey,
    pub stream_nonce: StreamNonce,
}

impl TestSetup {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let rng = Rng::from_seed(seed);
        let key = AttachmentKey::generate(&rng).expect("seeded rng");
        let signing_key = SigningKey::generate(&rng).expect("seeded rng");
        let stream_nonce = StreamNonce::generate(&rng).expect("seeded rng");
        Self {
            rng,
            key,
            signing_key,
            stream_nonce,
        }
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::from_seed([23; 32])
    }
}
