// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-stream key material: the symmetric attachment key and the stream nonce.
//!
//! Both values are generated once per attachment and shared with recipients out of band (inside
//! the encrypted chat envelope). The crate never rotates or derives them; a sealed stream uses
//! exactly one key, one signing key pair and one stream nonce.
use serde::{Deserialize, Serialize};

use crate::crypto::{secretbox, Rng, RngError, Secret};

/// Symmetric key size, matching the secretbox key size.
pub const ATTACHMENT_KEY_SIZE: usize = secretbox::KEY_SIZE;

/// Per-stream nonce size; the high half of every chunk nonce.
pub const STREAM_NONCE_SIZE: usize = 16;

/// Symmetric key a single attachment stream is sealed under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentKey(Secret<ATTACHMENT_KEY_SIZE>);

impl AttachmentKey {
    /// Generates a fresh one-time attachment key.
    pub fn generate(rng: &Rng) -> Result<Self, RngError> {
        Ok(Self(Secret::from_bytes(rng.random_array()?)))
    }

    /// Wraps key bytes received from the sender.
    pub fn from_bytes(bytes: [u8; ATTACHMENT_KEY_SIZE]) -> Self {
        Self(Secret::from_bytes(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; ATTACHMENT_KEY_SIZE] {
        self.0.expose()
    }
}

/// Per-stream nonce.
///
/// Must be unique with respect to the attachment key and signing key pair; reusing a stream
/// nonce under the same keys breaks both confidentiality and authenticity. When all three are
/// one-time-use (the usual case for chat attachments) the all-zero nonce is acceptable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamNonce(#[serde(with = "serde_bytes")] [u8; STREAM_NONCE_SIZE]);

impl StreamNonce {
    /// The all-zero nonce, for callers whose key material is one-time-use per stream.
    pub const fn zero() -> Self {
        Self([0; STREAM_NONCE_SIZE])
    }

    /// Generates a random stream nonce.
    pub fn generate(rng: &Rng) -> Result<Self, RngError> {
        Ok(Self(rng.random_array()?))
    }

    pub fn from_bytes(bytes: [u8; STREAM_NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; STREAM_NONCE_SIZE] {
        self.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8; STREAM_NONCE_SIZE] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::Rng;

    use super::{AttachmentKey, StreamNonce, STREAM_NONCE_SIZE};

    #[test]
    fn generated_keys_are_distinct() {
        let rng = Rng::from_seed([9; 32]);

        let key_1 = AttachmentKey::generate(&rng).unwrap();
        let key_2 = AttachmentKey::generate(&rng).unwrap();
        assert_ne!(key_1, key_2);

        let nonce_1 = StreamNonce::generate(&rng).unwrap();
        let nonce_2 = StreamNonce::generate(&rng).unwrap();
        assert_ne!(nonce_1, nonce_2);
    }

    #[test]
    fn zero_nonce() {
        assert_eq!(StreamNonce::zero().to_bytes(), [0; STREAM_NONCE_SIZE]);
        assert_eq!(
            StreamNonce::zero(),
            StreamNonce::from_bytes([0; STREAM_NONCE_SIZE])
        );
    }

    #[test]
    fn key_bytes_roundtrip() {
        let key = AttachmentKey::from_bytes([0xab; 32]);
        assert_eq!(key, AttachmentKey::from_bytes([0xab; 32]));
        assert_ne!(key, AttachmentKey::from_bytes([0xac; 32]));
    }
}
