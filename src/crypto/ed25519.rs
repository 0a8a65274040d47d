// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ed25519 signatures for attachment authorship.
//!
//! Thin wrappers around `ed25519-dalek` keeping byte-level conversions, hex formatting and error
//! mapping in one place. Signing keys travel as 64 bytes (32-byte seed followed by the 32-byte
//! public key) so a stored key pair can be validated on load.
use std::fmt;

use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{Rng, RngError};

/// 512-bit detached signature.
pub const SIGNATURE_SIZE: usize = 64;

/// Seed half of a signing key.
pub const SEED_SIZE: usize = 32;

/// Signing key in its transport form: seed ‖ public key.
pub const SIGNING_KEY_SIZE: usize = 64;

pub const VERIFYING_KEY_SIZE: usize = 32;

/// Ed25519 signing key.
#[derive(Clone)]
pub struct SigningKey(ed25519_dalek::SigningKey);

impl SigningKey {
    /// Generates a fresh signing key.
    pub fn generate(rng: &Rng) -> Result<Self, Ed25519Error> {
        let seed: [u8; SEED_SIZE] = rng.random_array()?;
        Ok(Self(ed25519_dalek::SigningKey::from_bytes(&seed)))
    }

    /// Constructs a signing key from its 32-byte seed.
    pub fn from_seed(seed: [u8; SEED_SIZE]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&seed))
    }

    /// Constructs a signing key from its 64-byte transport form, validating that the embedded
    /// public key belongs to the seed.
    pub fn from_bytes(bytes: &[u8; SIGNING_KEY_SIZE]) -> Result<Self, Ed25519Error> {
        let key = ed25519_dalek::SigningKey::from_keypair_bytes(bytes)
            .map_err(|_| Ed25519Error::InvalidKey)?;
        Ok(Self(key))
    }

    /// Returns the 64-byte transport form: seed ‖ public key.
    pub fn to_bytes(&self) -> [u8; SIGNING_KEY_SIZE] {
        self.0.to_keypair_bytes()
    }

    /// Returns the verifying half of this key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Signs `message`, returning a detached signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.0.sign(message).to_bytes())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("verifying_key", &self.verifying_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl Serialize for SigningKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for SigningKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        let bytes: [u8; SIGNING_KEY_SIZE] = hex::decode(&value)
            .map_err(serde::de::Error::custom)?
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid signing key length"))?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Ed25519 verifying (public) key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

impl VerifyingKey {
    /// Validates and wraps a 32-byte compressed public key.
    pub fn from_bytes(bytes: &[u8; VERIFYING_KEY_SIZE]) -> Result<Self, Ed25519Error> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(bytes)
            .map_err(|_| Ed25519Error::InvalidKey)?;
        Ok(Self(key))
    }

    pub fn to_bytes(&self) -> [u8; VERIFYING_KEY_SIZE] {
        self.0.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verifies a detached signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), Ed25519Error> {
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        self.0
            .verify(message, &signature)
            .map_err(|_| Ed25519Error::VerificationFailed)
    }
}

impl fmt::Display for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for VerifyingKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for VerifyingKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        let bytes: [u8; VERIFYING_KEY_SIZE] = hex::decode(&value)
            .map_err(serde::de::Error::custom)?
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid verifying key length"))?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Detached Ed25519 signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "serde_bytes")] [u8; SIGNATURE_SIZE]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[derive(Debug, Error)]
pub enum Ed25519Error {
    #[error(transparent)]
    Rng(#[from] RngError),

    #[error("invalid ed25519 key bytes")]
    InvalidKey,

    #[error("signature does not match public key and message")]
    VerificationFailed,
}

#[cfg(test)]
mod tests {
    use crate::crypto::Rng;

    use super::{Ed25519Error, Signature, SigningKey, VerifyingKey};

    #[test]
    fn sign_and_verify() {
        let rng = Rng::from_seed([1; 32]);
        let signing_key = SigningKey::generate(&rng).unwrap();
        let verifying_key = signing_key.verifying_key();

        let signature = signing_key.sign(b"chunk digest");
        assert!(verifying_key.verify(b"chunk digest", &signature).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_message_and_wrong_key() {
        let rng = Rng::from_seed([1; 32]);
        let signing_key = SigningKey::generate(&rng).unwrap();
        let other_key = SigningKey::generate(&rng).unwrap();

        let signature = signing_key.sign(b"chunk digest");

        assert!(matches!(
            signing_key.verifying_key().verify(b"other message", &signature),
            Err(Ed25519Error::VerificationFailed)
        ));
        assert!(matches!(
            other_key.verifying_key().verify(b"chunk digest", &signature),
            Err(Ed25519Error::VerificationFailed)
        ));
    }

    #[test]
    fn transport_form_roundtrip() {
        let rng = Rng::from_seed([2; 32]);
        let signing_key = SigningKey::generate(&rng).unwrap();

        let restored = SigningKey::from_bytes(&signing_key.to_bytes()).unwrap();
        assert_eq!(
            restored.verifying_key().to_bytes(),
            signing_key.verifying_key().to_bytes()
        );

        // A transport form whose public half does not match its seed is rejected.
        let mut bytes = signing_key.to_bytes();
        bytes[63] ^= 0xff;
        assert!(matches!(
            SigningKey::from_bytes(&bytes),
            Err(Ed25519Error::InvalidKey)
        ));
    }

    #[test]
    fn verifying_key_bytes_roundtrip() {
        let rng = Rng::from_seed([3; 32]);
        let verifying_key = SigningKey::generate(&rng).unwrap().verifying_key();

        let restored = VerifyingKey::from_bytes(&verifying_key.to_bytes()).unwrap();
        assert_eq!(restored, verifying_key);
        assert_eq!(restored.to_hex(), verifying_key.to_string());
    }

    #[test]
    fn serde_hex_roundtrip() {
        let rng = Rng::from_seed([4; 32]);
        let signing_key = SigningKey::generate(&rng).unwrap();
        let verifying_key = signing_key.verifying_key();

        let json = serde_json::to_string(&verifying_key).unwrap();
        assert_eq!(json, format!("\"{}\"", verifying_key.to_hex()));
        let restored: VerifyingKey = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, verifying_key);

        let json = serde_json::to_string(&signing_key).unwrap();
        let restored: SigningKey = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.to_bytes(), signing_key.to_bytes());

        let signature = signing_key.sign(b"payload");
        let json = serde_json::to_string(&signature).unwrap();
        let restored: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, signature);
    }
}
