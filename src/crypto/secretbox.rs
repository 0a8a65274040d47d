// SPDX-License-Identifier: MIT OR Apache-2.0

//! XSalsa20-Poly1305 authenticated encryption ("secretbox").
//!
//! Sealed messages use the classic NaCl layout: the 16-byte Poly1305 tag is prepended to the
//! ciphertext. The detached AEAD API is used so the layout is pinned by this module rather than
//! by the backing crate's combined-mode convention.
use crypto_secretbox::aead::{AeadInPlace, KeyInit};
use crypto_secretbox::{Key, Nonce, Tag, XSalsa20Poly1305};
use thiserror::Error;

pub const KEY_SIZE: usize = 32;

pub const NONCE_SIZE: usize = 24;

/// Poly1305 authentication tag size; the overhead a sealed message carries over its plaintext.
pub const TAG_SIZE: usize = 16;

/// Encrypts and authenticates `plaintext`, returning `tag ‖ ciphertext`.
pub fn seal(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, SecretboxError> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));
    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut ciphertext)
        .map_err(|_| SecretboxError::Seal)?;

    let mut sealed = Vec::with_capacity(TAG_SIZE + ciphertext.len());
    sealed.extend_from_slice(tag.as_slice());
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Verifies and decrypts a `tag ‖ ciphertext` message produced by [`seal`].
///
/// Fails if the message is too short to carry a tag, or if it was sealed under a different key
/// or nonce, or was modified in transit.
pub fn open(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    sealed: &[u8],
) -> Result<Vec<u8>, SecretboxError> {
    if sealed.len() < TAG_SIZE {
        return Err(SecretboxError::Open);
    }
    let (tag, ciphertext) = sealed.split_at(TAG_SIZE);

    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));
    let mut plaintext = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            &mut plaintext,
            Tag::from_slice(tag),
        )
        .map_err(|_| SecretboxError::Open)?;
    Ok(plaintext)
}

#[derive(Debug, Error)]
pub enum SecretboxError {
    #[error("secretbox sealing failed")]
    Seal,

    #[error("secretbox failed to open")]
    Open,
}

#[cfg(test)]
mod tests {
    use super::{open, seal, TAG_SIZE};

    const KEY: [u8; 32] = [3; 32];
    const NONCE: [u8; 24] = [5; 24];

    #[test]
    fn seal_and_open_roundtrip() {
        let sealed = seal(&KEY, &NONCE, b"attachment chunk").unwrap();
        assert_eq!(sealed.len(), TAG_SIZE + 16);

        let opened = open(&KEY, &NONCE, &sealed).unwrap();
        assert_eq!(opened, b"attachment chunk");
    }

    #[test]
    fn empty_message() {
        let sealed = seal(&KEY, &NONCE, b"").unwrap();
        assert_eq!(sealed.len(), TAG_SIZE);
        assert_eq!(open(&KEY, &NONCE, &sealed).unwrap(), b"");
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = seal(&KEY, &NONCE, b"secret").unwrap();
        assert!(open(&[4; 32], &NONCE, &sealed).is_err());
    }

    #[test]
    fn wrong_nonce_fails() {
        let sealed = seal(&KEY, &NONCE, b"secret").unwrap();
        assert!(open(&KEY, &[6; 24], &sealed).is_err());
    }

    #[test]
    fn tampered_message_fails() {
        let mut sealed = seal(&KEY, &NONCE, b"secret").unwrap();

        // Flip one bit in the tag, then one in the ciphertext body.
        sealed[0] ^= 0x01;
        assert!(open(&KEY, &NONCE, &sealed).is_err());
        sealed[0] ^= 0x01;
        sealed[TAG_SIZE] ^= 0x01;
        assert!(open(&KEY, &NONCE, &sealed).is_err());
    }

    #[test]
    fn short_message_fails() {
        assert!(open(&KEY, &NONCE, &[0u8; TAG_SIZE - 1]).is_err());
    }
}
