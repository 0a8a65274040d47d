// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sealing and opening of a single attachment packet.
//!
//! One packet carries one plaintext chunk. Sealing signs the chunk first and encrypts the
//! signature together with the chunk afterwards, so authorship stays hidden from anyone without
//! the symmetric key. The signed data names the symmetric key itself: a holder of the signed
//! chunk cannot re-encrypt it under a different key without invalidating the signature.
//!
//! On the wire a packet is a MessagePack `bin32` object:
//!
//! ```text
//! 0xc6 ‖ u32_be(L) ‖ secretbox(key, chunk_nonce, signature ‖ plaintext)
//! ```
//!
//! Every packet uses the 5-byte `bin32` framing regardless of its size, which keeps the sealed
//! size a closed-form function of the plaintext size.
use thiserror::Error;

use crate::crypto::ed25519::{Signature, SigningKey, VerifyingKey, SIGNATURE_SIZE};
use crate::crypto::secretbox;
use crate::crypto::sha2::sha2_512;
use crate::keys::{AttachmentKey, StreamNonce, ATTACHMENT_KEY_SIZE, STREAM_NONCE_SIZE};

/// Exact plaintext size of every non-terminal chunk. A protocol constant; wire compatibility
/// depends on it, so it is deliberately not configurable.
pub const PLAINTEXT_CHUNK_SIZE: usize = 1 << 20;

/// MessagePack `bin32` tag byte.
pub const BIN32_TAG: u8 = 0xc6;

/// Framing overhead: the `bin32` tag plus the 4-byte big-endian length.
pub const BIN32_OVERHEAD: usize = 5;

/// Per-chunk nonce size: stream nonce followed by the big-endian chunk index.
pub const CHUNK_NONCE_SIZE: usize = secretbox::NONCE_SIZE;

/// Exact on-wire size of every non-terminal packet.
pub const PACKET_SIZE: usize =
    PLAINTEXT_CHUNK_SIZE + SIGNATURE_SIZE + secretbox::TAG_SIZE + BIN32_OVERHEAD;

/// Domain-separation prefix of the signed data; the trailing NUL byte is part of it.
const SIGNATURE_PREFIX: &[u8] = b"keybase chat attachment\0";

/// On-wire size of a packet carrying `plaintext_len` bytes of chunk plaintext.
pub(crate) fn packet_size_for(plaintext_len: usize) -> usize {
    plaintext_len + SIGNATURE_SIZE + secretbox::TAG_SIZE + BIN32_OVERHEAD
}

/// Derives the nonce for chunk number `chunk_index`: `stream_nonce ‖ u64_be(chunk_index)`.
///
/// Used both as the secretbox nonce and inside the signed data, binding each chunk to its
/// position within this particular stream.
pub(crate) fn chunk_nonce(stream_nonce: &StreamNonce, chunk_index: u64) -> [u8; CHUNK_NONCE_SIZE] {
    let mut nonce = [0u8; CHUNK_NONCE_SIZE];
    nonce[..STREAM_NONCE_SIZE].copy_from_slice(stream_nonce.as_bytes());
    nonce[STREAM_NONCE_SIZE..].copy_from_slice(&chunk_index.to_be_bytes());
    nonce
}

/// Builds the data the chunk signature is computed over:
///
/// ```text
/// "keybase chat attachment\0" ‖ key (32) ‖ chunk_nonce (24) ‖ SHA-512(plaintext) (64)
/// ```
///
/// Hashing the plaintext keeps the signed data bounded. Naming the symmetric key defeats
/// surreptitious forwarding: a recipient cannot re-encrypt the signed chunk towards somebody
/// else under a key of their own.
fn signature_input(
    plaintext: &[u8],
    key: &AttachmentKey,
    chunk_nonce: &[u8; CHUNK_NONCE_SIZE],
) -> Vec<u8> {
    let digest = sha2_512(&[plaintext]);
    let mut input = Vec::with_capacity(
        SIGNATURE_PREFIX.len() + ATTACHMENT_KEY_SIZE + CHUNK_NONCE_SIZE + digest.len(),
    );
    input.extend_from_slice(SIGNATURE_PREFIX);
    input.extend_from_slice(key.as_bytes());
    input.extend_from_slice(chunk_nonce);
    input.extend_from_slice(&digest);
    input
}

/// Seals one plaintext chunk into a framed packet.
pub(crate) fn seal_packet(
    plaintext: &[u8],
    chunk_index: u64,
    key: &AttachmentKey,
    signing_key: &SigningKey,
    stream_nonce: &StreamNonce,
) -> Vec<u8> {
    let nonce = chunk_nonce(stream_nonce, chunk_index);
    let signature = signing_key.sign(&signature_input(plaintext, key, &nonce));

    let mut signed_chunk = Vec::with_capacity(SIGNATURE_SIZE + plaintext.len());
    signed_chunk.extend_from_slice(signature.as_bytes());
    signed_chunk.extend_from_slice(plaintext);

    let ciphertext = secretbox::seal(key.as_bytes(), &nonce, &signed_chunk)
        .expect("chunk plaintext is within secretbox limits");
    let length =
        u32::try_from(ciphertext.len()).expect("ciphertext length fits the bin32 length field");

    let mut packet = Vec::with_capacity(BIN32_OVERHEAD + ciphertext.len());
    packet.push(BIN32_TAG);
    packet.extend_from_slice(&length.to_be_bytes());
    packet.extend_from_slice(&ciphertext);
    packet
}

/// Strips and checks the `bin32` framing, returning the enclosed ciphertext.
///
/// The checks are stricter than needed for slicing off five bytes: the declared length must
/// match the packet size exactly, so the format stays unambiguous for implementations routing
/// through a general MessagePack parser, and no extra bytes can hide inside a frame.
fn unpack_frame(packet: &[u8]) -> Result<&[u8], OpenError> {
    if packet.len() < BIN32_OVERHEAD {
        return Err(OpenError::ShortMessagePackObject { len: packet.len() });
    }
    if packet[0] != BIN32_TAG {
        return Err(OpenError::WrongMessagePackFormat { tag: packet[0] });
    }
    let encoded = u32::from_be_bytes(packet[1..5].try_into().expect("4-byte length field"));
    if encoded as u64 + BIN32_OVERHEAD as u64 != packet.len() as u64 {
        return Err(OpenError::WrongMessagePackLength {
            encoded,
            actual: packet.len(),
        });
    }
    Ok(&packet[BIN32_OVERHEAD..])
}

/// Opens one framed packet, returning the verified plaintext chunk.
pub(crate) fn open_packet(
    packet: &[u8],
    chunk_index: u64,
    key: &AttachmentKey,
    verifying_key: &VerifyingKey,
    stream_nonce: &StreamNonce,
) -> Result<Vec<u8>, OpenError> {
    let ciphertext = unpack_frame(packet)?;

    let nonce = chunk_nonce(stream_nonce, chunk_index);
    let signed_chunk = secretbox::open(key.as_bytes(), &nonce, ciphertext)
        .map_err(|_| OpenError::BadSecretbox)?;

    if signed_chunk.len() < SIGNATURE_SIZE {
        return Err(OpenError::ShortSignature {
            len: signed_chunk.len(),
        });
    }
    let (signature, plaintext) = signed_chunk.split_at(SIGNATURE_SIZE);
    let signature = Signature::from_bytes(signature.try_into().expect("signature length checked"));

    verifying_key
        .verify(&signature_input(plaintext, key, &nonce), &signature)
        .map_err(|_| OpenError::BadSignature)?;

    Ok(plaintext.to_vec())
}

/// Reasons opening a sealed stream can fail.
///
/// Every error is terminal for its stream: callers must discard all plaintext obtained so far
/// and treat the attachment as unauthentic. Match on the variant, not the message.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OpenError {
    /// The packet is shorter than the 5-byte `bin32` framing header.
    #[error("packet of {len} bytes is shorter than the bin32 framing header")]
    ShortMessagePackObject { len: usize },

    /// The framing tag byte is not `0xc6`.
    #[error("expected bin32 tag byte 0xc6, found {tag:#04x}")]
    WrongMessagePackFormat { tag: u8 },

    /// The framed length does not match the packet size.
    #[error("encoded length {encoded} does not match packet size {actual}")]
    WrongMessagePackLength { encoded: u32, actual: usize },

    /// Authenticated decryption failed: wrong key or nonce, tampered or truncated ciphertext.
    #[error("secretbox failed to open")]
    BadSecretbox,

    /// The decrypted chunk is too short to carry a signature.
    #[error("decrypted chunk of {len} bytes is too short to contain a signature")]
    ShortSignature { len: usize },

    /// The chunk signature does not verify.
    #[error("chunk signature failed to verify")]
    BadSignature,
}
