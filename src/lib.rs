// SPDX-License-Identifier: MIT OR Apache-2.0

//! `attachment-encryption` seals large byte streams for chat attachments: each stream is
//! encrypted under a one-time symmetric key and simultaneously signed by its author, in a way
//! that supports safe streaming decryption.
//!
//! Recipients verify authenticity chunk by chunk without buffering the whole stream, and nobody
//! in between, the transport server included, can modify, reorder, truncate, extend or
//! re-attribute a sealed stream without detection.
//!
//! ## Construction
//!
//! Plaintext is cut into chunks of exactly 2^20 bytes, always followed by one short (possibly
//! empty) terminal chunk. Every chunk is signed first and encrypted afterwards
//! (XSalsa20-Poly1305 "secretbox"), so the signature, and with it the author's identity, stays
//! hidden from passive observers. Two details carry the security model:
//!
//! - The signed data names the symmetric key. A recipient cannot take the signed chunks and
//!   re-encrypt them towards somebody else under a key of their own; the signature check on the
//!   receiving side would fail ("surreptitious forwarding" defense).
//! - The chunk nonce is the per-stream nonce followed by the big-endian chunk index, and it is
//!   both the secretbox nonce and part of the signed data. Reordering, cross-stream splicing
//!   and truncation all surface as decryption or signature failures.
//!
//! ## Wire format
//!
//! A sealed stream is a plain concatenation of packets, one per chunk. Each packet is a
//! MessagePack `bin32` object:
//!
//! ```text
//! +------+----------------+-----------------------------------------------+
//! | 0xc6 | u32_be(L)      | secretbox(key, nonce, signature ‖ plaintext)  |
//! +------+----------------+-----------------------------------------------+
//! ```
//!
//! Every non-terminal packet has the same on-wire size, so the sealed size is a closed-form
//! function of the plaintext size ([`sealed_size`]) and packet boundaries are known to the
//! decoder without parsing ahead.
//!
//! ## Usage
//!
//! One-time key material is generated per attachment and travels to recipients inside the
//! (separately encrypted) chat message:
//!
//! ```
//! use attachment_encryption::{
//!     open_attachment, seal_attachment, AttachmentKey, Rng, SigningKey, StreamNonce,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rng = Rng::default();
//! let key = AttachmentKey::generate(&rng)?;
//! let signing_key = SigningKey::generate(&rng)?;
//! let stream_nonce = StreamNonce::generate(&rng)?;
//!
//! let sealed = seal_attachment(b"attachment bytes", &key, &signing_key, &stream_nonce);
//!
//! let opened = open_attachment(&sealed, &key, &signing_key.verifying_key(), &stream_nonce)?;
//! assert_eq!(opened, b"attachment bytes");
//! # Ok(())
//! # }
//! ```
//!
//! For streams too large to hold in memory, [`Sealer`] and [`Unsealer`] expose the same
//! operation as push-based state machines with O(chunk) memory. Any error from the unsealer
//! means the stream is not authentic: plaintext received up to that point must be discarded.
//!
//! The stream nonce must be unique per (signing key pair, symmetric key). This crate does not
//! establish, rotate or store keys; that is the surrounding application's job.
pub mod crypto;
mod keys;
mod packet;
mod stream;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use crypto::ed25519::{Signature, SigningKey, VerifyingKey};
pub use crypto::{Rng, RngError};
pub use keys::{AttachmentKey, StreamNonce, ATTACHMENT_KEY_SIZE, STREAM_NONCE_SIZE};
pub use packet::{OpenError, PACKET_SIZE, PLAINTEXT_CHUNK_SIZE};
pub use stream::{open_attachment, seal_attachment, sealed_size, Sealer, Unsealer};
