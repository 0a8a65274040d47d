// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographic primitives used by the sealing construction, and a random
//! number generator for producing one-time key material.
//!
//! Algorithms:
//! - XSalsa20-Poly1305 authenticated encryption ("secretbox")
//! - Ed25519 (SHA-512) signatures
//! - SHA2-512 hashing
//!
//! Random Number Generator:
//! - ChaCha20 stream cipher, seeded from the operating system
pub mod ed25519;
mod rng;
mod secret;
pub mod secretbox;
pub mod sha2;

pub use rng::{Rng, RngError};
pub use secret::Secret;
