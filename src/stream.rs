// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming sealing and opening of whole attachment streams.
//!
//! Both directions are push-based state machines: the caller feeds bytes as they arrive and
//! receives output as soon as complete packets are available. Memory stays bounded by one chunk
//! (plus the size of the incoming slice), never by the stream.
//!
//! A sealed stream always ends with one short packet, possibly carrying zero plaintext bytes.
//! The decoder relies on that terminal packet to tell "end of stream" apart from "truncated":
//! without it, a stream whose length is an exact multiple of the chunk size would be
//! indistinguishable from one cut off behind its last full chunk.
use crate::crypto::ed25519::{SigningKey, VerifyingKey};
use crate::keys::{AttachmentKey, StreamNonce};
use crate::packet::{
    open_packet, packet_size_for, seal_packet, OpenError, PACKET_SIZE, PLAINTEXT_CHUNK_SIZE,
};

/// Streaming encoder sealing one attachment stream.
///
/// Feed plaintext with [`write`](Sealer::write) and complete the stream with exactly one call to
/// [`finish`](Sealer::finish), which emits the mandatory terminal packet. `finish` consumes the
/// sealer; a stream cannot be extended after it ended.
#[derive(Debug)]
pub struct Sealer {
    key: AttachmentKey,
    signing_key: SigningKey,
    stream_nonce: StreamNonce,
    buffer: Vec<u8>,
    chunk_index: u64,
}

impl Sealer {
    pub fn new(key: &AttachmentKey, signing_key: &SigningKey, stream_nonce: &StreamNonce) -> Self {
        Self {
            key: key.clone(),
            signing_key: signing_key.clone(),
            stream_nonce: *stream_nonce,
            buffer: Vec::new(),
            chunk_index: 0,
        }
    }

    /// Buffers `plaintext` and returns the packets for every full chunk now available, possibly
    /// none.
    pub fn write(&mut self, plaintext: &[u8]) -> Vec<u8> {
        self.buffer.extend_from_slice(plaintext);
        let mut output = Vec::new();
        while self.buffer.len() >= PLAINTEXT_CHUNK_SIZE {
            output.extend_from_slice(&self.seal_chunk(PLAINTEXT_CHUNK_SIZE));
        }
        output
    }

    /// Seals all remaining buffered bytes (possibly zero) as the terminal short packet.
    pub fn finish(mut self) -> Vec<u8> {
        debug_assert!(self.buffer.len() < PLAINTEXT_CHUNK_SIZE);
        self.seal_chunk(self.buffer.len())
    }

    fn seal_chunk(&mut self, len: usize) -> Vec<u8> {
        let packet = seal_packet(
            &self.buffer[..len],
            self.chunk_index,
            &self.key,
            &self.signing_key,
            &self.stream_nonce,
        );
        self.buffer.drain(..len);
        self.chunk_index = self
            .chunk_index
            .checked_add(1)
            .expect("chunk index does not overflow");
        packet
    }
}

/// Streaming decoder opening one sealed attachment stream.
///
/// Feed ciphertext with [`write`](Unsealer::write) and complete the stream with exactly one call
/// to [`finish`](Unsealer::finish), which opens the terminal short packet and thereby detects
/// truncation. The first error is latched: every later call reports it again, and plaintext
/// returned before the error must be discarded by the caller.
#[derive(Debug)]
pub struct Unsealer {
    key: AttachmentKey,
    verifying_key: VerifyingKey,
    stream_nonce: StreamNonce,
    buffer: Vec<u8>,
    chunk_index: u64,
    error: Option<OpenError>,
}

impl Unsealer {
    pub fn new(
        key: &AttachmentKey,
        verifying_key: &VerifyingKey,
        stream_nonce: &StreamNonce,
    ) -> Self {
        Self {
            key: key.clone(),
            verifying_key: *verifying_key,
            stream_nonce: *stream_nonce,
            buffer: Vec::new(),
            chunk_index: 0,
            error: None,
        }
    }

    /// Buffers `ciphertext` and opens every complete non-terminal packet now available,
    /// returning the verified plaintext.
    ///
    /// All packets before the terminal one have the fixed size [`PACKET_SIZE`], so packet
    /// boundaries are known without parsing ahead.
    pub fn write(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>, OpenError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.buffer.extend_from_slice(ciphertext);

        let mut output = Vec::new();
        while self.buffer.len() >= PACKET_SIZE {
            match self.open_chunk(PACKET_SIZE) {
                Ok(plaintext) => output.extend_from_slice(&plaintext),
                Err(error) => {
                    self.error = Some(error.clone());
                    return Err(error);
                }
            }
        }
        Ok(output)
    }

    /// Opens the remaining buffered bytes as the terminal short packet and returns the final
    /// plaintext (possibly empty).
    ///
    /// A stream truncated at a packet boundary leaves nothing to open here and fails the framing
    /// check; one truncated mid-packet fails the length or secretbox check. Appended trailing
    /// bytes end up inside what this call treats as the terminal packet and fail the same way.
    pub fn finish(mut self) -> Result<Vec<u8>, OpenError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        debug_assert!(self.buffer.len() < PACKET_SIZE);
        self.open_chunk(self.buffer.len())
    }

    fn open_chunk(&mut self, len: usize) -> Result<Vec<u8>, OpenError> {
        let plaintext = open_packet(
            &self.buffer[..len],
            self.chunk_index,
            &self.key,
            &self.verifying_key,
            &self.stream_nonce,
        )?;
        self.buffer.drain(..len);
        self.chunk_index += 1;
        Ok(plaintext)
    }
}

/// Exact sealed size of a `plaintext_len`-byte stream, including the terminal packet.
///
/// Pure function of the plaintext length; callers use it to preallocate buffers or to validate
/// an expected download size.
pub fn sealed_size(plaintext_len: usize) -> usize {
    let full_chunks = plaintext_len / PLAINTEXT_CHUNK_SIZE;
    let remainder = plaintext_len % PLAINTEXT_CHUNK_SIZE;
    full_chunks * PACKET_SIZE + packet_size_for(remainder)
}

/// Seals a complete in-memory attachment in one call.
pub fn seal_attachment(
    plaintext: &[u8],
    key: &AttachmentKey,
    signing_key: &SigningKey,
    stream_nonce: &StreamNonce,
) -> Vec<u8> {
    let mut sealer = Sealer::new(key, signing_key, stream_nonce);
    let mut sealed = sealer.write(plaintext);
    sealed.extend_from_slice(&sealer.finish());
    sealed
}

/// Opens a complete in-memory sealed stream in one call.
pub fn open_attachment(
    sealed: &[u8],
    key: &AttachmentKey,
    verifying_key: &VerifyingKey,
    stream_nonce: &StreamNonce,
) -> Result<Vec<u8>, OpenError> {
    let mut unsealer = Unsealer::new(key, verifying_key, stream_nonce);
    let mut plaintext = unsealer.write(sealed)?;
    plaintext.extend_from_slice(&unsealer.finish()?);
    Ok(plaintext)
}
