// SPDX-License-Identifier: MIT OR Apache-2.0

//! SHA2-512 hashing.
use sha2::{Digest, Sha512};

pub const SHA512_DIGEST_SIZE: usize = 64;

/// SHA2-512 over the concatenation of all given parts.
pub fn sha2_512(parts: &[&[u8]]) -> [u8; SHA512_DIGEST_SIZE] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()[..].try_into().expect("sha512 digest size")
}

#[cfg(test)]
mod tests {
    use super::sha2_512;

    #[test]
    fn empty_input_digest() {
        // Well-known SHA-512 digest of the empty string.
        assert_eq!(
            hex::encode(sha2_512(&[])),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
        );
    }

    #[test]
    fn parts_hash_as_concatenation() {
        assert_eq!(
            sha2_512(&[b"attach", b"ment"]),
            sha2_512(&[b"attachment"])
        );
    }
}
