// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(not(test))]
use std::fmt;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::ZeroizeOnDrop;

/// Fixed-size container for secret bytes with best-effort hygiene.
///
/// The wrapped bytes are zeroed when the container is dropped, comparison runs in constant time
/// and `Debug` output is redacted outside of tests. Access to the raw bytes is restricted to this
/// crate so secrets only ever flow into the primitives that need them.
///
/// Side-channel resistance is ultimately a property of the whole deployed system; this type only
/// removes the most common footguns.
#[derive(Clone, Eq, Serialize, Deserialize, ZeroizeOnDrop)]
#[cfg_attr(test, derive(Debug))]
pub struct Secret<const N: usize>(#[serde(with = "serde_bytes")] [u8; N]);

impl<const N: usize> Secret<N> {
    pub(crate) fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    pub(crate) fn expose(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> PartialEq for Secret<N> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}

#[cfg(not(test))]
impl<const N: usize> fmt::Debug for Secret<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::Secret;

    #[test]
    fn equality_and_inequality() {
        let secret_1 = Secret::from_bytes([7u8; 32]);
        let secret_2 = Secret::from_bytes([7u8; 32]);
        let secret_3 = Secret::from_bytes([8u8; 32]);

        assert_eq!(secret_1, secret_2);
        assert_ne!(secret_1, secret_3);
    }
}
