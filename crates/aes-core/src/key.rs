//! Key types for AES-128.

use crate::block::Block;

/// Number of round keys mixed in after the initial whitening.
pub const ROUNDS: usize = 10;

/// AES-128 key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aes128Key(pub [u8; 16]);

impl From<[u8; 16]> for Aes128Key {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

impl Aes128Key {
    /// Builds a key from a slice, returning `None` unless it is exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    /// Raw key bytes, also used as the whitening key.
    #[inline]
    pub fn as_block(&self) -> &Block {
        &self.0
    }
}

/// Full FIPS-197 key schedule: the master key followed by ten round keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys(pub [Block; ROUNDS + 1]);

impl RoundKeys {
    /// Returns the schedule entry at the requested index (0..=10).
    ///
    /// Index 0 is the master key; index `r + 1` is the key of round `r`.
    #[inline]
    pub fn get(&self, index: usize) -> &Block {
        &self.0[index]
    }

    /// The ten round keys without the leading master key.
    pub fn round_keys(&self) -> [Block; ROUNDS] {
        core::array::from_fn(|round| self.0[round + 1])
    }
}
