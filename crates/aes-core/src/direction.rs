//! Cipher direction and its parsing.

use core::fmt;
use core::str::FromStr;

/// Intermediate values leaked per column by the forward 8-bit MixColumns.
pub const FORWARD_MIX_STEPS: usize = 9;
/// Intermediate values leaked per column by the inverse 8-bit MixColumns.
pub const INVERSE_MIX_STEPS: usize = 18;

/// Whether a primitive runs forward (encryption) or inverted (decryption).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Forward cipher.
    Encrypt,
    /// Inverse cipher.
    Decrypt,
}

impl Direction {
    /// Number of leaked intermediate values per column of one MixColumns call.
    #[inline]
    pub const fn mix_steps(self) -> usize {
        match self {
            Self::Encrypt => FORWARD_MIX_STEPS,
            Self::Decrypt => INVERSE_MIX_STEPS,
        }
    }

    /// Numeric flag: `1` for encryption, `0` for decryption.
    pub const fn flag(self) -> u8 {
        match self {
            Self::Encrypt => 1,
            Self::Decrypt => 0,
        }
    }

    /// Short lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected direction flag or name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectionError {
    /// Numeric flag outside `{0, 1}`.
    Flag(u8),
    /// Unrecognised textual direction.
    Name(String),
}

impl fmt::Display for DirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "direction flag must be 0 or 1, got {flag}"),
            Self::Name(name) => write!(f, "unknown direction {name:?}"),
        }
    }
}

impl std::error::Error for DirectionError {}

impl TryFrom<u8> for Direction {
    type Error = DirectionError;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            1 => Ok(Self::Encrypt),
            0 => Ok(Self::Decrypt),
            other => Err(DirectionError::Flag(other)),
        }
    }
}

impl From<bool> for Direction {
    fn from(encrypt: bool) -> Self {
        if encrypt {
            Self::Encrypt
        } else {
            Self::Decrypt
        }
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encrypt" | "enc" | "e" | "1" => Ok(Self::Encrypt),
            "decrypt" | "dec" | "d" | "0" => Ok(Self::Decrypt),
            _ => Err(DirectionError::Name(s.to_owned())),
        }
    }
}
