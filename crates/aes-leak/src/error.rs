//! Errors surfaced to callers before any primitive runs.

use core::fmt;

use aes_core::DirectionError;

/// Rejected input to the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeakError {
    /// The batch has no rows.
    EmptyBatch,
    /// The secret key is not 16 bytes long.
    InvalidKeyLength {
        /// Length that was supplied.
        len: usize,
    },
    /// A row of the batch is not 16 bytes long.
    InvalidRowLength {
        /// Index of the offending row.
        row: usize,
        /// Length that was supplied.
        len: usize,
    },
    /// The direction flag is neither encrypt nor decrypt.
    InvalidDirection(DirectionError),
}

impl LeakError {
    /// Short category of the error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyBatch => "empty batch",
            Self::InvalidKeyLength { .. } => "invalid key length",
            Self::InvalidRowLength { .. } => "invalid row length",
            Self::InvalidDirection(_) => "invalid direction",
        }
    }

    /// Whether the error concerns the shape of the inputs.
    pub fn is_shape_error(&self) -> bool {
        !matches!(self, Self::InvalidDirection(_))
    }
}

impl fmt::Display for LeakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch => f.write_str("batch must contain at least one row"),
            Self::InvalidKeyLength { len } => {
                write!(f, "{}: expected 16 bytes, got {len}", self.as_str())
            }
            Self::InvalidRowLength { row, len } => {
                write!(f, "{} in row {row}: expected 16 bytes, got {len}", self.as_str())
            }
            Self::InvalidDirection(inner) => write!(f, "{}: {inner}", self.as_str()),
        }
    }
}

impl std::error::Error for LeakError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDirection(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<DirectionError> for LeakError {
    fn from(value: DirectionError) -> Self {
        Self::InvalidDirection(value)
    }
}

/// Result alias for orchestrator calls.
pub type Result<T> = core::result::Result<T, LeakError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_row() {
        let err = LeakError::InvalidRowLength { row: 3, len: 15 };
        assert_eq!(err.to_string(), "invalid row length in row 3: expected 16 bytes, got 15");
        assert!(err.is_shape_error());
    }

    #[test]
    fn direction_errors_are_not_shape_errors() {
        let err = LeakError::from(DirectionError::Flag(7));
        assert!(!err.is_shape_error());
        assert_eq!(err.as_str(), "invalid direction");
        assert!(std::error::Error::source(&err).is_some());
    }
}
