//! The MixColumns leakage tensor.

use aes_core::{Direction, COLUMNS};
use serde::{Deserialize, Serialize};

use crate::checkpoint::MIX_ROUNDS;

/// Intermediate bytes of every 8-bit MixColumns call of a batch.
///
/// Axis order is (row, round, column, step), stored contiguously, so each
/// input row owns one contiguous slice. Only rounds 0..=8 exist; the final
/// round has no MixColumns. `steps` is 9 for encryption and 18 for
/// decryption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLeakTensor")]
pub struct LeakTensor {
    direction: Direction,
    rows: usize,
    data: Vec<u8>,
}

/// Undecoded tensor whose buffer length has not been checked yet.
#[derive(Deserialize)]
struct RawLeakTensor {
    direction: Direction,
    rows: usize,
    data: Vec<u8>,
}

impl TryFrom<RawLeakTensor> for LeakTensor {
    type Error = String;

    fn try_from(raw: RawLeakTensor) -> Result<Self, Self::Error> {
        let expected = raw
            .rows
            .checked_mul(Self::row_len_for(raw.direction))
            .ok_or_else(|| format!("leak tensor row count {} overflows", raw.rows))?;
        if raw.data.len() != expected {
            return Err(format!(
                "leak tensor holds {} bytes, {} rows of {} need {expected}",
                raw.data.len(),
                raw.rows,
                raw.direction
            ));
        }
        Ok(Self {
            direction: raw.direction,
            rows: raw.rows,
            data: raw.data,
        })
    }
}

impl LeakTensor {
    /// Allocates a zeroed tensor for `rows` rows.
    pub fn new_zeroed(rows: usize, direction: Direction) -> Self {
        Self {
            direction,
            rows,
            data: vec![0u8; rows * Self::row_len_for(direction)],
        }
    }

    /// Bytes per input row for the given direction.
    pub const fn row_len_for(direction: Direction) -> usize {
        MIX_ROUNDS * Self::round_len_for(direction)
    }

    /// Bytes per (row, round) for the given direction.
    pub const fn round_len_for(direction: Direction) -> usize {
        COLUMNS * direction.mix_steps()
    }

    /// Direction the leak was captured in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of input rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Intermediate values per (row, round, column).
    pub fn steps(&self) -> usize {
        self.direction.mix_steps()
    }

    /// `[rows, rounds, columns, steps]`.
    pub fn shape(&self) -> [usize; 4] {
        [self.rows, MIX_ROUNDS, COLUMNS, self.steps()]
    }

    /// Leak of `row`, `round` (0..=8), `column` (0..=3).
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    pub fn get(&self, row: usize, round: usize, column: usize) -> &[u8] {
        assert!(round < MIX_ROUNDS, "round {round} has no MixColumns");
        assert!(column < COLUMNS, "column {column} out of range");
        let steps = self.steps();
        let start = (round * COLUMNS + column) * steps;
        &self.row(row)[start..start + steps]
    }

    /// All leak values of one input row, ordered (round, column, step).
    pub fn row(&self, row: usize) -> &[u8] {
        let len = Self::row_len_for(self.direction);
        &self.data[row * len..(row + 1) * len]
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Raw (row, round, column, step) buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Copies the tensor into (round, column, row, step) order, the layout
    /// some legacy analysis scripts allocate.
    pub fn to_round_major(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for round in 0..MIX_ROUNDS {
            for column in 0..COLUMNS {
                for row in 0..self.rows {
                    out.extend_from_slice(self.get(row, round, column));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_per_direction() {
        let enc = LeakTensor::new_zeroed(3, Direction::Encrypt);
        assert_eq!(enc.shape(), [3, 9, 4, 9]);
        assert_eq!(enc.as_slice().len(), 3 * 9 * 4 * 9);
        let dec = LeakTensor::new_zeroed(2, Direction::Decrypt);
        assert_eq!(dec.shape(), [2, 9, 4, 18]);
        assert_eq!(dec.row(1).len(), 9 * 4 * 18);
    }

    #[test]
    fn round_major_transposes_rows_inward() {
        let mut tensor = LeakTensor::new_zeroed(2, Direction::Encrypt);
        let row_len = LeakTensor::row_len_for(Direction::Encrypt);
        for (i, byte) in tensor.data_mut().iter_mut().enumerate() {
            *byte = (i / row_len) as u8 + 1;
        }
        let legacy = tensor.to_round_major();
        assert_eq!(legacy.len(), tensor.as_slice().len());
        // First (round 0, column 0) block: row 0's 9 steps then row 1's.
        assert_eq!(&legacy[..9], &[1u8; 9]);
        assert_eq!(&legacy[9..18], &[2u8; 9]);
    }

    #[test]
    fn decoding_rejects_short_buffer() {
        let mut tensor = LeakTensor::new_zeroed(2, Direction::Encrypt);
        tensor.data.truncate(LeakTensor::row_len_for(Direction::Encrypt));
        let bytes = bincode::serialize(&tensor).expect("serialize");
        assert!(bincode::deserialize::<LeakTensor>(&bytes).is_err());

        let whole = LeakTensor::new_zeroed(2, Direction::Decrypt);
        let bytes = bincode::serialize(&whole).expect("serialize");
        let decoded: LeakTensor = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded, whole);
    }

    #[test]
    #[should_panic(expected = "has no MixColumns")]
    fn final_round_is_absent() {
        LeakTensor::new_zeroed(1, Direction::Encrypt).get(0, 9, 0);
    }
}
