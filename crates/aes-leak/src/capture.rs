//! Outputs of one orchestrator call and their persistence.

use aes_core::{Block, Direction};
use serde::{Deserialize, Serialize};

use crate::leak::LeakTensor;
use crate::trace::{RoundKeyTable, StateTrace};

/// Everything one call to [`crypt_and_leak`](crate::crypt_and_leak) produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCapture")]
pub struct Capture {
    /// Direction the batch was processed in.
    pub direction: Direction,
    /// Ciphertext (or recovered plaintext) per input row.
    pub result: Vec<Block>,
    /// The 41 checkpoint states per input row.
    pub state_trace: StateTrace,
    /// Round keys derived from the secret key.
    pub round_keys: RoundKeyTable,
    /// MixColumns intermediates, (row, round, column, step).
    pub leak: LeakTensor,
}

/// Undecoded capture whose parts have not been checked against each other.
#[derive(Deserialize)]
struct RawCapture {
    direction: Direction,
    result: Vec<Block>,
    state_trace: StateTrace,
    round_keys: RoundKeyTable,
    leak: LeakTensor,
}

impl TryFrom<RawCapture> for Capture {
    type Error = String;

    fn try_from(raw: RawCapture) -> Result<Self, Self::Error> {
        let rows = raw.leak.rows();
        if rows == 0 {
            return Err("capture holds no rows".to_owned());
        }
        if raw.leak.direction() != raw.direction {
            return Err(format!(
                "capture direction {} disagrees with leak direction {}",
                raw.direction,
                raw.leak.direction()
            ));
        }
        if raw.result.len() != rows || raw.state_trace.len() != rows {
            return Err(format!(
                "capture has {} results and {} trace rows for {rows} leak rows",
                raw.result.len(),
                raw.state_trace.len()
            ));
        }
        Ok(Self {
            direction: raw.direction,
            result: raw.result,
            state_trace: raw.state_trace,
            round_keys: raw.round_keys,
            leak: raw.leak,
        })
    }
}

impl Capture {
    /// Number of processed rows.
    pub fn rows(&self) -> usize {
        self.result.len()
    }

    /// Serializes the capture with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes a capture with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
