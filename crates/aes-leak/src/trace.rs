//! Per-row state traces and the round-key table.

use aes_core::{Block, ROUNDS};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::checkpoint::{Checkpoint, CHECKPOINTS};

/// The 41 states one input row passes through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    #[serde(with = "BigArray")]
    states: [Block; CHECKPOINTS],
}

impl TraceRow {
    /// Allocates a zeroed row.
    pub fn new_zeroed() -> Self {
        Self {
            states: [[0u8; 16]; CHECKPOINTS],
        }
    }

    /// State recorded at `checkpoint`.
    #[inline]
    pub fn get(&self, checkpoint: Checkpoint) -> &Block {
        &self.states[checkpoint.index()]
    }

    /// Records `state` at `checkpoint`.
    #[inline]
    pub fn record(&mut self, checkpoint: Checkpoint, state: &Block) {
        self.states[checkpoint.index()] = *state;
    }

    /// All slots in index order.
    pub fn states(&self) -> &[Block; CHECKPOINTS] {
        &self.states
    }

    /// Slots paired with their checkpoint names.
    pub fn labelled(&self) -> impl Iterator<Item = (Checkpoint, &Block)> + '_ {
        self.states.iter().enumerate().filter_map(|(index, state)| {
            Checkpoint::from_index(index).map(|checkpoint| (checkpoint, state))
        })
    }
}

impl Default for TraceRow {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

/// State traces of a whole batch, one [`TraceRow`] per input row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTrace {
    pub(crate) rows: Vec<TraceRow>,
}

impl StateTrace {
    /// Allocates `rows` zeroed trace rows.
    pub fn new_zeroed(rows: usize) -> Self {
        Self {
            rows: vec![TraceRow::new_zeroed(); rows],
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the trace holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trace of input row `row`.
    pub fn row(&self, row: usize) -> &TraceRow {
        &self.rows[row]
    }

    /// State of input row `row` at `checkpoint`.
    pub fn get(&self, row: usize, checkpoint: Checkpoint) -> &Block {
        self.rows[row].get(checkpoint)
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> core::slice::Iter<'_, TraceRow> {
        self.rows.iter()
    }
}

/// The ten round keys; entry `r` is mixed in at the end of round `r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundKeyTable(pub [Block; ROUNDS]);

impl RoundKeyTable {
    /// Round key of round `round` (0..=9).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.0[round]
    }
}
