//! The checkpoint table shared by both directions.
//!
//! AES-128 is written out as 40 forward operations. Step `k` takes the state
//! recorded in trace slot `k` to the state recorded in slot `k + 1`, so the
//! 41 slots read `P K (B R M K)x9 B R K`. Encryption walks the table forward;
//! decryption walks it backward with inverse primitives and lands on exactly
//! the same slots.

use core::fmt;

use aes_core::ROUNDS;

/// Number of recorded states per row.
pub const CHECKPOINTS: usize = 41;
/// Number of operations between the plaintext and the ciphertext.
pub const STEP_COUNT: usize = CHECKPOINTS - 1;
/// Rounds that run MixColumns (all but the last).
pub const MIX_ROUNDS: usize = ROUNDS - 1;
/// Index of the last round, which skips MixColumns.
pub const FINAL_ROUND: usize = ROUNDS - 1;

/// A named point in the cipher's state progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// Input to the forward cipher.
    Plaintext,
    /// After the initial whitening with the master key.
    Whitened,
    /// After SubBytes of the given round.
    SubBytes(usize),
    /// After ShiftRows of the given round.
    ShiftRows(usize),
    /// After MixColumns of the given round (0..=8).
    MixColumns(usize),
    /// After the round-key mix of the given round; round 9 is the ciphertext.
    KeyMix(usize),
}

impl Checkpoint {
    /// The ciphertext slot.
    pub const CIPHERTEXT: Self = Self::KeyMix(FINAL_ROUND);

    /// Whether this checkpoint names a state the cipher actually reaches.
    pub const fn is_valid(self) -> bool {
        match self {
            Self::Plaintext | Self::Whitened => true,
            Self::SubBytes(r) | Self::ShiftRows(r) | Self::KeyMix(r) => r < ROUNDS,
            Self::MixColumns(r) => r < MIX_ROUNDS,
        }
    }

    /// Trace slot of this checkpoint.
    ///
    /// # Panics
    ///
    /// Panics if the checkpoint is not [valid](Self::is_valid).
    pub const fn index(self) -> usize {
        assert!(self.is_valid(), "checkpoint outside AES-128");
        match self {
            Self::Plaintext => 0,
            Self::Whitened => 1,
            Self::SubBytes(r) => 2 + 4 * r,
            Self::ShiftRows(r) => 3 + 4 * r,
            Self::MixColumns(r) => 4 + 4 * r,
            Self::KeyMix(FINAL_ROUND) => CHECKPOINTS - 1,
            Self::KeyMix(r) => 5 + 4 * r,
        }
    }

    /// Inverse of [`index`](Self::index).
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Plaintext),
            1 => Some(Self::Whitened),
            38 => Some(Self::SubBytes(FINAL_ROUND)),
            39 => Some(Self::ShiftRows(FINAL_ROUND)),
            40 => Some(Self::KeyMix(FINAL_ROUND)),
            2..=37 => {
                let round = (index - 2) / 4;
                Some(match (index - 2) % 4 {
                    0 => Self::SubBytes(round),
                    1 => Self::ShiftRows(round),
                    2 => Self::MixColumns(round),
                    _ => Self::KeyMix(round),
                })
            }
            _ => None,
        }
    }

    /// Round this checkpoint belongs to, if any.
    pub const fn round(self) -> Option<usize> {
        match self {
            Self::Plaintext | Self::Whitened => None,
            Self::SubBytes(r) | Self::ShiftRows(r) | Self::MixColumns(r) | Self::KeyMix(r) => {
                Some(r)
            }
        }
    }

    /// One-letter code from the `P K BRMK... BRK` legend.
    pub const fn code(self) -> char {
        match self {
            Self::Plaintext => 'P',
            Self::Whitened | Self::KeyMix(_) => 'K',
            Self::SubBytes(_) => 'B',
            Self::ShiftRows(_) => 'R',
            Self::MixColumns(_) => 'M',
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.round() {
            Some(round) => write!(f, "{}{round}", self.code()),
            None => write!(f, "{}", self.code()),
        }
    }
}

/// Which key a key-mix step XORs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRef {
    /// The master key (initial whitening).
    Master,
    /// Round key `r` of the round-key table.
    Round(usize),
}

/// Primitive applied by a step, named by its forward form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// AddRoundKey with the referenced key.
    KeyMix(KeyRef),
    /// SubBytes.
    SubBytes,
    /// ShiftRows.
    ShiftRows,
    /// MixColumns of the given round; its leak goes to that round's slot.
    MixColumns(usize),
}

/// One forward operation and the checkpoint it reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Primitive to run (or undo).
    pub operation: Operation,
    /// State after running the primitive forward.
    pub reaches: Checkpoint,
}

/// State before step `step_index` runs forward, i.e. the state decryption
/// reaches after undoing it.
///
/// # Panics
///
/// Panics if `step_index >= STEP_COUNT`.
pub fn checkpoint_before(step_index: usize) -> Checkpoint {
    match step_index {
        0 => Checkpoint::Plaintext,
        k => STEPS[k - 1].reaches,
    }
}

/// Forward operation table of AES-128.
pub static STEPS: [Step; STEP_COUNT] = build_steps();

const fn build_steps() -> [Step; STEP_COUNT] {
    let mut steps = [Step {
        operation: Operation::KeyMix(KeyRef::Master),
        reaches: Checkpoint::Whitened,
    }; STEP_COUNT];
    let mut k = 1;
    let mut round = 0;
    while round < ROUNDS {
        steps[k] = Step {
            operation: Operation::SubBytes,
            reaches: Checkpoint::SubBytes(round),
        };
        steps[k + 1] = Step {
            operation: Operation::ShiftRows,
            reaches: Checkpoint::ShiftRows(round),
        };
        k += 2;
        if round < MIX_ROUNDS {
            steps[k] = Step {
                operation: Operation::MixColumns(round),
                reaches: Checkpoint::MixColumns(round),
            };
            k += 1;
        }
        steps[k] = Step {
            operation: Operation::KeyMix(KeyRef::Round(round)),
            reaches: Checkpoint::KeyMix(round),
        };
        k += 1;
        round += 1;
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_k_lands_on_slot_k_plus_one() {
        for (k, step) in STEPS.iter().enumerate() {
            assert_eq!(step.reaches.index(), k + 1, "step {k}");
            assert_eq!(checkpoint_before(k).index(), k);
        }
    }

    #[test]
    fn indices_round_trip() {
        for index in 0..CHECKPOINTS {
            let checkpoint = Checkpoint::from_index(index).expect("slot in range");
            assert!(checkpoint.is_valid());
            assert_eq!(checkpoint.index(), index);
        }
        assert_eq!(Checkpoint::from_index(CHECKPOINTS), None);
    }

    #[test]
    fn legend_matches_documented_layout() {
        let legend: String = (0..CHECKPOINTS)
            .map(|i| Checkpoint::from_index(i).unwrap().code())
            .collect();
        assert_eq!(legend, format!("PK{}BRK", "BRMK".repeat(9)));
    }

    #[test]
    fn named_slots() {
        assert_eq!(Checkpoint::SubBytes(0).index(), 2);
        assert_eq!(Checkpoint::MixColumns(8).index(), 36);
        assert_eq!(Checkpoint::KeyMix(8).index(), 37);
        assert_eq!(Checkpoint::SubBytes(9).index(), 38);
        assert_eq!(Checkpoint::ShiftRows(9).index(), 39);
        assert_eq!(Checkpoint::CIPHERTEXT.index(), 40);
        assert!(!Checkpoint::MixColumns(9).is_valid());
        assert_eq!(Checkpoint::MixColumns(3).to_string(), "M3");
    }

    #[test]
    fn only_nine_mix_steps() {
        let mixes: Vec<usize> = STEPS
            .iter()
            .filter_map(|s| match s.operation {
                Operation::MixColumns(r) => Some(r),
                _ => None,
            })
            .collect();
        assert_eq!(mixes, (0..MIX_ROUNDS).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "checkpoint outside AES-128")]
    fn final_round_has_no_mix_slot() {
        let _ = Checkpoint::MixColumns(FINAL_ROUND).index();
    }
}
