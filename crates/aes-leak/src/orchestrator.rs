//! Round orchestration: drives the primitives over a batch in either
//! direction, filling the state trace and the leakage tensor.

use aes_core::round::{add_round_key, shift_rows, sub_bytes};
use aes_core::{
    block_from_slice, expand_key, mix_columns_leaky, Aes128Key, Block, Direction,
};
use log::{debug, trace};

use crate::capture::Capture;
use crate::checkpoint::{checkpoint_before, Checkpoint, KeyRef, Operation, STEPS};
use crate::config::CaptureConfig;
use crate::error::{LeakError, Result};
use crate::leak::LeakTensor;
use crate::trace::{RoundKeyTable, StateTrace, TraceRow};

/// Runs AES-128 over `input_rows` and records every intermediate state.
///
/// Each row and the key must be exactly 16 bytes and the batch must not be
/// empty; otherwise nothing is computed.
pub fn crypt_and_leak<R: AsRef<[u8]>>(
    input_rows: &[R],
    secret_key: &[u8],
    direction: Direction,
) -> Result<Capture> {
    crypt_and_leak_with_config(input_rows, secret_key, direction, &CaptureConfig::default())
}

/// Like [`crypt_and_leak`], taking the direction as a numeric flag
/// (`1` = encrypt, `0` = decrypt).
pub fn crypt_and_leak_flag<R: AsRef<[u8]>>(
    input_rows: &[R],
    secret_key: &[u8],
    encrypt: u8,
) -> Result<Capture> {
    let direction = Direction::try_from(encrypt)?;
    crypt_and_leak(input_rows, secret_key, direction)
}

/// Like [`crypt_and_leak`] with explicit configuration.
pub fn crypt_and_leak_with_config<R: AsRef<[u8]>>(
    input_rows: &[R],
    secret_key: &[u8],
    direction: Direction,
    config: &CaptureConfig,
) -> Result<Capture> {
    let key = Aes128Key::from_slice(secret_key).ok_or(LeakError::InvalidKeyLength {
        len: secret_key.len(),
    })?;
    let blocks = input_rows
        .iter()
        .enumerate()
        .map(|(row, bytes)| {
            let bytes = bytes.as_ref();
            block_from_slice(bytes).ok_or(LeakError::InvalidRowLength {
                row,
                len: bytes.len(),
            })
        })
        .collect::<Result<Vec<Block>>>()?;
    crypt_blocks(&blocks, &key, direction, config)
}

/// Typed entry point for callers that already hold 16-byte blocks.
pub fn crypt_blocks(
    blocks: &[Block],
    key: &Aes128Key,
    direction: Direction,
    config: &CaptureConfig,
) -> Result<Capture> {
    if blocks.is_empty() {
        return Err(LeakError::EmptyBatch);
    }
    debug!("crypt_and_leak: {} rows, direction {direction}", blocks.len());

    let round_keys = RoundKeyTable(expand_key(key).round_keys());
    let mut result = vec![[0u8; 16]; blocks.len()];
    let mut state_trace = StateTrace::new_zeroed(blocks.len());
    let mut leak = LeakTensor::new_zeroed(blocks.len(), direction);

    let ctx = RowContext {
        key,
        round_keys: &round_keys,
        direction,
    };
    let row_len = LeakTensor::row_len_for(direction);

    let rows = result
        .iter_mut()
        .zip(state_trace.rows.iter_mut())
        .zip(leak.data_mut().chunks_mut(row_len))
        .zip(blocks.iter());
    if config.use_parallel(blocks.len()) {
        run_parallel(&ctx, rows.collect());
    } else {
        for (row, (((out, trace_row), leak_row), input)) in rows.enumerate() {
            *out = ctx.run(row, input, trace_row, leak_row);
        }
    }

    Ok(Capture {
        direction,
        result,
        state_trace,
        round_keys,
        leak,
    })
}

type RowJob<'a> = (((&'a mut Block, &'a mut TraceRow), &'a mut [u8]), &'a Block);

#[cfg(feature = "parallel")]
fn run_parallel(ctx: &RowContext<'_>, jobs: Vec<RowJob<'_>>) {
    use rayon::prelude::*;

    jobs.into_par_iter()
        .enumerate()
        .for_each(|(row, (((out, trace_row), leak_row), input))| {
            *out = ctx.run(row, input, trace_row, leak_row);
        });
}

#[cfg(not(feature = "parallel"))]
fn run_parallel(ctx: &RowContext<'_>, jobs: Vec<RowJob<'_>>) {
    for (row, (((out, trace_row), leak_row), input)) in jobs.into_iter().enumerate() {
        *out = ctx.run(row, input, trace_row, leak_row);
    }
}

struct RowContext<'a> {
    key: &'a Aes128Key,
    round_keys: &'a RoundKeyTable,
    direction: Direction,
}

impl RowContext<'_> {
    /// Processes one row. `leak` is that row's (round, column, step) slice.
    fn run(&self, row: usize, input: &Block, trace_row: &mut TraceRow, leak: &mut [u8]) -> Block {
        let mut state = *input;
        match self.direction {
            Direction::Encrypt => {
                trace_row.record(Checkpoint::Plaintext, &state);
                for step in STEPS.iter() {
                    self.apply(step.operation, &mut state, leak);
                    trace_row.record(step.reaches, &state);
                }
            }
            Direction::Decrypt => {
                trace_row.record(Checkpoint::CIPHERTEXT, &state);
                for (k, step) in STEPS.iter().enumerate().rev() {
                    self.apply(step.operation, &mut state, leak);
                    trace_row.record(checkpoint_before(k), &state);
                }
            }
        }
        trace!("row {row}: {} done", self.direction);
        state
    }

    /// Applies `operation` forward or inverted according to the direction.
    fn apply(&self, operation: Operation, state: &mut Block, leak: &mut [u8]) {
        match operation {
            Operation::KeyMix(KeyRef::Master) => add_round_key(state, self.key.as_block()),
            Operation::KeyMix(KeyRef::Round(round)) => {
                add_round_key(state, self.round_keys.get(round))
            }
            Operation::SubBytes => sub_bytes(state, self.direction),
            Operation::ShiftRows => shift_rows(state, self.direction),
            Operation::MixColumns(round) => {
                let width = LeakTensor::round_len_for(self.direction);
                let slot = &mut leak[round * width..(round + 1) * width];
                mix_columns_leaky(state, self.direction, slot);
            }
        }
    }
}
