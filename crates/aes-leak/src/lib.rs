//! AES-128 as an 8-bit microcontroller runs it, with the full intermediate
//! computation exposed for side-channel research.
//!
//! [`crypt_and_leak`] processes a batch of 16-byte blocks in either
//! direction and returns a [`Capture`]: the result blocks, the 41-slot
//! [`StateTrace`] of every row, the [`RoundKeyTable`], and the
//! [`LeakTensor`] of MixColumns intermediates. Encrypting a block and
//! decrypting its ciphertext yield identical state traces, because both
//! directions walk the same [checkpoint table](checkpoint::STEPS).
//!
//! The leak tensor is laid out (row, round, column, step);
//! [`LeakTensor::to_round_major`] produces the (round, column, row, step)
//! layout when older tooling expects it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod capture;
pub mod checkpoint;
mod config;
mod error;
mod leak;
mod orchestrator;
mod trace;

pub use aes_core::{Aes128Key, Block, Direction};

pub use crate::capture::Capture;
pub use crate::checkpoint::{Checkpoint, CHECKPOINTS, MIX_ROUNDS};
pub use crate::config::{CaptureConfig, DEFAULT_PARALLEL_THRESHOLD};
pub use crate::error::{LeakError, Result};
pub use crate::leak::LeakTensor;
pub use crate::orchestrator::{
    crypt_and_leak, crypt_and_leak_flag, crypt_and_leak_with_config, crypt_blocks,
};
pub use crate::trace::{RoundKeyTable, StateTrace, TraceRow};
