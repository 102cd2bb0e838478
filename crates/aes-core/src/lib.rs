//! Byte-level AES-128 primitives for simulating an 8-bit implementation.
//!
//! This crate mirrors the FIPS-197 building blocks and provides:
//! - Key schedule for AES-128 and a per-round key deriver.
//! - SubBytes, ShiftRows and AddRoundKey, each in both directions.
//! - An 8-bit MixColumns that reports every intermediate byte it computes.
//! - Reference single-block encryption and decryption.
//!
//! Nothing here is constant-time; leaking is the point.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod direction;
mod key;
pub mod mix8;
pub mod round;
mod sbox;

pub use crate::block::{block_from_slice, xor_in_place, Block, BLOCK_LEN};
pub use crate::cipher::{decrypt_block, derive_round_key, encrypt_block, expand_key};
pub use crate::direction::{Direction, DirectionError, FORWARD_MIX_STEPS, INVERSE_MIX_STEPS};
pub use crate::key::{Aes128Key, RoundKeys, ROUNDS};
pub use crate::mix8::{mix_columns_leaky, COLUMNS};
pub use crate::sbox::{inv_sbox, sbox, INV_SBOX, SBOX};
