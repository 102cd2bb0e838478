//! Byte-level round primitives, each selectable by [`Direction`].

use crate::block::{xor_in_place, Block};
use crate::direction::Direction;
use crate::sbox::{INV_SBOX, SBOX};

/// Source index of every output byte under ShiftRows.
const SHIFT_ROWS: [usize; 16] = [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11];
/// Source index of every output byte under InvShiftRows.
const INV_SHIFT_ROWS: [usize; 16] = [0, 13, 10, 7, 4, 1, 14, 11, 8, 5, 2, 15, 12, 9, 6, 3];

/// Applies SubBytes (or InvSubBytes) to the state in place.
#[inline]
pub fn sub_bytes(state: &mut Block, direction: Direction) {
    let table = match direction {
        Direction::Encrypt => &SBOX,
        Direction::Decrypt => &INV_SBOX,
    };
    for byte in state.iter_mut() {
        *byte = table[*byte as usize];
    }
}

/// Applies ShiftRows (or InvShiftRows) to the state in place.
#[inline]
pub fn shift_rows(state: &mut Block, direction: Direction) {
    let perm = match direction {
        Direction::Encrypt => &SHIFT_ROWS,
        Direction::Decrypt => &INV_SHIFT_ROWS,
    };
    let src = *state;
    for (dst, &from) in state.iter_mut().zip(perm.iter()) {
        *dst = src[from];
    }
}

/// Adds (XORs) a round key into the state. Self-inverse, so direction-free.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

/// Multiplication by `x` in GF(2^8) modulo the AES polynomial.
#[inline]
pub const fn xtime(byte: u8) -> u8 {
    let shifted = byte << 1;
    if byte & 0x80 != 0 {
        shifted ^ 0x1b
    } else {
        shifted
    }
}

/// General GF(2^8) multiplication.
pub fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

/// Textbook matrix-form MixColumns over all four columns, without leakage.
///
/// Used as the reference the 8-bit leaky routine is checked against.
pub fn mix_columns(state: &mut Block, direction: Direction) {
    let coeffs: [u8; 4] = match direction {
        Direction::Encrypt => [0x02, 0x03, 0x01, 0x01],
        Direction::Decrypt => [0x0e, 0x0b, 0x0d, 0x09],
    };
    for column in state.chunks_exact_mut(4) {
        let a = [column[0], column[1], column[2], column[3]];
        for (row, out) in column.iter_mut().enumerate() {
            *out = (0..4).fold(0u8, |acc, k| acc ^ gmul(a[(row + k) % 4], coeffs[k]));
        }
    }
}
