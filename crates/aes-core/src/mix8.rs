//! MixColumns the way an 8-bit microcontroller computes it, leaking every
//! intermediate byte that crosses the data bus.
//!
//! The forward routine is the classic `xtime` formulation: with
//! `tmp = a0 ^ a1 ^ a2 ^ a3` and `t_i = a_i ^ a_{i+1}`, each output byte is
//! `a_i ^ tmp ^ xtime(t_i)`. The leak of one column is, in order:
//!
//! ```text
//! tmp, t0, 2·t0, t1, 2·t1, t2, 2·t2, t3, 2·t3
//! ```
//!
//! The inverse routine extends it with a doubling chain of `tmp` and the two
//! shared terms `u = a0 ^ a2`, `v = a1 ^ a3`, giving
//! `a_i ^ 9·tmp ^ 2·t_i ^ 4·(a_i ^ a_{i+2})`. Its leak is:
//!
//! ```text
//! tmp, 2·tmp, 4·tmp, 8·tmp, u, 2·u, 4·u, v, 2·v, 4·v,
//! t0, 2·t0, t1, 2·t1, t2, 2·t2, t3, 2·t3
//! ```

use crate::block::Block;
use crate::direction::{Direction, FORWARD_MIX_STEPS, INVERSE_MIX_STEPS};
use crate::round::xtime;

/// Number of columns in a block.
pub const COLUMNS: usize = 4;

/// Forward MixColumns on one column, returning the leaked intermediates.
pub fn mix_column(col: &mut [u8; 4]) -> [u8; FORWARD_MIX_STEPS] {
    let a = *col;
    let tmp = a[0] ^ a[1] ^ a[2] ^ a[3];
    let mut leak = [0u8; FORWARD_MIX_STEPS];
    leak[0] = tmp;
    for i in 0..4 {
        let t = a[i] ^ a[(i + 1) % 4];
        let t2 = xtime(t);
        leak[1 + 2 * i] = t;
        leak[2 + 2 * i] = t2;
        col[i] = a[i] ^ tmp ^ t2;
    }
    leak
}

/// Inverse MixColumns on one column, returning the leaked intermediates.
pub fn inv_mix_column(col: &mut [u8; 4]) -> [u8; INVERSE_MIX_STEPS] {
    let a = *col;
    let mut leak = [0u8; INVERSE_MIX_STEPS];

    let tmp = a[0] ^ a[1] ^ a[2] ^ a[3];
    let tmp2 = xtime(tmp);
    let tmp4 = xtime(tmp2);
    let tmp8 = xtime(tmp4);
    leak[..4].copy_from_slice(&[tmp, tmp2, tmp4, tmp8]);

    let u = a[0] ^ a[2];
    let u2 = xtime(u);
    let u4 = xtime(u2);
    let v = a[1] ^ a[3];
    let v2 = xtime(v);
    let v4 = xtime(v2);
    leak[4..10].copy_from_slice(&[u, u2, u4, v, v2, v4]);

    // Rows 0 and 2 share u, rows 1 and 3 share v.
    let far = [u4, v4, u4, v4];
    for i in 0..4 {
        let t = a[i] ^ a[(i + 1) % 4];
        let t2 = xtime(t);
        leak[10 + 2 * i] = t;
        leak[11 + 2 * i] = t2;
        col[i] = a[i] ^ tmp ^ tmp8 ^ t2 ^ far[i];
    }
    leak
}

/// Applies 8-bit MixColumns (or its inverse) to every column of `state`.
///
/// The leak is written column-major: column `c` fills
/// `leak[c * steps..(c + 1) * steps]` with `steps = direction.mix_steps()`.
///
/// # Panics
///
/// Panics if `leak.len() != 4 * direction.mix_steps()`.
pub fn mix_columns_leaky(state: &mut Block, direction: Direction, leak: &mut [u8]) {
    let steps = direction.mix_steps();
    assert_eq!(
        leak.len(),
        COLUMNS * steps,
        "leak buffer must hold {steps} steps for each of the {COLUMNS} columns"
    );
    for (column, out) in state.chunks_exact_mut(4).zip(leak.chunks_exact_mut(steps)) {
        let mut col = [column[0], column[1], column[2], column[3]];
        match direction {
            Direction::Encrypt => out.copy_from_slice(&mix_column(&mut col)),
            Direction::Decrypt => out.copy_from_slice(&inv_mix_column(&mut col)),
        }
        column.copy_from_slice(&col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::mix_columns;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn known_column() {
        // Standard MixColumns test column.
        let mut col = [0xdb, 0x13, 0x53, 0x45];
        let leak = mix_column(&mut col);
        assert_eq!(col, [0x8e, 0x4d, 0xa1, 0xbc]);
        assert_eq!(leak[0], 0xdb ^ 0x13 ^ 0x53 ^ 0x45);
        assert_eq!(leak[1], 0xdb ^ 0x13);
        assert_eq!(leak[2], xtime(0xdb ^ 0x13));

        let leak = inv_mix_column(&mut col);
        assert_eq!(col, [0xdb, 0x13, 0x53, 0x45]);
        assert_eq!(leak[4], 0x8e ^ 0xa1);
        assert_eq!(leak[7], 0x4d ^ 0xbc);
    }

    #[test]
    fn leaky_matches_reference_both_directions() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        for _ in 0..128 {
            let mut state = [0u8; 16];
            rng.fill_bytes(&mut state);
            for direction in [Direction::Encrypt, Direction::Decrypt] {
                let mut expected = state;
                mix_columns(&mut expected, direction);
                let mut actual = state;
                let mut leak = vec![0u8; COLUMNS * direction.mix_steps()];
                mix_columns_leaky(&mut actual, direction, &mut leak);
                assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn leak_is_column_major() {
        let mut state: Block = core::array::from_fn(|i| (i as u8).wrapping_mul(29));
        let original = state;
        let mut leak = [0u8; COLUMNS * FORWARD_MIX_STEPS];
        mix_columns_leaky(&mut state, Direction::Encrypt, &mut leak);
        for c in 0..COLUMNS {
            let col = &original[4 * c..4 * c + 4];
            assert_eq!(leak[c * FORWARD_MIX_STEPS], col[0] ^ col[1] ^ col[2] ^ col[3]);
        }
    }

    #[test]
    #[should_panic(expected = "leak buffer")]
    fn wrong_leak_length_is_a_defect() {
        let mut state = [0u8; 16];
        let mut leak = [0u8; COLUMNS * FORWARD_MIX_STEPS];
        mix_columns_leaky(&mut state, Direction::Decrypt, &mut leak);
    }
}
