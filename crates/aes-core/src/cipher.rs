//! AES-128 key schedule and reference block encryption/decryption.

use crate::block::Block;
use crate::direction::Direction;
use crate::key::{Aes128Key, RoundKeys, ROUNDS};
use crate::round::{add_round_key, mix_columns, shift_rows, sub_bytes};
use crate::sbox::sbox;

const RCON: [u8; ROUNDS] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

fn sub_word(word: [u8; 4]) -> [u8; 4] {
    word.map(sbox)
}

/// Expands a 128-bit key into the master key plus ten round keys.
pub fn expand_key(key: &Aes128Key) -> RoundKeys {
    let mut w = [[0u8; 4]; 4 * (ROUNDS + 1)];
    for (word, chunk) in w.iter_mut().zip(key.0.chunks_exact(4)) {
        word.copy_from_slice(chunk);
    }

    for i in 4..w.len() {
        let mut temp = w[i - 1];
        if i % 4 == 0 {
            temp.rotate_left(1);
            temp = sub_word(temp);
            temp[0] ^= RCON[i / 4 - 1];
        }
        for b in 0..4 {
            w[i][b] = w[i - 4][b] ^ temp[b];
        }
    }

    let mut schedule = [[0u8; 16]; ROUNDS + 1];
    for (round_key, words) in schedule.iter_mut().zip(w.chunks_exact(4)) {
        for (dst, word) in round_key.chunks_exact_mut(4).zip(words) {
            dst.copy_from_slice(word);
        }
    }
    RoundKeys(schedule)
}

/// Derives the key mixed in at `round` (0..=9), i.e. FIPS-197 round key `round + 1`.
///
/// # Panics
///
/// Panics if `round >= 10`.
pub fn derive_round_key(key: &Aes128Key, round: usize) -> Block {
    assert!(round < ROUNDS, "AES-128 has rounds 0..=9, got {round}");
    *expand_key(key).get(round + 1)
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let mut state = *block;
    add_round_key(&mut state, round_keys.get(0));
    for round in 1..=ROUNDS {
        sub_bytes(&mut state, Direction::Encrypt);
        shift_rows(&mut state, Direction::Encrypt);
        if round != ROUNDS {
            mix_columns(&mut state, Direction::Encrypt);
        }
        add_round_key(&mut state, round_keys.get(round));
    }
    state
}

/// Decrypts a single 16-byte block with pre-expanded round keys.
pub fn decrypt_block(block: &Block, round_keys: &RoundKeys) -> Block {
    let mut state = *block;
    for round in (1..=ROUNDS).rev() {
        add_round_key(&mut state, round_keys.get(round));
        if round != ROUNDS {
            mix_columns(&mut state, Direction::Decrypt);
        }
        shift_rows(&mut state, Direction::Decrypt);
        sub_bytes(&mut state, Direction::Decrypt);
    }
    add_round_key(&mut state, round_keys.get(0));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Aes128Key;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const NIST_KEY: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const NIST_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    const NIST_CIPHER: [u8; 16] = [
        0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5,
        0x5a,
    ];

    #[test]
    fn encrypt_matches_nist_vector() {
        let round_keys = expand_key(&Aes128Key::from(NIST_KEY));
        assert_eq!(encrypt_block(&NIST_PLAIN, &round_keys), NIST_CIPHER);
    }

    #[test]
    fn decrypt_matches_nist_vector() {
        let round_keys = expand_key(&Aes128Key::from(NIST_KEY));
        assert_eq!(decrypt_block(&NIST_CIPHER, &round_keys), NIST_PLAIN);
    }

    #[test]
    fn schedule_matches_fips_appendix() {
        let round_keys = expand_key(&Aes128Key::from(NIST_KEY));
        assert_eq!(*round_keys.get(0), NIST_KEY);
        assert_eq!(
            hex::encode(round_keys.get(1)),
            "d6aa74fdd2af72fadaa678f1d6ab76fe"
        );
        assert_eq!(
            hex::encode(round_keys.get(10)),
            "13111d7fe3944a17f307a78b4d2b30c5"
        );
    }

    #[test]
    fn derive_round_key_is_offset_by_whitening() {
        let key = Aes128Key::from(NIST_KEY);
        let schedule = expand_key(&key);
        for round in 0..ROUNDS {
            assert_eq!(derive_round_key(&key, round), *schedule.get(round + 1));
        }
        assert_eq!(schedule.round_keys()[9], *schedule.get(10));
    }

    #[test]
    #[should_panic]
    fn derive_round_key_rejects_round_ten() {
        derive_round_key(&Aes128Key::from(NIST_KEY), 10);
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        for _ in 0..100 {
            let mut key_bytes = [0u8; 16];
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            rng.fill_bytes(&mut block);
            let rks = expand_key(&Aes128Key::from(key_bytes));
            let ct = encrypt_block(&block, &rks);
            assert_eq!(decrypt_block(&ct, &rks), block);
        }
    }
}
