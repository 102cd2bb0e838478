//! Encrypts two blocks, decrypts them back and compares the state traces.

use aes_core::{encrypt_block, expand_key};
use aes_leak::{crypt_and_leak, Aes128Key, Checkpoint, Direction};

fn main() {
    let key = [0u8; 16];
    let rows = [*b"first block here", *b"second blockhere"];

    let enc = crypt_and_leak(&rows, &key, Direction::Encrypt).expect("valid batch");
    let round_keys = expand_key(&Aes128Key::from(key));
    for (row, ciphertext) in rows.iter().zip(&enc.result) {
        assert_eq!(encrypt_block(row, &round_keys), *ciphertext);
    }

    let dec = crypt_and_leak(&enc.result, &key, Direction::Decrypt).expect("valid batch");
    assert_eq!(dec.result, rows);
    assert_eq!(dec.state_trace, enc.state_trace);

    let m0 = enc.state_trace.get(0, Checkpoint::MixColumns(0));
    println!("row 0 after M0: {m0:02x?}");
    println!("row 0 leak of round 0, column 0: {:02x?}", enc.leak.get(0, 0, 0));
    println!("example succeeded; traces agree in both directions");
}
