//! Block representation helpers.

/// AES block of 16 bytes, column-major (`state[4 * col + row]`).
pub type Block = [u8; 16];

/// Number of bytes in a block.
pub const BLOCK_LEN: usize = 16;

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Copies a slice into a block, returning `None` unless it is exactly 16 bytes.
pub fn block_from_slice(bytes: &[u8]) -> Option<Block> {
    bytes.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_from_slice_checks_length() {
        assert_eq!(block_from_slice(&[7u8; 16]), Some([7u8; 16]));
        assert_eq!(block_from_slice(&[0u8; 15]), None);
        assert_eq!(block_from_slice(&[0u8; 17]), None);
    }

    #[test]
    fn xor_is_involutive() {
        let mut a = [0x5au8; 16];
        let b: Block = core::array::from_fn(|i| i as u8);
        xor_in_place(&mut a, &b);
        xor_in_place(&mut a, &b);
        assert_eq!(a, [0x5au8; 16]);
    }
}
