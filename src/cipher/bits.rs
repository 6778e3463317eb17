//! Bit-vector helpers used by the DES permutation tables.
//!
//! Bits are stored one per byte, most significant bit first, so permutation
//! tables can index them directly.

/// Expands every byte into eight `0`/`1` values, MSB first.
#[must_use]
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1)).collect()
}

/// Packs `0`/`1` values back into bytes, MSB first. A trailing group shorter
/// than eight bits is left-aligned in the final byte.
#[must_use]
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8).map(|chunk| chunk.iter().enumerate().fold(0u8, |acc, (i, &bit)| acc | ((bit & 1) << (7 - i)))).collect()
}

#[inline]
pub(crate) fn xor_bits<const N: usize>(a: &[u8; N], b: &[u8]) -> [u8; N] {
    std::array::from_fn(|i| a[i] ^ b[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_bits() {
        assert_eq!(bytes_to_bits(b"\xA5"), vec![1, 0, 1, 0, 0, 1, 0, 1]);
        assert_eq!(bytes_to_bits(&[0x01, 0x80]), vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_bits_to_bytes() {
        assert_eq!(bits_to_bytes(&[1, 0, 1, 0, 0, 1, 0, 1]), vec![0xA5]);
        assert_eq!(bits_to_bytes(&bytes_to_bits(b"sweetpgp")), b"sweetpgp".to_vec());
    }

    #[test]
    fn test_bits_to_bytes_partial() {
        assert_eq!(bits_to_bytes(&[1, 1]), vec![0xC0]);
        assert!(bits_to_bytes(&[]).is_empty());
    }

    #[test]
    fn test_xor_bits() {
        assert_eq!(xor_bits(&[1, 0, 1, 0], &[1, 1, 0, 0]), [0, 1, 1, 0]);
    }
}
