//! AES block primitive (FIPS-197) for 128, 192 and 256-bit keys.
//!
//! The state is an owned `[u8; 16]` in column-major order: byte `r + 4c`
//! holds row `r` of column `c`, which is also the order of the input block.

use crate::cipher::BlockCipher;
use crate::error::{Error, Result};

/// AES block length in bytes.
pub const AES_BLOCK_LEN: usize = 16;

type State = [u8; AES_BLOCK_LEN];
type Word = [u8; 4];

const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

const INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

/// Round constants for the key expansion.
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Multiplication by `x` in GF(2^8).
#[inline]
const fn xtime(byte: u8) -> u8 {
    (byte << 1) ^ if byte & 0x80 != 0 { 0x1b } else { 0x00 }
}

/// Expanded AES key.
pub struct Aes {
    round_keys: Vec<State>,
}

impl Aes {
    /// Expands a 16, 24 or 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyLength`] for any other key length.
    pub fn new(key: &[u8]) -> Result<Self> {
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(Error::KeyLength { expected: "16, 24 or 32".to_owned(), actual: key.len() });
        }

        Ok(Self { round_keys: expand_key(key) })
    }

    /// Number of rounds: 10, 12 or 14.
    #[inline]
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.round_keys.len() - 1
    }

    fn encrypt(&self, block: State) -> State {
        let rounds = self.rounds();
        let mut state = add_round_key(block, &self.round_keys[0]);

        for round_key in &self.round_keys[1..rounds] {
            state = add_round_key(mix_columns(shift_rows(sub_bytes(state))), round_key);
        }

        add_round_key(shift_rows(sub_bytes(state)), &self.round_keys[rounds])
    }

    fn decrypt(&self, block: State) -> State {
        let rounds = self.rounds();
        let mut state = inv_sub_bytes(inv_shift_rows(add_round_key(block, &self.round_keys[rounds])));

        for round_key in self.round_keys[1..rounds].iter().rev() {
            state = inv_sub_bytes(inv_shift_rows(inv_mix_columns(add_round_key(state, round_key))));
        }

        add_round_key(state, &self.round_keys[0])
    }
}

impl BlockCipher for Aes {
    fn block_len(&self) -> usize {
        AES_BLOCK_LEN
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let mut state = [0u8; AES_BLOCK_LEN];
        state.copy_from_slice(block);
        block.copy_from_slice(&self.encrypt(state));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let mut state = [0u8; AES_BLOCK_LEN];
        state.copy_from_slice(block);
        block.copy_from_slice(&self.decrypt(state));
    }
}

fn expand_key(key: &[u8]) -> Vec<State> {
    let nk = key.len() / 4;
    let rounds = nk + 6;
    let total = 4 * (rounds + 1);

    let mut words: Vec<Word> = key.chunks_exact(4).map(|chunk| [chunk[0], chunk[1], chunk[2], chunk[3]]).collect();
    for i in nk..total {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp.rotate_left(1);
            temp = temp.map(|b| SBOX[usize::from(b)]);
            temp[0] ^= RCON[i / nk - 1];
        } else if nk > 6 && i % nk == 4 {
            temp = temp.map(|b| SBOX[usize::from(b)]);
        }

        let prev = words[i - nk];
        words.push(std::array::from_fn(|j| prev[j] ^ temp[j]));
    }

    words
        .chunks_exact(4)
        .map(|chunk| {
            let mut round_key = [0u8; AES_BLOCK_LEN];
            for (column, word) in round_key.chunks_exact_mut(4).zip(chunk) {
                column.copy_from_slice(word);
            }
            round_key
        })
        .collect()
}

#[inline]
fn add_round_key(state: State, round_key: &State) -> State {
    std::array::from_fn(|i| state[i] ^ round_key[i])
}

#[inline]
fn sub_bytes(state: State) -> State {
    state.map(|b| SBOX[usize::from(b)])
}

#[inline]
fn inv_sub_bytes(state: State) -> State {
    state.map(|b| INV_SBOX[usize::from(b)])
}

/// Row `r` rotates left by `r` columns.
#[inline]
fn shift_rows(state: State) -> State {
    std::array::from_fn(|i| {
        let (row, col) = (i % 4, i / 4);
        state[row + 4 * ((col + row) % 4)]
    })
}

#[inline]
fn inv_shift_rows(state: State) -> State {
    std::array::from_fn(|i| {
        let (row, col) = (i % 4, i / 4);
        state[row + 4 * ((col + 4 - row) % 4)]
    })
}

fn mix_columns(mut state: State) -> State {
    for column in state.chunks_exact_mut(4) {
        let all = column[0] ^ column[1] ^ column[2] ^ column[3];
        let first = column[0];
        column[0] ^= all ^ xtime(column[0] ^ column[1]);
        column[1] ^= all ^ xtime(column[1] ^ column[2]);
        column[2] ^= all ^ xtime(column[2] ^ column[3]);
        column[3] ^= all ^ xtime(column[3] ^ first);
    }
    state
}

/// Inverse MixColumns as a pre-conditioning step followed by the forward transform.
fn inv_mix_columns(mut state: State) -> State {
    for column in state.chunks_exact_mut(4) {
        let u = xtime(xtime(column[0] ^ column[2]));
        let v = xtime(xtime(column[1] ^ column[3]));
        column[0] ^= u;
        column[1] ^= v;
        column[2] ^= u;
        column[3] ^= v;
    }
    mix_columns(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAINTEXT: &str = "00112233445566778899aabbccddeeff";

    fn check(key: &str, expected: &str) {
        let aes = Aes::new(&hex::decode(key).unwrap()).unwrap();
        let mut block = hex::decode(PLAINTEXT).unwrap();
        aes.encrypt_block(&mut block);
        assert_eq!(hex::encode(&block), expected);
        aes.decrypt_block(&mut block);
        assert_eq!(hex::encode(&block), PLAINTEXT);
    }

    #[test]
    fn test_aes128_fips197() {
        check("000102030405060708090a0b0c0d0e0f", "69c4e0d86a7b0430d8cdb78070b4c55a");
    }

    #[test]
    fn test_aes192_fips197() {
        check("000102030405060708090a0b0c0d0e0f1011121314151617", "dda97ca4864cdfe06eaf70a0ec0d7191");
    }

    #[test]
    fn test_aes256_fips197() {
        check("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f", "8ea2b7ca516745bfeafc49904b496089");
    }

    #[test]
    fn test_round_counts() {
        assert_eq!(Aes::new(&[0u8; 16]).unwrap().rounds(), 10);
        assert_eq!(Aes::new(&[0u8; 24]).unwrap().rounds(), 12);
        assert_eq!(Aes::new(&[0u8; 32]).unwrap().rounds(), 14);
    }

    #[test]
    fn test_invalid_key_length() {
        for len in [0, 8, 15, 20, 33] {
            assert!(matches!(Aes::new(&vec![0u8; len]), Err(Error::KeyLength { .. })), "length {len}");
        }
    }

    #[test]
    fn test_shift_rows_inverse() {
        let state: State = std::array::from_fn(|i| u8::try_from(i).unwrap());
        assert_eq!(inv_shift_rows(shift_rows(state)), state);
        assert_eq!(inv_mix_columns(mix_columns(state)), state);
    }
}
