//! DES and Triple-DES block primitive.
//!
//! A single [`Des`] type covers both ciphers: it holds one key schedule per
//! independent key segment. One segment is plain DES; three segments give
//! the EDE construction used by OpenPGP algorithm 2 (TripleDES).
//!
//! The implementation follows FIPS 46-3 literally on bit vectors, which keeps
//! every permutation table readable against the standard.

use tracing::debug;

use crate::cipher::BlockCipher;
use crate::cipher::bits::{bits_to_bytes, bytes_to_bits, xor_bits};
use crate::error::{Error, Result};

/// DES block length in bytes.
pub const DES_BLOCK_LEN: usize = 8;

/// Length of one DES key segment in bytes.
pub const DES_KEY_LEN: usize = 8;

/// Permuted choice 1: selects 56 of the 64 key bits.
const PC1: [u8; 56] = [
    57, 49, 41, 33, 25, 17, 9, 1, 58, 50, 42, 34, 26, 18, 10, 2, 59, 51, 43, 35, 27, 19, 11, 3, 60, 52, 44, 36, //
    63, 55, 47, 39, 31, 23, 15, 7, 62, 54, 46, 38, 30, 22, 14, 6, 61, 53, 45, 37, 29, 21, 13, 5, 28, 20, 12, 4,
];

/// Permuted choice 2: compresses the 56-bit C||D register into a 48-bit subkey.
const PC2: [u8; 48] = [
    14, 17, 11, 24, 1, 5, 3, 28, 15, 6, 21, 10, 23, 19, 12, 4, 26, 8, 16, 7, 27, 20, 13, 2, //
    41, 52, 31, 37, 47, 55, 30, 40, 51, 45, 33, 48, 44, 49, 39, 56, 34, 53, 46, 42, 50, 36, 29, 32,
];

/// Left rotations applied to C and D before each round.
const SHIFTS: [usize; 16] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

const IP: [u8; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2, 60, 52, 44, 36, 28, 20, 12, 4, 62, 54, 46, 38, 30, 22, 14, 6, 64, 56, 48, 40, 32, 24, 16, 8, //
    57, 49, 41, 33, 25, 17, 9, 1, 59, 51, 43, 35, 27, 19, 11, 3, 61, 53, 45, 37, 29, 21, 13, 5, 63, 55, 47, 39, 31, 23, 15, 7,
];

const FP: [u8; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32, 39, 7, 47, 15, 55, 23, 63, 31, 38, 6, 46, 14, 54, 22, 62, 30, 37, 5, 45, 13, 53, 21, 61, 29, //
    36, 4, 44, 12, 52, 20, 60, 28, 35, 3, 43, 11, 51, 19, 59, 27, 34, 2, 42, 10, 50, 18, 58, 26, 33, 1, 41, 9, 49, 17, 57, 25,
];

/// Expansion permutation: 32 -> 48 bits.
const E: [u8; 48] = [
    32, 1, 2, 3, 4, 5, 4, 5, 6, 7, 8, 9, 8, 9, 10, 11, 12, 13, 12, 13, 14, 15, 16, 17, //
    16, 17, 18, 19, 20, 21, 20, 21, 22, 23, 24, 25, 24, 25, 26, 27, 28, 29, 28, 29, 30, 31, 32, 1,
];

const P: [u8; 32] = [16, 7, 20, 21, 29, 12, 28, 17, 1, 15, 23, 26, 5, 18, 31, 10, 2, 8, 24, 14, 32, 27, 3, 9, 19, 13, 30, 6, 22, 11, 4, 25];

/// S-boxes, each laid out as four rows of sixteen columns.
const SBOXES: [[u8; 64]; 8] = [
    [
        14, 4, 13, 1, 2, 15, 11, 8, 3, 10, 6, 12, 5, 9, 0, 7, 0, 15, 7, 4, 14, 2, 13, 1, 10, 6, 12, 11, 9, 5, 3, 8, //
        4, 1, 14, 8, 13, 6, 2, 11, 15, 12, 9, 7, 3, 10, 5, 0, 15, 12, 8, 2, 4, 9, 1, 7, 5, 11, 3, 14, 10, 0, 6, 13,
    ],
    [
        15, 1, 8, 14, 6, 11, 3, 4, 9, 7, 2, 13, 12, 0, 5, 10, 3, 13, 4, 7, 15, 2, 8, 14, 12, 0, 1, 10, 6, 9, 11, 5, //
        0, 14, 7, 11, 10, 4, 13, 1, 5, 8, 12, 6, 9, 3, 2, 15, 13, 8, 10, 1, 3, 15, 4, 2, 11, 6, 7, 12, 0, 5, 14, 9,
    ],
    [
        10, 0, 9, 14, 6, 3, 15, 5, 1, 13, 12, 7, 11, 4, 2, 8, 13, 7, 0, 9, 3, 4, 6, 10, 2, 8, 5, 14, 12, 11, 15, 1, //
        13, 6, 4, 9, 8, 15, 3, 0, 11, 1, 2, 12, 5, 10, 14, 7, 1, 10, 13, 0, 6, 9, 8, 7, 4, 15, 14, 3, 11, 5, 2, 12,
    ],
    [
        7, 13, 14, 3, 0, 6, 9, 10, 1, 2, 8, 5, 11, 12, 4, 15, 13, 8, 11, 5, 6, 15, 0, 3, 4, 7, 2, 12, 1, 10, 14, 9, //
        10, 6, 9, 0, 12, 11, 7, 13, 15, 1, 3, 14, 5, 2, 8, 4, 3, 15, 0, 6, 10, 1, 13, 8, 9, 4, 5, 11, 12, 7, 2, 14,
    ],
    [
        2, 12, 4, 1, 7, 10, 11, 6, 8, 5, 3, 15, 13, 0, 14, 9, 14, 11, 2, 12, 4, 7, 13, 1, 5, 0, 15, 10, 3, 9, 8, 6, //
        4, 2, 1, 11, 10, 13, 7, 8, 15, 9, 12, 5, 6, 3, 0, 14, 11, 8, 12, 7, 1, 14, 2, 13, 6, 15, 0, 9, 10, 4, 5, 3,
    ],
    [
        12, 1, 10, 15, 9, 2, 6, 8, 0, 13, 3, 4, 14, 7, 5, 11, 10, 15, 4, 2, 7, 12, 9, 5, 6, 1, 13, 14, 0, 11, 3, 8, //
        9, 14, 15, 5, 2, 8, 12, 3, 7, 0, 4, 10, 1, 13, 11, 6, 4, 3, 2, 12, 9, 5, 15, 10, 11, 14, 1, 7, 6, 0, 8, 13,
    ],
    [
        4, 11, 2, 14, 15, 0, 8, 13, 3, 12, 9, 7, 5, 10, 6, 1, 13, 0, 11, 7, 4, 9, 1, 10, 14, 3, 5, 12, 2, 15, 8, 6, //
        1, 4, 11, 13, 12, 3, 7, 14, 10, 15, 6, 8, 0, 5, 9, 2, 6, 11, 13, 8, 1, 4, 10, 7, 9, 5, 0, 15, 14, 2, 3, 12,
    ],
    [
        13, 2, 8, 4, 6, 15, 11, 1, 10, 9, 3, 14, 5, 0, 12, 7, 1, 15, 13, 8, 10, 3, 7, 4, 12, 5, 6, 11, 0, 14, 9, 2, //
        7, 11, 4, 1, 9, 12, 14, 2, 0, 6, 10, 13, 15, 3, 5, 8, 2, 1, 14, 7, 4, 10, 8, 13, 15, 12, 9, 0, 3, 5, 6, 11,
    ],
];

type Subkey = [u8; 48];
type Schedule = [Subkey; 16];

/// Number of independent 8-byte key segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySegments {
    Single = 1,
    Triple = 3,
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Reverse,
}

/// DES (one key segment) or EDE Triple-DES (three key segments).
pub struct Des {
    schedules: Vec<Schedule>,
}

impl Des {
    /// Single DES with an 8-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyLength`] unless `key` is exactly 8 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != DES_KEY_LEN {
            return Err(Error::KeyLength { expected: DES_KEY_LEN.to_string(), actual: key.len() });
        }

        Ok(Self::with_segments(key, KeySegments::Single))
    }

    /// Triple-DES. An 8-byte key is replicated into all three segments,
    /// which makes the cipher equivalent to single DES; a 24-byte key is
    /// split into three independent segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyLength`] unless `key` is 8 or 24 bytes.
    pub fn triple(key: &[u8]) -> Result<Self> {
        match key.len() {
            DES_KEY_LEN => Ok(Self::with_segments(&key.repeat(3), KeySegments::Triple)),
            len if len == DES_KEY_LEN * 3 => Ok(Self::with_segments(key, KeySegments::Triple)),
            actual => Err(Error::KeyLength { expected: "8 or 24".to_owned(), actual }),
        }
    }

    fn with_segments(key: &[u8], segments: KeySegments) -> Self {
        debug!(segments = segments as usize, "building DES key schedules");
        let schedules = key.chunks_exact(DES_KEY_LEN).take(segments as usize).map(key_schedule).collect();
        Self { schedules }
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> KeySegments {
        if self.schedules.len() == 3 { KeySegments::Triple } else { KeySegments::Single }
    }

    /// Encrypt: E(k1), then D(k2), E(k3) for three segments.
    fn encrypt(&self, block: [u8; DES_BLOCK_LEN]) -> [u8; DES_BLOCK_LEN] {
        self.schedules.iter().enumerate().fold(block, |acc, (i, schedule)| {
            let direction = if i % 2 == 0 { Direction::Forward } else { Direction::Reverse };
            crypt_block(acc, schedule, direction)
        })
    }

    /// Decrypt: D(k3), then E(k2), D(k1) for three segments.
    fn decrypt(&self, block: [u8; DES_BLOCK_LEN]) -> [u8; DES_BLOCK_LEN] {
        self.schedules.iter().enumerate().rev().fold(block, |acc, (i, schedule)| {
            let direction = if i % 2 == 0 { Direction::Reverse } else { Direction::Forward };
            crypt_block(acc, schedule, direction)
        })
    }
}

impl BlockCipher for Des {
    fn block_len(&self) -> usize {
        DES_BLOCK_LEN
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let mut input = [0u8; DES_BLOCK_LEN];
        input.copy_from_slice(block);
        block.copy_from_slice(&self.encrypt(input));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let mut input = [0u8; DES_BLOCK_LEN];
        input.copy_from_slice(block);
        block.copy_from_slice(&self.decrypt(input));
    }
}

/// Applies a 1-based permutation table to a bit vector.
#[inline]
fn permute<const N: usize>(bits: &[u8], table: &[u8; N]) -> [u8; N] {
    std::array::from_fn(|i| bits[usize::from(table[i]) - 1])
}

fn key_schedule(key: &[u8]) -> Schedule {
    let permuted = permute(&bytes_to_bits(key), &PC1);
    let (mut c, mut d) = ([0u8; 28], [0u8; 28]);
    c.copy_from_slice(&permuted[..28]);
    d.copy_from_slice(&permuted[28..]);

    let mut schedule = [[0u8; 48]; 16];
    for (subkey, &shift) in schedule.iter_mut().zip(SHIFTS.iter()) {
        c.rotate_left(shift);
        d.rotate_left(shift);

        let mut cd = [0u8; 56];
        cd[..28].copy_from_slice(&c);
        cd[28..].copy_from_slice(&d);
        *subkey = permute(&cd, &PC2);
    }

    schedule
}

/// Round function f(R, K): expand, mix with the subkey, substitute, permute.
fn feistel(right: &[u8; 32], subkey: &Subkey) -> [u8; 32] {
    let mixed = xor_bits(&permute(right, &E), subkey);

    let mut substituted = [0u8; 32];
    for (i, (group, out)) in mixed.chunks_exact(6).zip(substituted.chunks_exact_mut(4)).enumerate() {
        let row = usize::from((group[0] << 1) | group[5]);
        let col = usize::from((group[1] << 3) | (group[2] << 2) | (group[3] << 1) | group[4]);
        let value = SBOXES[i][row * 16 + col];
        for (bit, slot) in out.iter_mut().enumerate() {
            *slot = (value >> (3 - bit)) & 1;
        }
    }

    permute(&substituted, &P)
}

/// Sixteen Feistel rounds. Subkey order alone selects encryption or decryption.
fn crypt_block(block: [u8; DES_BLOCK_LEN], schedule: &Schedule, direction: Direction) -> [u8; DES_BLOCK_LEN] {
    let permuted = permute(&bytes_to_bits(&block), &IP);
    let (mut left, mut right) = ([0u8; 32], [0u8; 32]);
    left.copy_from_slice(&permuted[..32]);
    right.copy_from_slice(&permuted[32..]);

    let mut round = |subkey: &Subkey| {
        let next = xor_bits(&left, &feistel(&right, subkey));
        left = right;
        right = next;
    };

    match direction {
        Direction::Forward => schedule.iter().for_each(&mut round),
        Direction::Reverse => schedule.iter().rev().for_each(&mut round),
    }

    let mut preoutput = [0u8; 64];
    preoutput[..32].copy_from_slice(&right);
    preoutput[32..].copy_from_slice(&left);

    let mut out = [0u8; DES_BLOCK_LEN];
    out.copy_from_slice(&bits_to_bytes(&permute(&preoutput, &FP)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn test_des_known_answer() {
        // FIPS 81 / classic example: key 133457799BBCDFF1.
        let des = Des::new(&hex::decode("133457799BBCDFF1").unwrap()).unwrap();
        let mut block = hex::decode("0123456789ABCDEF").unwrap();
        des.encrypt_block(&mut block);
        assert_eq!(hex::encode(&block), "85e813540f0ab405");
        des.decrypt_block(&mut block);
        assert_eq!(hex::encode(&block), "0123456789abcdef");
    }

    #[test]
    fn test_des_block_round_trip() {
        let des = Des::new(&KEY).unwrap();
        let mut block = *b"JTALLMAN";
        des.encrypt_block(&mut block);
        assert_ne!(&block, b"JTALLMAN");
        des.decrypt_block(&mut block);
        assert_eq!(&block, b"JTALLMAN");
    }

    #[test]
    fn test_des_rejects_bad_key() {
        assert!(matches!(Des::new(&[0u8; 7]), Err(Error::KeyLength { actual: 7, .. })));
        assert!(Des::new(&[0u8; 24]).is_err());
    }

    #[test]
    fn test_triple_key_lengths() {
        assert_eq!(Des::triple(&KEY).unwrap().segments(), KeySegments::Triple);
        assert!(Des::triple(&[0u8; 24]).is_ok());
        assert!(Des::triple(&[0u8; 16]).is_err());
        assert!(Des::triple(&[]).is_err());
    }

    #[test]
    fn test_triple_with_replicated_key_matches_single() {
        let single = Des::new(&KEY).unwrap();
        let triple = Des::triple(&KEY).unwrap();
        let mut a = *b"CSC428!!";
        let mut b = a;
        single.encrypt_block(&mut a);
        triple.encrypt_block(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_triple_known_answer() {
        let key = hex::decode("010203040506070809101112131415161718192021222324").unwrap();
        let tdes = Des::triple(&key).unwrap();
        let mut block = *b"this is ";
        tdes.encrypt_block(&mut block);
        assert_eq!(hex::encode(block), "1eb7c196c593c44b");
        tdes.decrypt_block(&mut block);
        assert_eq!(&block, b"this is ");
    }
}
