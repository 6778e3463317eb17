//! Mode-of-operation driver.
//!
//! [`CipherContext`] couples a boxed [`BlockCipher`] with one [`CipherMode`]
//! and the feedback register that mode needs. A context is created once per
//! message; the register carries over between calls, so a message may be fed
//! in several block-aligned pieces.
//!
//! OpenPGP mode is the CFB variant of RFC 4880 section 13.9 without the
//! resynchronisation step (the variant used by SEIP packets): the register
//! starts at zero, every output block is `P xor E(register)` and the
//! ciphertext block becomes the next register. The first decrypted block ends
//! with two bytes that the second block repeats; a mismatch means the key is
//! wrong and is reported as [`Error::KeyMismatch`]. Only the first decrypt
//! call on a context checks them.

use strum::Display;
use tracing::debug;

use crate::cipher::BlockCipher;
use crate::config::QUICK_CHECK_LEN;
use crate::error::{Error, Result};
use crate::padding::{BlockSize, Pkcs7Padding};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum CipherMode {
    #[strum(serialize = "ECB")]
    Ecb,
    #[strum(serialize = "CBC")]
    Cbc,
    #[strum(serialize = "OFB")]
    Ofb,
    #[strum(serialize = "OpenPGP")]
    OpenPgp,
}

impl CipherMode {
    /// Block modes pad their input; stream modes do not.
    #[inline]
    #[must_use]
    pub const fn is_padded(self) -> bool {
        matches!(self, Self::Ecb | Self::Cbc)
    }
}

pub struct CipherContext {
    cipher: Box<dyn BlockCipher>,
    mode: CipherMode,
    register: Vec<u8>,
    prefix_checked: bool,
}

impl CipherContext {
    /// Builds a context. `iv` defaults to an all-zero register; when given it
    /// must be exactly one block long. OpenPGP mode always starts from zero
    /// and ignores `iv`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IvLength`] for a wrongly sized IV.
    pub fn new(cipher: Box<dyn BlockCipher>, mode: CipherMode, iv: Option<&[u8]>) -> Result<Self> {
        let block_len = cipher.block_len();
        let register = match (mode, iv) {
            (CipherMode::OpenPgp, Some(_)) => {
                debug!("OpenPGP mode starts from a zero register, ignoring the supplied IV");
                vec![0u8; block_len]
            }
            (_, Some(iv)) if iv.len() != block_len => return Err(Error::IvLength { expected: block_len, actual: iv.len() }),
            (_, Some(iv)) => iv.to_vec(),
            (_, None) => vec![0u8; block_len],
        };

        debug!(%mode, block_len, "cipher context created");
        Ok(Self { cipher, mode, register, prefix_checked: false })
    }

    #[inline]
    pub fn ecb(cipher: Box<dyn BlockCipher>) -> Self {
        let register = vec![0u8; cipher.block_len()];
        Self { cipher, mode: CipherMode::Ecb, register, prefix_checked: false }
    }

    #[inline]
    pub fn openpgp(cipher: Box<dyn BlockCipher>) -> Self {
        let register = vec![0u8; cipher.block_len()];
        Self { cipher, mode: CipherMode::OpenPgp, register, prefix_checked: false }
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> CipherMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn block_len(&self) -> usize {
        self.cipher.block_len()
    }

    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        match self.mode {
            CipherMode::Ecb => {
                let mut out = self.padding()?.pad(data)?;
                let block_len = self.block_len();
                out.chunks_exact_mut(block_len).for_each(|block| self.cipher.encrypt_block(block));
                Ok(out)
            }
            CipherMode::Cbc => {
                let mut out = self.padding()?.pad(data)?;
                let block_len = self.block_len();
                for block in out.chunks_exact_mut(block_len) {
                    xor_in_place(block, &self.register);
                    self.cipher.encrypt_block(block);
                    self.register.copy_from_slice(block);
                }
                Ok(out)
            }
            CipherMode::Ofb => Ok(self.ofb(data)),
            CipherMode::OpenPgp => Ok(self.cfb(data, Direction::Encrypt)),
        }
    }

    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        match self.mode {
            CipherMode::Ecb => {
                let mut out = self.aligned(data)?;
                let block_len = self.block_len();
                out.chunks_exact_mut(block_len).for_each(|block| self.cipher.decrypt_block(block));
                self.padding()?.unpad(&out)
            }
            CipherMode::Cbc => {
                let mut out = self.aligned(data)?;
                let block_len = self.block_len();
                for block in out.chunks_exact_mut(block_len) {
                    let received = block.to_vec();
                    self.cipher.decrypt_block(block);
                    xor_in_place(block, &self.register);
                    self.register = received;
                }
                self.padding()?.unpad(&out)
            }
            CipherMode::Ofb => Ok(self.ofb(data)),
            CipherMode::OpenPgp if self.prefix_checked => Ok(self.cfb(data, Direction::Decrypt)),
            CipherMode::OpenPgp => {
                let block_len = self.block_len();
                if data.len() < block_len + QUICK_CHECK_LEN {
                    return Err(Error::Truncated { offset: 0, expected: block_len + QUICK_CHECK_LEN, actual: data.len() });
                }

                let out = self.cfb(data, Direction::Decrypt);
                quick_check(&out, block_len)?;
                self.prefix_checked = true;
                Ok(out)
            }
        }
    }

    /// Keystream is `E(register)`; the register becomes that keystream block.
    fn ofb(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        for chunk in out.chunks_mut(self.register.len()) {
            self.cipher.encrypt_block(&mut self.register);
            xor_in_place(chunk, &self.register);
        }
        out
    }

    /// CFB with ciphertext feedback. A trailing partial block ends the stream.
    fn cfb(&mut self, data: &[u8], direction: Direction) -> Vec<u8> {
        let mut out = data.to_vec();
        for chunk in out.chunks_mut(self.register.len()) {
            let mut keystream = self.register.clone();
            self.cipher.encrypt_block(&mut keystream);

            let ciphertext = match direction {
                Direction::Encrypt => {
                    xor_in_place(chunk, &keystream);
                    chunk.to_vec()
                }
                Direction::Decrypt => {
                    let received = chunk.to_vec();
                    xor_in_place(chunk, &keystream);
                    received
                }
            };
            self.register[..ciphertext.len()].copy_from_slice(&ciphertext);
        }
        out
    }

    fn padding(&self) -> Result<Pkcs7Padding> {
        Ok(Pkcs7Padding::new(BlockSize::try_from(self.block_len())?))
    }

    fn aligned(&self, data: &[u8]) -> Result<Vec<u8>> {
        let block_len = self.block_len();
        if data.is_empty() || !data.len().is_multiple_of(block_len) {
            return Err(Error::Alignment { len: data.len(), block_len });
        }
        Ok(data.to_vec())
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// The last two bytes of block 1 must reappear as the first two of block 2.
fn quick_check(plaintext: &[u8], block_len: usize) -> Result<()> {
    let check = &plaintext[block_len - QUICK_CHECK_LEN..block_len];
    let repeat = &plaintext[block_len..block_len + QUICK_CHECK_LEN];
    if check != repeat {
        debug!(check = %hex::encode(check), repeat = %hex::encode(repeat), "quick check mismatch");
        return Err(Error::KeyMismatch);
    }
    Ok(())
}

#[inline]
fn xor_in_place(data: &mut [u8], keystream: &[u8]) {
    data.iter_mut().zip(keystream).for_each(|(byte, key)| *byte ^= key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::aes::Aes;
    use crate::cipher::algorithm::ALGORITHMS;
    use crate::cipher::des::Des;

    const PLAINTEXT: &[u8] = b"this is a test!";
    const DES_KEY: &str = "0102030405060708";
    const TDES_KEY: &str = "010203040506070809101112131415161718192021222324";

    fn des(key: &str) -> Box<dyn BlockCipher> {
        Box::new(Des::new(&hex::decode(key).unwrap()).unwrap())
    }

    fn tdes(key: &str) -> Box<dyn BlockCipher> {
        Box::new(Des::triple(&hex::decode(key).unwrap()).unwrap())
    }

    fn run(cipher: Box<dyn BlockCipher>, mode: CipherMode) -> String {
        hex::encode(CipherContext::new(cipher, mode, None).unwrap().encrypt(PLAINTEXT).unwrap())
    }

    #[test]
    fn test_des_reference_vectors() {
        assert_eq!(run(des(DES_KEY), CipherMode::Ecb), "c61d5489ea1cc84a1b18279680f57777");
        assert_eq!(run(des(DES_KEY), CipherMode::Cbc), "c61d5489ea1cc84a1997dbda94b975dc");
        assert_eq!(run(des(DES_KEY), CipherMode::Ofb), "c41bb54c9260204de53b958ead4f0b");
    }

    #[test]
    fn test_triple_des_reference_vectors() {
        assert_eq!(run(tdes(TDES_KEY), CipherMode::Ecb), "1eb7c196c593c44bf13dbc8f66010044");
        assert_eq!(run(tdes(TDES_KEY), CipherMode::Cbc), "1eb7c196c593c44b4ecbb0a82e053db1");
        assert_eq!(run(tdes(TDES_KEY), CipherMode::Ofb), "d7fbe4e5d8f3628ab35202b2b77d68");
    }

    #[test]
    fn test_triple_des_short_key_matches_des() {
        assert_eq!(run(tdes(DES_KEY), CipherMode::Ofb), "c41bb54c9260204de53b958ead4f0b");
        assert_eq!(run(tdes(DES_KEY), CipherMode::Ecb), "c61d5489ea1cc84a1b18279680f57777");
    }

    #[test]
    fn test_aes_cbc_nist_vector() {
        // NIST SP 800-38A F.2.1, first block.
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let mut context = CipherContext::new(Box::new(Aes::new(&key).unwrap()), CipherMode::Cbc, Some(&iv)).unwrap();
        let ciphertext = context.encrypt(&plaintext).unwrap();
        assert_eq!(hex::encode(&ciphertext[..16]), "7649abac8119b246cee98e9b12e9197d");
    }

    #[test]
    fn test_round_trip_all_modes() {
        let prefix = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x10];
        for algorithm in &ALGORITHMS {
            let key: Vec<u8> = (0..algorithm.key_len).map(|i| u8::try_from(i).unwrap()).collect();
            for mode in [CipherMode::Ecb, CipherMode::Cbc, CipherMode::Ofb, CipherMode::OpenPgp] {
                for len in [0usize, 1, 7, 8, 15, 16, 17, 33, 100] {
                    let mut message: Vec<u8> = (0..len).map(|i| u8::try_from(i * 31 % 251).unwrap()).collect();
                    if mode == CipherMode::OpenPgp {
                        let bs = algorithm.block_len;
                        let mut framed = prefix[..bs].to_vec();
                        framed.extend_from_slice(&prefix[bs - 2..bs]);
                        framed.append(&mut message);
                        message = framed;
                    }

                    let ciphertext = CipherContext::new(algorithm.new_cipher(&key).unwrap(), mode, None).unwrap().encrypt(&message).unwrap();
                    if !mode.is_padded() {
                        assert_eq!(ciphertext.len(), message.len());
                    }
                    let decrypted = CipherContext::new(algorithm.new_cipher(&key).unwrap(), mode, None).unwrap().decrypt(&ciphertext).unwrap();
                    assert_eq!(decrypted, message, "{} {mode} len {len}", algorithm.name);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_des_key_lengths() {
        let message: Vec<u8> = (0..45u8).map(|i| i.wrapping_mul(37)).collect();
        let mut framed = message[..8].to_vec();
        framed.extend_from_slice(&message[6..8]);
        framed.extend_from_slice(&message[8..]);

        let ciphers: [fn() -> Box<dyn BlockCipher>; 3] = [|| des(DES_KEY), || tdes(DES_KEY), || tdes(TDES_KEY)];
        for cipher in ciphers {
            for mode in [CipherMode::Ecb, CipherMode::Cbc, CipherMode::Ofb, CipherMode::OpenPgp] {
                let input = if mode == CipherMode::OpenPgp { &framed } else { &message };
                let ciphertext = CipherContext::new(cipher(), mode, None).unwrap().encrypt(input).unwrap();
                let decrypted = CipherContext::new(cipher(), mode, None).unwrap().decrypt(&ciphertext).unwrap();
                assert_eq!(&decrypted, input, "{mode}");
            }
        }
    }

    #[test]
    fn test_openpgp_decrypt_in_pieces() {
        let key = [0x2bu8; 16];
        let mut message = vec![0x6e; 16];
        message.extend_from_slice(&[0x6e, 0x6e]);
        message.extend((0..46u8).map(|i| i.wrapping_mul(97).wrapping_add(3)));

        let ciphertext = CipherContext::openpgp(Box::new(Aes::new(&key).unwrap())).encrypt(&message).unwrap();
        let mut context = CipherContext::openpgp(Box::new(Aes::new(&key).unwrap()));
        let mut decrypted = context.decrypt(&ciphertext[..32]).unwrap();
        decrypted.extend(context.decrypt(&ciphertext[32..48]).unwrap());
        decrypted.extend(context.decrypt(&ciphertext[48..]).unwrap());
        assert_eq!(decrypted, message);
    }

    #[test]
    fn test_register_persists_across_calls() {
        let key = [7u8; 16];
        let message = [0x5au8; 48];
        let whole = CipherContext::new(Box::new(Aes::new(&key).unwrap()), CipherMode::Ofb, None).unwrap().encrypt(&message).unwrap();

        let mut context = CipherContext::new(Box::new(Aes::new(&key).unwrap()), CipherMode::Ofb, None).unwrap();
        let mut pieces = context.encrypt(&message[..16]).unwrap();
        pieces.extend(context.encrypt(&message[16..]).unwrap());
        assert_eq!(whole, pieces);
    }

    #[test]
    fn test_openpgp_mode_is_zero_iv_cfb() {
        // First keystream block is E(0).
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let mut keystream = [0u8; 16];
        Aes::new(&key).unwrap().encrypt_block(&mut keystream);

        let plaintext = [0xa5u8; 20];
        let ciphertext = CipherContext::openpgp(Box::new(Aes::new(&key).unwrap())).encrypt(&plaintext).unwrap();
        let expected: Vec<u8> = plaintext[..16].iter().zip(keystream).map(|(p, k)| p ^ k).collect();
        assert_eq!(&ciphertext[..16], expected.as_slice());
    }

    #[test]
    fn test_openpgp_wrong_key_fails_quick_check() {
        let mut message = vec![0x3c; 16];
        message.extend_from_slice(&[0x3c, 0x3c]);
        message.extend_from_slice(b"literal data follows");

        let ciphertext = CipherContext::openpgp(Box::new(Aes::new(&[1u8; 32]).unwrap())).encrypt(&message).unwrap();
        let mut failures = 0;
        for wrong in 2..=20u8 {
            let result = CipherContext::openpgp(Box::new(Aes::new(&[wrong; 32]).unwrap())).decrypt(&ciphertext);
            if matches!(result, Err(Error::KeyMismatch)) {
                failures += 1;
            }
        }
        assert!(failures >= 18);
    }

    #[test]
    fn test_openpgp_rejects_short_input() {
        let result = CipherContext::openpgp(des(DES_KEY)).decrypt(&[0u8; 9]);
        assert!(matches!(result, Err(Error::Truncated { expected: 10, actual: 9, .. })));
    }

    #[test]
    fn test_iv_validation() {
        assert!(matches!(CipherContext::new(des(DES_KEY), CipherMode::Cbc, Some(&[0u8; 16])), Err(Error::IvLength { expected: 8, actual: 16 })));
        let plaintext = [0x42u8; 12];
        let ignored = CipherContext::new(des(DES_KEY), CipherMode::OpenPgp, Some(&[0xFFu8; 8])).unwrap().encrypt(&plaintext).unwrap();
        assert_eq!(ignored, CipherContext::openpgp(des(DES_KEY)).encrypt(&plaintext).unwrap());
        assert!(CipherContext::new(des(DES_KEY), CipherMode::Ofb, Some(&[0u8; 8])).is_ok());
    }

    #[test]
    fn test_unaligned_ciphertext_rejected() {
        let mut context = CipherContext::ecb(des(DES_KEY));
        assert!(matches!(context.decrypt(&[0u8; 12]), Err(Error::Alignment { len: 12, block_len: 8 })));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(CipherMode::OpenPgp.to_string(), "OpenPGP");
        assert_eq!(CipherMode::Ecb.to_string(), "ECB");
    }
}
