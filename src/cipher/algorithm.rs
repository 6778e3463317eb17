//! Static table of the symmetric algorithms this tool can use, keyed by
//! their OpenPGP ids (RFC 4880 section 9.2).

use crate::cipher::BlockCipher;
use crate::cipher::aes::Aes;
use crate::cipher::des::Des;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipherFamily {
    TripleDes,
    Aes,
}

#[derive(Debug, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    pub id: u8,
    pub name: &'static str,
    pub key_len: usize,
    pub block_len: usize,
    pub family: CipherFamily,
}

pub static ALGORITHMS: [AlgorithmDescriptor; 4] = [
    AlgorithmDescriptor { id: 2, name: "3DES", key_len: 24, block_len: 8, family: CipherFamily::TripleDes },
    AlgorithmDescriptor { id: 7, name: "AES128", key_len: 16, block_len: 16, family: CipherFamily::Aes },
    AlgorithmDescriptor { id: 8, name: "AES192", key_len: 24, block_len: 16, family: CipherFamily::Aes },
    AlgorithmDescriptor { id: 9, name: "AES256", key_len: 32, block_len: 16, family: CipherFamily::Aes },
];

impl AlgorithmDescriptor {
    pub fn from_id(id: u8) -> Result<&'static Self> {
        ALGORITHMS.iter().find(|algorithm| algorithm.id == id).ok_or_else(|| Error::unsupported("cipher algorithm", id))
    }

    pub fn from_name(name: &str) -> Result<&'static Self> {
        ALGORITHMS.iter().find(|algorithm| algorithm.name.eq_ignore_ascii_case(name)).ok_or_else(|| Error::unsupported("cipher algorithm", name))
    }

    /// Builds the block cipher for this algorithm. The key must be exactly
    /// `key_len` bytes.
    pub fn new_cipher(&self, key: &[u8]) -> Result<Box<dyn BlockCipher>> {
        if key.len() != self.key_len {
            return Err(Error::KeyLength { expected: self.key_len.to_string(), actual: key.len() });
        }

        Ok(match self.family {
            CipherFamily::TripleDes => Box::new(Des::triple(key)?),
            CipherFamily::Aes => Box::new(Aes::new(key)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(AlgorithmDescriptor::from_id(2).unwrap().name, "3DES");
        assert_eq!(AlgorithmDescriptor::from_id(9).unwrap().key_len, 32);
        assert!(matches!(AlgorithmDescriptor::from_id(3), Err(Error::Unsupported { .. })));
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(AlgorithmDescriptor::from_name("aes192").unwrap().id, 8);
        assert_eq!(AlgorithmDescriptor::from_name("3DES").unwrap().block_len, 8);
        assert!(AlgorithmDescriptor::from_name("CAST5").is_err());
    }

    #[test]
    fn test_factory_block_lengths() {
        for algorithm in &ALGORITHMS {
            let cipher = algorithm.new_cipher(&vec![0x42; algorithm.key_len]).unwrap();
            assert_eq!(cipher.block_len(), algorithm.block_len, "{}", algorithm.name);
        }
    }

    #[test]
    fn test_factory_rejects_wrong_key_length() {
        let aes256 = AlgorithmDescriptor::from_id(9).unwrap();
        assert!(matches!(aes256.new_cipher(&[0u8; 16]), Err(Error::KeyLength { actual: 16, .. })));
    }
}
