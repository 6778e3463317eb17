//! Symmetrically Encrypted Integrity Protected Data packet body (tag 18):
//! a version octet followed by the OpenPGP-CFB ciphertext.

use crate::config::SEIP_PACKET_VERSION;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedData {
    version: u8,
    ciphertext: Vec<u8>,
}

impl EncryptedData {
    #[must_use]
    pub const fn new(ciphertext: Vec<u8>) -> Self {
        Self { version: SEIP_PACKET_VERSION, ciphertext }
    }

    pub fn from_bytes(body: &[u8], offset: usize) -> Result<Self> {
        let (&version, ciphertext) = body.split_first().ok_or(Error::Truncated { offset, expected: 1, actual: 0 })?;
        if version != SEIP_PACKET_VERSION {
            return Err(Error::unsupported("encrypted data packet version", version));
        }
        Ok(Self { version, ciphertext: ciphertext.to_vec() })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body_len());
        out.push(self.version);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    #[inline]
    #[must_use]
    pub fn body_len(&self) -> usize {
        1 + self.ciphertext.len()
    }

    #[inline]
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_prefix() {
        let data = EncryptedData::new(vec![0xAA, 0xBB]);
        assert_eq!(data.to_bytes(), vec![0x01, 0xAA, 0xBB]);
        assert_eq!(data.body_len(), 3);
        assert_eq!(EncryptedData::from_bytes(&data.to_bytes(), 0).unwrap(), data);
    }

    #[test]
    fn test_rejects_unknown_version() {
        assert!(matches!(EncryptedData::from_bytes(&[0x02, 0x00], 0), Err(Error::Unsupported { .. })));
    }

    #[test]
    fn test_rejects_empty_body() {
        assert!(matches!(EncryptedData::from_bytes(&[], 4), Err(Error::Truncated { offset: 4, .. })));
    }
}
