//! Symmetric-Key Encrypted Session Key packet body (tag 3).
//!
//! ```text
//! version (0x04) | cipher id | S2K mode | hash id | [salt: 8] | [count: 1]
//! ```
//!
//! Only the form without an encrypted session key is supported: the S2K
//! output is used directly as the message key.

use crate::cipher::{AlgorithmDescriptor, HashAlgorithm};
use crate::config::{S2K_SALT_LEN, SYMKEY_PACKET_VERSION};
use crate::error::{Error, Result};
use crate::s2k::{S2kMode, S2kParams};

const FIXED_LEN: usize = 4;

impl S2kParams {
    /// Parses a tag 3 body located at `offset` in the input.
    ///
    /// # Errors
    ///
    /// [`Error::Truncated`] when the body is shorter than the mode requires,
    /// [`Error::Unsupported`] for an unknown version, algorithm, hash, mode, or
    /// a trailing encrypted session key.
    pub fn from_packet_body(body: &[u8], offset: usize) -> Result<Self> {
        if body.len() < FIXED_LEN {
            return Err(Error::Truncated { offset, expected: FIXED_LEN, actual: body.len() });
        }

        if body[0] != SYMKEY_PACKET_VERSION {
            return Err(Error::unsupported("S2K packet version", body[0]));
        }

        let algorithm = AlgorithmDescriptor::from_id(body[1])?;
        let mode = S2kMode::from_id(body[2])?;
        let hash = HashAlgorithm::from_id(body[3])?;

        let expected = match mode {
            S2kMode::Simple => FIXED_LEN,
            S2kMode::Salted => FIXED_LEN + S2K_SALT_LEN,
            S2kMode::IteratedSalted => FIXED_LEN + S2K_SALT_LEN + 1,
        };
        if body.len() < expected {
            return Err(Error::Truncated { offset, expected, actual: body.len() });
        }
        if body.len() > expected {
            return Err(Error::unsupported("S2K packet", "encrypted session key"));
        }

        let mut salt = [0u8; S2K_SALT_LEN];
        if mode != S2kMode::Simple {
            salt.copy_from_slice(&body[FIXED_LEN..FIXED_LEN + S2K_SALT_LEN]);
        }

        Ok(match mode {
            S2kMode::Simple => Self::simple(algorithm, hash),
            S2kMode::Salted => Self::salted(algorithm, hash, salt),
            S2kMode::IteratedSalted => Self::iterated(algorithm, hash, salt, body[expected - 1]),
        })
    }

    #[must_use]
    pub fn to_packet_body(&self) -> Vec<u8> {
        let mut out = vec![SYMKEY_PACKET_VERSION, self.algorithm().id, self.mode().id(), self.hash().id()];
        if let Some(salt) = self.salt() {
            out.extend_from_slice(salt);
        }
        if let Some(count) = self.encoded_count() {
            out.push(count);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tdes() -> &'static AlgorithmDescriptor {
        AlgorithmDescriptor::from_id(2).unwrap()
    }

    #[test]
    fn test_body_per_mode() {
        let simple = S2kParams::simple(tdes(), HashAlgorithm::Md5);
        assert_eq!(simple.to_packet_body(), vec![0x04, 0x02, 0x00, 0x01]);

        let salted = S2kParams::salted(tdes(), HashAlgorithm::Sha1, [0xAA; 8]);
        assert_eq!(salted.to_packet_body().len(), 12);

        let iterated = S2kParams::iterated(tdes(), HashAlgorithm::Sha512, [0xAA; 8], 0xFF);
        let body = iterated.to_packet_body();
        assert_eq!(body.len(), 13);
        assert_eq!(body[12], 0xFF);
    }

    #[test]
    fn test_parse_serialized_body() {
        for params in [
            S2kParams::simple(tdes(), HashAlgorithm::Sha224),
            S2kParams::salted(tdes(), HashAlgorithm::Sha384, [1, 2, 3, 4, 5, 6, 7, 8]),
            S2kParams::iterated(AlgorithmDescriptor::from_id(7).unwrap(), HashAlgorithm::Sha256, [8; 8], 0x60),
        ] {
            assert_eq!(S2kParams::from_packet_body(&params.to_packet_body(), 0).unwrap(), params);
        }
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        assert!(matches!(S2kParams::from_packet_body(&[0x05, 0x09, 0x00, 0x02], 0), Err(Error::Unsupported { .. })));
        assert!(matches!(S2kParams::from_packet_body(&[0x04, 0x01, 0x00, 0x02], 0), Err(Error::Unsupported { .. })));
        assert!(matches!(S2kParams::from_packet_body(&[0x04, 0x09, 0x02, 0x02], 0), Err(Error::Unsupported { .. })));
        assert!(matches!(S2kParams::from_packet_body(&[0x04, 0x09, 0x00, 0x03], 0), Err(Error::Unsupported { .. })));
    }

    #[test]
    fn test_parse_truncated() {
        assert!(matches!(S2kParams::from_packet_body(&[0x04, 0x09], 3), Err(Error::Truncated { offset: 3, expected: 4, actual: 2 })));
        assert!(matches!(S2kParams::from_packet_body(&[0x04, 0x09, 0x03, 0x02, 1, 2, 3], 0), Err(Error::Truncated { expected: 13, .. })));
    }

    #[test]
    fn test_parse_rejects_session_key() {
        let mut body = S2kParams::simple(tdes(), HashAlgorithm::Sha1).to_packet_body();
        body.extend_from_slice(&[0u8; 25]);
        assert!(S2kParams::from_packet_body(&body, 0).is_err());
    }
}
