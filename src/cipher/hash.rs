//! Digest collaborator for S2K and the modification detection code.
//!
//! The hash primitives come from RustCrypto; this module only maps OpenPGP
//! hash algorithm ids onto them.

use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use strum::{Display, EnumIter, IntoStaticStr};
use subtle::ConstantTimeEq;

use crate::config::MDC_LEN;
use crate::error::{Error, Result};

/// OpenPGP hash algorithms (RFC 4880 section 9.4) supported for S2K.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sha224,
}

impl HashAlgorithm {
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Md5 => 1,
            Self::Sha1 => 2,
            Self::Sha256 => 8,
            Self::Sha384 => 9,
            Self::Sha512 => 10,
            Self::Sha224 => 11,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Self::Md5),
            2 => Ok(Self::Sha1),
            8 => Ok(Self::Sha256),
            9 => Ok(Self::Sha384),
            10 => Ok(Self::Sha512),
            11 => Ok(Self::Sha224),
            other => Err(Error::unsupported("hash algorithm", other)),
        }
    }

    /// Looks up an algorithm by its CLI name (`MD5`, `SHA1`, `SHA256`, ...), ignoring case.
    pub fn from_name(name: &str) -> Result<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|algorithm| algorithm.name().eq_ignore_ascii_case(name)).ok_or_else(|| Error::unsupported("hash algorithm", name))
    }

    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    #[inline]
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// Hashes `data` with the selected algorithm.
#[must_use]
pub fn digest(data: &[u8], algorithm: HashAlgorithm) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Md5 => Md5::digest(data).to_vec(),
        HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        HashAlgorithm::Sha224 => Sha224::digest(data).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Repeated input is fed to the hasher in pieces of about this many octets.
const REPEAT_CHUNK_LEN: usize = 64 * 1024;

/// Hashes `zeros` zero octets followed by `base` repeated and cut to exactly
/// `len` octets. The repeated input is streamed, never built in full.
#[must_use]
pub fn digest_repeated(zeros: usize, base: &[u8], len: usize, algorithm: HashAlgorithm) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Md5 => stream_repeated::<Md5>(zeros, base, len),
        HashAlgorithm::Sha1 => stream_repeated::<Sha1>(zeros, base, len),
        HashAlgorithm::Sha224 => stream_repeated::<Sha224>(zeros, base, len),
        HashAlgorithm::Sha256 => stream_repeated::<Sha256>(zeros, base, len),
        HashAlgorithm::Sha384 => stream_repeated::<Sha384>(zeros, base, len),
        HashAlgorithm::Sha512 => stream_repeated::<Sha512>(zeros, base, len),
    }
}

fn stream_repeated<D: Digest>(zeros: usize, base: &[u8], len: usize) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(vec![0u8; zeros]);

    if !base.is_empty() {
        // A whole number of copies, so every chunk starts at the same phase.
        let copies = (REPEAT_CHUNK_LEN / base.len()).max(1);
        let chunk: Vec<u8> = base.iter().cycle().take((base.len() * copies).min(len)).copied().collect();
        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(chunk.len());
            hasher.update(&chunk[..take]);
            remaining -= take;
        }
    }
    hasher.finalize().to_vec()
}

/// SHA-1 modification detection code over a decrypted plaintext prefix.
pub struct Mdc {
    hash: [u8; MDC_LEN],
}

impl Mdc {
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        Self { hash: Sha1::digest(data).into() }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MDC_LEN] {
        &self.hash
    }

    /// Constant-time comparison against the trailer carried in the message.
    #[must_use]
    pub fn matches(&self, expected: &[u8]) -> bool {
        bool::from(self.hash.as_slice().ct_eq(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_repeated_matches_materialised_input() {
        let base = b"0123456789abc";
        for len in [0usize, 5, 13, 14, 65_535, 65_536, 200_003] {
            let mut input = vec![0u8; 2];
            input.extend(base.iter().cycle().take(len));
            assert_eq!(digest_repeated(2, base, len, HashAlgorithm::Sha256), digest(&input, HashAlgorithm::Sha256), "len {len}");
        }
        assert_eq!(digest_repeated(1, b"", 0, HashAlgorithm::Md5), digest(&[0], HashAlgorithm::Md5));
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(hex::encode(digest(b"test", HashAlgorithm::Md5)), "098f6bcd4621d373cade4e832627b4f6");
        assert_eq!(hex::encode(digest(b"abc", HashAlgorithm::Sha1)), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(hex::encode(digest(b"abc", HashAlgorithm::Sha256)), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn test_output_lengths() {
        for algorithm in <HashAlgorithm as strum::IntoEnumIterator>::iter() {
            assert_eq!(digest(b"sweetpgp", algorithm).len(), algorithm.output_len(), "{algorithm}");
        }
    }

    #[test]
    fn test_id_round_trip() {
        for algorithm in <HashAlgorithm as strum::IntoEnumIterator>::iter() {
            assert_eq!(HashAlgorithm::from_id(algorithm.id()).unwrap(), algorithm);
        }
        assert!(HashAlgorithm::from_id(3).is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(HashAlgorithm::Sha256.name(), "SHA256");
        assert_eq!(HashAlgorithm::Md5.to_string(), "MD5");
        assert_eq!(HashAlgorithm::from_name("sha512").unwrap(), HashAlgorithm::Sha512);
        assert!(HashAlgorithm::from_name("RIPEMD160").is_err());
    }

    #[test]
    fn test_mdc() {
        let mdc = Mdc::new(b"abc");
        assert_eq!(hex::encode(mdc.as_bytes()), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert!(mdc.matches(&hex::decode("a9993e364706816aba3e25717850c26c9cd0d89d").unwrap()));
        assert!(!mdc.matches(&[0u8; MDC_LEN]));
        assert!(!mdc.matches(&[]));
    }
}
