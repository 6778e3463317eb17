//! String-to-Key specifiers (RFC 4880 section 3.7).
//!
//! [`S2kParams`] is the parsed or freshly generated specifier; [`Derive`]
//! turns it plus a passphrase into a session key. Iteration counts travel as
//! a single EXPBIAS-encoded octet, see [`encode_count`] and [`decode_count`].

use strum::Display;

use crate::cipher::{AlgorithmDescriptor, HashAlgorithm};
use crate::config::{S2K_COUNT_MAX, S2K_COUNT_MIN, S2K_SALT_LEN};
use crate::error::{Error, Result};

pub mod derive;

pub use derive::Derive;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum S2kMode {
    #[strum(serialize = "simple")]
    Simple,
    #[strum(serialize = "salted")]
    Salted,
    #[strum(serialize = "iterated+salted")]
    IteratedSalted,
}

impl S2kMode {
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Simple => 0,
            Self::Salted => 1,
            Self::IteratedSalted => 3,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Self::Simple),
            1 => Ok(Self::Salted),
            3 => Ok(Self::IteratedSalted),
            other => Err(Error::unsupported("S2K mode", other)),
        }
    }
}

/// A complete S2K specifier together with the cipher it derives a key for.
///
/// The constructors make the mode/field combinations of RFC 4880 the only
/// representable ones: simple carries neither salt nor count, salted only a
/// salt, iterated both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S2kParams {
    mode: S2kMode,
    hash: HashAlgorithm,
    algorithm: &'static AlgorithmDescriptor,
    salt: Option<[u8; S2K_SALT_LEN]>,
    count: Option<u8>,
}

impl S2kParams {
    #[must_use]
    pub const fn simple(algorithm: &'static AlgorithmDescriptor, hash: HashAlgorithm) -> Self {
        Self { mode: S2kMode::Simple, hash, algorithm, salt: None, count: None }
    }

    #[must_use]
    pub const fn salted(algorithm: &'static AlgorithmDescriptor, hash: HashAlgorithm, salt: [u8; S2K_SALT_LEN]) -> Self {
        Self { mode: S2kMode::Salted, hash, algorithm, salt: Some(salt), count: None }
    }

    #[must_use]
    pub const fn iterated(algorithm: &'static AlgorithmDescriptor, hash: HashAlgorithm, salt: [u8; S2K_SALT_LEN], count: u8) -> Self {
        Self { mode: S2kMode::IteratedSalted, hash, algorithm, salt: Some(salt), count: Some(count) }
    }

    /// Builds a specifier for encryption with a fresh random salt where the
    /// mode needs one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] when `iterations` lies outside the encodable
    /// range, or [`Error::Random`] when the OS RNG fails.
    pub fn generate(algorithm: &'static AlgorithmDescriptor, hash: HashAlgorithm, mode: S2kMode, iterations: u32) -> Result<Self> {
        Ok(match mode {
            S2kMode::Simple => Self::simple(algorithm, hash),
            S2kMode::Salted => Self::salted(algorithm, hash, Derive::generate_salt()?),
            S2kMode::IteratedSalted => Self::iterated(algorithm, hash, Derive::generate_salt()?, encode_count(validate_count(iterations)?)),
        })
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> S2kMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    #[inline]
    #[must_use]
    pub const fn algorithm(&self) -> &'static AlgorithmDescriptor {
        self.algorithm
    }

    #[inline]
    #[must_use]
    pub const fn salt(&self) -> Option<&[u8; S2K_SALT_LEN]> {
        self.salt.as_ref()
    }

    /// The count octet as stored in the packet.
    #[inline]
    #[must_use]
    pub const fn encoded_count(&self) -> Option<u8> {
        self.count
    }

    /// Number of octets hashed per round in iterated mode.
    #[inline]
    #[must_use]
    pub fn iterations(&self) -> Option<u32> {
        self.count.map(decode_count)
    }
}

/// `(16 + (c & 15)) << ((c >> 4) + 6)`
#[inline]
#[must_use]
pub const fn decode_count(encoded: u8) -> u32 {
    (16 + (encoded as u32 & 0x0F)) << ((encoded as u32 >> 4) + 6)
}

/// Smallest encoded octet whose decoded count is at least `iterations`,
/// after clamping into the representable range.
#[must_use]
pub fn encode_count(iterations: u32) -> u8 {
    if iterations >= S2K_COUNT_MAX {
        return u8::MAX;
    }

    let iterations = iterations.max(S2K_COUNT_MIN);
    let mut exponent = 0u32;
    let mut mantissa = iterations >> 6;
    while mantissa >= 32 {
        exponent += 1;
        mantissa >>= 1;
    }

    // exponent <= 15 and 16 <= mantissa < 32 below the maximum, so this fits in a byte.
    let mut encoded = u8::try_from((exponent << 4) | (mantissa - 16)).unwrap_or(u8::MAX);
    if decode_count(encoded) < iterations {
        encoded += 1;
    }
    encoded
}

/// Accepts only counts the EXPBIAS encoding can represent.
///
/// # Errors
///
/// Returns [`Error::Range`] when `count < 1024 || count > 65_011_712`.
pub fn validate_count(count: u32) -> Result<u32> {
    if !(S2K_COUNT_MIN..=S2K_COUNT_MAX).contains(&count) {
        return Err(Error::Range { value: u64::from(count), min: u64::from(S2K_COUNT_MIN), max: u64::from(S2K_COUNT_MAX) });
    }
    Ok(count)
}
