//! Error taxonomy for the OpenPGP codec, cipher and key-derivation layers.
//!
//! Library code returns [`Result`]; the CLI wraps these errors with `anyhow`
//! context before reporting them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Format errors
    #[error("malformed packet at offset {offset}: {reason}")]
    Format { offset: usize, reason: String },

    #[error("truncated packet at offset {offset}: expected {expected} bytes, got {actual}")]
    Truncated { offset: usize, expected: usize, actual: usize },

    #[error("missing {0} packet")]
    MissingPacket(&'static str),

    // Crypto configuration errors
    #[error("invalid key length: expected {expected}, got {actual}")]
    KeyLength { expected: String, actual: usize },

    #[error("invalid IV length: expected {expected}, got {actual}")]
    IvLength { expected: usize, actual: usize },

    #[error("ciphertext length {len} is not a multiple of the {block_len}-byte block size")]
    Alignment { len: usize, block_len: usize },

    #[error("invalid PKCS#7 padding")]
    Padding,

    #[error("unsupported {kind}: {value}")]
    Unsupported { kind: &'static str, value: String },

    // Passphrase / integrity failures
    #[error("quick check failed: wrong passphrase or corrupted data")]
    KeyMismatch,

    #[error("modification detection code mismatch: data may have been tampered with")]
    Integrity,

    #[error("value {value} out of range [{min}, {max}]")]
    Range { value: u64, min: u64, max: u64 },

    #[error("random number generator failed: {0}")]
    Random(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn format(offset: usize, reason: impl Into<String>) -> Self {
        Self::Format { offset, reason: reason.into() }
    }

    pub(crate) fn unsupported(kind: &'static str, value: impl ToString) -> Self {
        Self::Unsupported { kind, value: value.to_string() }
    }

    /// True for failures caused by a wrong passphrase rather than a malformed file.
    #[inline]
    #[must_use]
    pub const fn is_key_mismatch(&self) -> bool {
        matches!(self, Self::KeyMismatch)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
