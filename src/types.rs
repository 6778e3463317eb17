//! Common type definitions for SweetPGP.
//!
//! - [`ProcessorMode`]: encryption or decryption, drives output naming
//! - [`Processing`]: wraps the mode with progress/error labels
//! - [`IntegrityPolicy`]: what to do when the modification detection code fails
//! - [`Integrity`]: the outcome of that check, reported after decryption

use std::fmt::{Display, Formatter, Result};

/// Represents the type of file operation to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessorMode {
    /// Encrypt the file, producing a `.gpg` output.
    Encrypt,

    /// Decrypt the file.
    Decrypt,
}

impl ProcessorMode {
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Encrypt => "Encrypt",
            Self::Decrypt => "Decrypt",
        }
    }
}

impl Display for ProcessorMode {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}

/// A processing operation in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Processing {
    Encryption,
    Decryption,
}

impl Processing {
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Encryption => "Encryption",
            Self::Decryption => "Decryption",
        }
    }

    #[inline]
    #[must_use]
    pub const fn mode(self) -> ProcessorMode {
        match self {
            Self::Encryption => ProcessorMode::Encrypt,
            Self::Decryption => ProcessorMode::Decrypt,
        }
    }
}

impl Display for Processing {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}

/// Reaction to a modification detection code mismatch.
///
/// `Warn` logs the mismatch and still returns the plaintext, which is how
/// GnuPG-era tooling behaved; `Strict` turns it into a hard error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegrityPolicy {
    #[default]
    Warn,
    Strict,
}

/// Outcome of the modification detection code check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Integrity {
    Ok,
    Mismatch,
}

impl Integrity {
    #[inline]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl Display for Integrity {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Mismatch => "MISMATCH",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_mode() {
        assert_eq!(Processing::Encryption.mode(), ProcessorMode::Encrypt);
        assert_eq!(Processing::Decryption.mode(), ProcessorMode::Decrypt);
        assert_eq!(Processing::Decryption.to_string(), "Decryption");
        assert_eq!(ProcessorMode::Encrypt.to_string(), "Encrypt");
    }

    #[test]
    fn test_default_policy_warns() {
        assert_eq!(IntegrityPolicy::default(), IntegrityPolicy::Warn);
    }

    #[test]
    fn test_integrity_display() {
        assert!(Integrity::Ok.is_ok());
        assert!(!Integrity::Mismatch.is_ok());
        assert_eq!(Integrity::Mismatch.to_string(), "MISMATCH");
    }
}
