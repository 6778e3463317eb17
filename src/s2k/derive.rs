//! # Passphrase Key Derivation
//!
//! Implements the three OpenPGP S2K specifiers:
//!
//! - **Simple** (0): hash the passphrase
//! - **Salted** (1): hash `salt || passphrase`
//! - **Iterated and Salted** (3): hash `salt || passphrase` repeated to
//!   exactly `count` octets
//!
//! When the digest is shorter than the key, further hash contexts are run
//! over the same input preloaded with one, two, ... zero octets and their
//! outputs are concatenated.

use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::debug;

use crate::cipher::digest_repeated;
use crate::error::{Error, Result};
use crate::s2k::{S2kMode, S2kParams};
use crate::secret::SecretBytes;

#[derive(Debug)]
pub struct Derive {
    passphrase: SecretBytes,
}

impl Derive {
    #[must_use]
    pub fn new(passphrase: &[u8]) -> Self {
        Self { passphrase: SecretBytes::from_vec(passphrase.to_vec()) }
    }

    /// Derives `key_len` bytes of key material for `params`.
    #[must_use]
    pub fn derive_key(&self, params: &S2kParams, key_len: usize) -> SecretBytes {
        let base = self.salted_input(params);
        let input_len = Self::input_len(params, base.len());
        debug!(mode = %params.mode(), hash = %params.hash(), input_len, key_len, "deriving key");

        let mut key = Vec::with_capacity(key_len + params.hash().output_len());
        let mut preload = 0usize;
        while key.len() < key_len {
            key.extend_from_slice(&digest_repeated(preload, &base, input_len, params.hash()));
            preload += 1;
        }
        key.truncate(key_len);

        SecretBytes::from_vec(key)
    }

    /// `salt || passphrase`, or the bare passphrase in simple mode.
    fn salted_input(&self, params: &S2kParams) -> Vec<u8> {
        let mut input = params.salt().map(|salt| salt.to_vec()).unwrap_or_default();
        input.extend_from_slice(self.passphrase.expose_secret());
        input
    }

    /// Octets hashed per round. Iterated mode repeats the salted input up to
    /// `count` but never hashes less than one full copy.
    fn input_len(params: &S2kParams, base_len: usize) -> usize {
        match params.mode() {
            S2kMode::Simple | S2kMode::Salted => base_len,
            S2kMode::IteratedSalted if base_len == 0 => 0,
            S2kMode::IteratedSalted => {
                let count = params.iterations().map_or(0, |count| usize::try_from(count).unwrap_or(usize::MAX));
                count.max(base_len)
            }
        }
    }

    /// Generates a random salt from the operating system RNG.
    pub fn generate_salt<const N: usize>() -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        fill_random(&mut bytes)?;
        Ok(bytes)
    }
}

pub(crate) fn fill_random(buffer: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buffer).map_err(|e| Error::Random(e.to_string()))
}
