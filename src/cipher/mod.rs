//! # Block Cipher Module
//!
//! From-scratch AES and DES/3DES primitives, the mode-of-operation driver
//! that chains them, and the digest collaborator used by S2K and the
//! modification detection code.
//!
//! ## Architecture
//!
//! - **Primitive Layer**: [`Aes`] and [`Des`] transform exactly one block
//! - **Table Layer**: [`AlgorithmDescriptor`] maps OpenPGP ids to primitives
//! - **Mode Layer**: [`CipherContext`] applies ECB, CBC, OFB or OpenPGP CFB
//! - **Support Layer**: [`digest`] and [`Mdc`] wrap the RustCrypto hashes

pub mod aes;
pub mod algorithm;
pub mod bits;
pub mod des;
pub mod hash;
pub mod mode;

pub use aes::Aes;
pub use algorithm::{ALGORITHMS, AlgorithmDescriptor, CipherFamily};
pub use des::{Des, KeySegments};
pub use hash::{HashAlgorithm, Mdc, digest, digest_repeated};
pub use mode::{CipherContext, CipherMode};

/// A keyed block transform.
///
/// Both methods transform exactly one block of [`BlockCipher::block_len`]
/// bytes in place. Callers guarantee the length; the mode driver only ever
/// hands out whole blocks.
pub trait BlockCipher {
    fn block_len(&self) -> usize;

    fn encrypt_block(&self, block: &mut [u8]);

    fn decrypt_block(&self, block: &mut [u8]);
}
