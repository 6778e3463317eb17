//! SweetPGP - passphrase-based OpenPGP file encryption.
//!
//! Reads and writes RFC 4880 messages made of a Symmetric-Key Encrypted
//! Session Key packet and an integrity protected data packet:
//! - AES-128/192/256 and Triple-DES implemented in [`cipher`]
//! - ECB, CBC, OFB and OpenPGP CFB modes with the quick check
//! - Simple, salted and iterated S2K key derivation in [`s2k`]
//! - A SHA-1 modification detection code over the plaintext

pub mod app;
pub mod cipher;
pub mod config;
pub mod error;
pub mod file;
pub mod packet;
pub mod padding;
pub mod processor;
pub mod s2k;
pub mod secret;
pub mod types;
pub mod ui;
