//! Encryption and decryption pipeline.
//!
//! [`Encryptor`] and [`Decryptor`] work on in-memory byte buffers and return
//! the library [`Result`]; [`Processor`] wraps them with file I/O and
//! `anyhow` context for the CLI.
//!
//! # Encrypted Plaintext Layout
//!
//! ```text
//! random prefix (block_len) | prefix[block_len-2..] | literal packet | 0xD3 0x14 | SHA-1
//! ```
//!
//! The SHA-1 covers everything before it, the MDC header included. The whole
//! buffer is encrypted in OpenPGP CFB mode and stored in a tag 18 packet,
//! preceded by the tag 3 packet holding the S2K specifier.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::cipher::{AlgorithmDescriptor, CipherContext, HashAlgorithm, Mdc};
use crate::config::{DEFAULT_S2K_COUNT, MDC_LEN, QUICK_CHECK_LEN};
use crate::error::{Error, Result};
use crate::file::File;
use crate::packet::{Deserializer, EncryptedData, LiteralData, Message, Packet, PacketBody, PacketHeader, Serializer, Tag};
use crate::s2k::derive::fill_random;
use crate::s2k::{Derive, S2kMode, S2kParams};
use crate::secret::Secret;
use crate::types::{Integrity, IntegrityPolicy, ProcessorMode};

/// Length of the MDC packet inside the plaintext: two header octets plus the hash.
const MDC_PACKET_LEN: usize = 2 + MDC_LEN;

/// Encryption settings chosen on the command line.
#[derive(Clone, Copy, Debug)]
pub struct EncryptOptions {
    pub algorithm: &'static AlgorithmDescriptor,
    pub s2k_mode: S2kMode,
    pub hash: HashAlgorithm,
    pub count: u32,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self { algorithm: &crate::cipher::ALGORITHMS[3], s2k_mode: S2kMode::IteratedSalted, hash: HashAlgorithm::Sha256, count: DEFAULT_S2K_COUNT }
    }
}

pub struct Encryptor {
    options: EncryptOptions,
}

impl Encryptor {
    #[inline]
    #[must_use]
    pub const fn new(options: EncryptOptions) -> Self {
        Self { options }
    }

    /// Encrypts `content` into a complete OpenPGP message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] for an unencodable S2K count or an overlong
    /// filename, and [`Error::Random`] if the OS RNG fails.
    pub fn encrypt(&self, passphrase: &[u8], filename: &str, timestamp: u32, content: &[u8]) -> Result<Vec<u8>> {
        let EncryptOptions { algorithm, s2k_mode, hash, count } = self.options;
        let params = S2kParams::generate(algorithm, hash, s2k_mode, count)?;
        let key = Derive::new(passphrase).derive_key(&params, algorithm.key_len);

        info!(algorithm = algorithm.name, s2k = %s2k_mode, %hash, iterations = ?params.iterations(), size = content.len(), "encrypting");

        let mut plaintext = vec![0u8; algorithm.block_len];
        fill_random(&mut plaintext)?;
        plaintext.extend_from_within(algorithm.block_len - QUICK_CHECK_LEN..);

        let literal = Packet::literal(LiteralData::new(filename, timestamp, content.to_vec())?)?;
        plaintext.extend_from_slice(&literal.to_bytes());
        plaintext.extend_from_slice(&PacketHeader::new_format(Tag::ModificationDetectionCode, MDC_LEN)?.to_bytes());
        let mdc = Mdc::new(&plaintext);
        plaintext.extend_from_slice(mdc.as_bytes());

        let ciphertext = CipherContext::openpgp(algorithm.new_cipher(key.expose_secret())?).encrypt(&plaintext)?;
        debug!(plaintext_len = plaintext.len(), ciphertext_len = ciphertext.len(), "plaintext encrypted");

        let mut serializer = Serializer::new(Vec::new());
        serializer.write(&Packet::symkey(params)?)?;
        serializer.write(&Packet::encrypted(EncryptedData::new(ciphertext))?)?;
        serializer.into_inner()
    }
}

/// A parsed message waiting for its passphrase.
pub struct Decryptor {
    message: Message,
}

impl Decryptor {
    /// Parses and categorises the packet stream. Nothing is decrypted yet, so
    /// malformed input is rejected before a passphrase is asked for.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let message = Message::categorize(Deserializer::parse(data)?)?;
        Ok(Self { message })
    }

    #[inline]
    #[must_use]
    pub const fn s2k(&self) -> &S2kParams {
        &self.message.s2k
    }

    /// Decrypts the message and extracts its literal data.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyMismatch`] when the quick check fails (wrong passphrase)
    /// - [`Error::Integrity`] on an MDC mismatch under [`IntegrityPolicy::Strict`]
    /// - [`Error::Truncated`] / [`Error::Format`] for a malformed plaintext
    pub fn decrypt(&self, passphrase: &[u8], policy: IntegrityPolicy) -> Result<Decrypted> {
        let params = &self.message.s2k;
        let algorithm = params.algorithm();
        let key = Derive::new(passphrase).derive_key(params, algorithm.key_len);

        let mut context = CipherContext::openpgp(algorithm.new_cipher(key.expose_secret())?);
        let plaintext = context.decrypt(self.message.encrypted.ciphertext())?;

        let prefix_len = algorithm.block_len + QUICK_CHECK_LEN;
        if plaintext.len() < prefix_len + MDC_PACKET_LEN {
            return Err(Error::Truncated { offset: 0, expected: prefix_len + MDC_PACKET_LEN, actual: plaintext.len() });
        }

        let integrity = check_mdc(&plaintext)?;
        match (integrity, policy) {
            (Integrity::Ok, _) => debug!("modification detection code verified"),
            (Integrity::Mismatch, IntegrityPolicy::Strict) => return Err(Error::Integrity),
            (Integrity::Mismatch, IntegrityPolicy::Warn) => warn!("modification detection code mismatch: the decrypted data may have been modified"),
        }

        let inner = &plaintext[prefix_len..plaintext.len() - MDC_PACKET_LEN];
        let literal = match Deserializer::new(inner).next().transpose()?.map(Packet::into_body) {
            Some(PacketBody::LiteralData(literal)) => literal,
            _ => return Err(Error::MissingPacket("literal data")),
        };

        info!(algorithm = algorithm.name, filename = %literal.filename_lossy(), size = literal.content().len(), %integrity, "decrypted");
        Ok(Decrypted { s2k: params.clone(), literal, integrity })
    }
}

/// Compares the trailing MDC packet against the SHA-1 of everything before
/// its hash. A damaged MDC header counts as a mismatch.
fn check_mdc(plaintext: &[u8]) -> Result<Integrity> {
    let split = plaintext.len() - MDC_LEN;
    let header = PacketHeader::new_format(Tag::ModificationDetectionCode, MDC_LEN)?.to_bytes();
    let header_ok = plaintext[split - header.len()..split] == header[..];

    if header_ok && Mdc::new(&plaintext[..split]).matches(&plaintext[split..]) {
        Ok(Integrity::Ok)
    } else {
        Ok(Integrity::Mismatch)
    }
}

/// Result of a successful decryption, carrying everything the report shows.
#[derive(Debug)]
pub struct Decrypted {
    s2k: S2kParams,
    literal: LiteralData,
    integrity: Integrity,
}

impl Decrypted {
    #[inline]
    #[must_use]
    pub const fn algorithm_name(&self) -> &'static str {
        self.s2k.algorithm().name
    }

    #[inline]
    #[must_use]
    pub const fn s2k_mode(&self) -> S2kMode {
        self.s2k.mode()
    }

    #[inline]
    #[must_use]
    pub fn iterations(&self) -> Option<u32> {
        self.s2k.iterations()
    }

    #[inline]
    #[must_use]
    pub fn hash_name(&self) -> &'static str {
        self.s2k.hash().name()
    }

    #[inline]
    #[must_use]
    pub fn filename(&self) -> String {
        self.literal.filename_lossy()
    }

    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        self.literal.timestamp()
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &[u8] {
        self.literal.content()
    }

    #[inline]
    #[must_use]
    pub const fn integrity(&self) -> Integrity {
        self.integrity
    }
}

/// File-level entry points used by the CLI.
pub struct Processor;

impl Processor {
    /// Encrypts `input` into `output`, storing the input's file name and
    /// modification time in the literal packet.
    pub fn encrypt_file(input: &File, output: &File, passphrase: &Secret, options: EncryptOptions) -> anyhow::Result<()> {
        let content = input.read_all()?;
        let timestamp = input.modified_timestamp()?;

        let message = Encryptor::new(options)
            .encrypt(passphrase.as_bytes(), &input.file_name(), timestamp, &content)
            .with_context(|| format!("failed to encrypt {}", input.path().display()))?;

        output.write_all(&message)
    }

    /// Decrypts `input`. Without an explicit `output` the plaintext goes next
    /// to the input under the name stored in the literal packet, falling back
    /// to the input name minus `.gpg` when that name is unusable.
    pub fn decrypt_file(input: &File, output: Option<&Path>, passphrase: &Secret, policy: IntegrityPolicy) -> anyhow::Result<(PathBuf, Decrypted)> {
        let data = input.read_all()?;
        let decryptor = Decryptor::parse(&data).with_context(|| format!("failed to parse {}", input.path().display()))?;
        Self::decrypt_parsed(input, &decryptor, output, passphrase, policy)
    }

    /// Second half of [`Processor::decrypt_file`], for callers that parsed
    /// the input before prompting for the passphrase.
    pub fn decrypt_parsed(input: &File, decryptor: &Decryptor, output: Option<&Path>, passphrase: &Secret, policy: IntegrityPolicy) -> anyhow::Result<(PathBuf, Decrypted)> {
        let decrypted = decryptor.decrypt(passphrase.as_bytes(), policy).with_context(|| format!("failed to decrypt {}", input.path().display()))?;

        let path = match output {
            Some(path) => path.to_path_buf(),
            None => input.sibling(&decrypted.filename()).unwrap_or_else(|| input.output_path(ProcessorMode::Decrypt)),
        };
        if path == input.path() {
            anyhow::bail!("refusing to overwrite the input file: {}", path.display());
        }

        File::new(&path).write_all(decrypted.content())?;
        Ok((path, decrypted))
    }
}
