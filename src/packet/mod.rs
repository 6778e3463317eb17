//! OpenPGP packet codec.
//!
//! A file is a sequence of packets, each a [`PacketHeader`] followed by a
//! body. Only the packets needed for passphrase-based encryption get a typed
//! body; everything else is kept as raw bytes so it can still be listed.
//!
//! # Packet Layout of an Encrypted File
//!
//! ```text
//! [tag 3: Symmetric-Key Encrypted Session Key]  S2K specifier, old-format header
//! [tag 18: Sym. Encrypted Integrity Protected]  0x01 || CFB ciphertext, new-format header
//!     plaintext = prefix || quick check || [tag 11: Literal Data] || [tag 19: MDC]
//! ```

use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::s2k::S2kParams;

pub mod deserializer;
pub mod encrypted;
pub mod header;
pub mod literal;
pub mod serializer;
pub mod symkey;

pub use deserializer::Deserializer;
pub use encrypted::EncryptedData;
pub use header::{Format, PacketHeader};
pub use literal::LiteralData;
pub use serializer::Serializer;

/// Packet tags of RFC 4880 section 4.3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Reserved,
    PublicKeyEncryptedSessionKey,
    Signature,
    SymKeyEncryptedSessionKey,
    OnePassSignature,
    SecretKey,
    PublicKey,
    SecretSubkey,
    CompressedData,
    SymEncryptedData,
    Marker,
    LiteralData,
    Trust,
    UserId,
    PublicSubkey,
    UserAttribute,
    SymEncryptedIntegrityProtectedData,
    ModificationDetectionCode,
    Unknown(u8),
}

impl Tag {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Reserved => 0,
            Self::PublicKeyEncryptedSessionKey => 1,
            Self::Signature => 2,
            Self::SymKeyEncryptedSessionKey => 3,
            Self::OnePassSignature => 4,
            Self::SecretKey => 5,
            Self::PublicKey => 6,
            Self::SecretSubkey => 7,
            Self::CompressedData => 8,
            Self::SymEncryptedData => 9,
            Self::Marker => 10,
            Self::LiteralData => 11,
            Self::Trust => 12,
            Self::UserId => 13,
            Self::PublicSubkey => 14,
            Self::UserAttribute => 17,
            Self::SymEncryptedIntegrityProtectedData => 18,
            Self::ModificationDetectionCode => 19,
            Self::Unknown(id) => id,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::PublicKeyEncryptedSessionKey => "public-key encrypted session key",
            Self::Signature => "signature",
            Self::SymKeyEncryptedSessionKey => "symmetric-key encrypted session key",
            Self::OnePassSignature => "one-pass signature",
            Self::SecretKey => "secret key",
            Self::PublicKey => "public key",
            Self::SecretSubkey => "secret subkey",
            Self::CompressedData => "compressed data",
            Self::SymEncryptedData => "symmetrically encrypted data",
            Self::Marker => "marker",
            Self::LiteralData => "literal data",
            Self::Trust => "trust",
            Self::UserId => "user id",
            Self::PublicSubkey => "public subkey",
            Self::UserAttribute => "user attribute",
            Self::SymEncryptedIntegrityProtectedData => "encrypted data (integrity protected)",
            Self::ModificationDetectionCode => "modification detection code",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<u8> for Tag {
    fn from(id: u8) -> Self {
        match id {
            0 => Self::Reserved,
            1 => Self::PublicKeyEncryptedSessionKey,
            2 => Self::Signature,
            3 => Self::SymKeyEncryptedSessionKey,
            4 => Self::OnePassSignature,
            5 => Self::SecretKey,
            6 => Self::PublicKey,
            7 => Self::SecretSubkey,
            8 => Self::CompressedData,
            9 => Self::SymEncryptedData,
            10 => Self::Marker,
            11 => Self::LiteralData,
            12 => Self::Trust,
            13 => Self::UserId,
            14 => Self::PublicSubkey,
            17 => Self::UserAttribute,
            18 => Self::SymEncryptedIntegrityProtectedData,
            19 => Self::ModificationDetectionCode,
            other => Self::Unknown(other),
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketBody {
    SymKeyEncrypted(S2kParams),
    EncryptedData(EncryptedData),
    LiteralData(LiteralData),
    Raw(Vec<u8>),
}

impl PacketBody {
    /// Decodes a body according to its tag; `offset` locates it for errors.
    pub fn parse(tag: Tag, body: &[u8], offset: usize) -> Result<Self> {
        Ok(match tag {
            Tag::SymKeyEncryptedSessionKey => Self::SymKeyEncrypted(S2kParams::from_packet_body(body, offset)?),
            Tag::SymEncryptedIntegrityProtectedData => Self::EncryptedData(EncryptedData::from_bytes(body, offset)?),
            Tag::LiteralData => Self::LiteralData(LiteralData::from_bytes(body, offset)?),
            _ => Self::Raw(body.to_vec()),
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::SymKeyEncrypted(params) => params.to_packet_body(),
            Self::EncryptedData(data) => data.to_bytes(),
            Self::LiteralData(data) => data.to_bytes(),
            Self::Raw(bytes) => bytes.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    header: PacketHeader,
    body: PacketBody,
}

impl Packet {
    #[inline]
    #[must_use]
    pub const fn new(header: PacketHeader, body: PacketBody) -> Self {
        Self { header, body }
    }

    /// S2K packet with an old-format header, as GnuPG writes it.
    pub fn symkey(params: S2kParams) -> Result<Self> {
        let body = PacketBody::SymKeyEncrypted(params);
        Ok(Self::new(PacketHeader::old_format(Tag::SymKeyEncryptedSessionKey, body.to_bytes().len())?, body))
    }

    /// Literal Data packet with an old-format header.
    pub fn literal(data: LiteralData) -> Result<Self> {
        let header = PacketHeader::old_format(Tag::LiteralData, data.body_len())?;
        Ok(Self::new(header, PacketBody::LiteralData(data)))
    }

    /// SEIP packet with a new-format header.
    pub fn encrypted(data: EncryptedData) -> Result<Self> {
        let header = PacketHeader::new_format(Tag::SymEncryptedIntegrityProtectedData, data.body_len())?;
        Ok(Self::new(header, PacketBody::EncryptedData(data)))
    }

    #[inline]
    #[must_use]
    pub const fn header(&self) -> &PacketHeader {
        &self.header
    }

    #[inline]
    #[must_use]
    pub const fn body(&self) -> &PacketBody {
        &self.body
    }

    #[inline]
    #[must_use]
    pub fn into_body(self) -> PacketBody {
        self.body
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header.to_bytes();
        out.extend_from_slice(&self.body.to_bytes());
        out
    }

    /// Header line in `gpg --list-packets` style, followed by a one-line
    /// summary of the body for the packet types this crate understands.
    #[must_use]
    pub fn listing(&self) -> String {
        let detail = match &self.body {
            PacketBody::SymKeyEncrypted(params) => {
                let mut line = format!(":symkey enc packet: version 4, cipher {}, s2k {}, hash {}", params.algorithm().name, params.mode().id(), params.hash());
                if let Some(salt) = params.salt() {
                    line.push_str(&format!(", salt {}", hex::encode(salt)));
                }
                if let Some(count) = params.iterations() {
                    line.push_str(&format!(", count {count}"));
                }
                line
            }
            PacketBody::EncryptedData(data) => format!(":encrypted data packet: version {}, length {}, mdc", data.version(), data.ciphertext().len()),
            PacketBody::LiteralData(data) => format!(":literal data packet: mode {}, name \"{}\", created {}, {} bytes", char::from(data.format()), data.filename_lossy(), data.timestamp(), data.content().len()),
            PacketBody::Raw(bytes) => format!(":{} packet: {} bytes", self.header.tag().name(), bytes.len()),
        };
        format!("{}\n{detail}", self.header)
    }
}

/// The two packets a passphrase-encrypted file is made of.
#[derive(Debug)]
pub struct Message {
    pub s2k: S2kParams,
    pub encrypted: EncryptedData,
}

impl Message {
    /// Picks the first S2K packet and the first SEIP packet out of a parsed
    /// packet stream. Other packets (markers, for instance) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPacket`] when either packet is absent and
    /// [`Error::Unsupported`] for data encrypted without an MDC (tag 9).
    pub fn categorize(packets: Vec<Packet>) -> Result<Self> {
        let mut s2k = None;
        let mut encrypted = None;
        let mut legacy = false;

        for packet in packets {
            let tag = packet.header().tag();
            match packet.into_body() {
                PacketBody::SymKeyEncrypted(params) if s2k.is_none() => s2k = Some(params),
                PacketBody::EncryptedData(data) if encrypted.is_none() => encrypted = Some(data),
                _ if tag == Tag::SymEncryptedData => legacy = true,
                _ => {}
            }
        }

        let s2k = s2k.ok_or(Error::MissingPacket("symmetric-key encrypted session key"))?;
        let encrypted = match encrypted {
            Some(data) => data,
            None if legacy => return Err(Error::unsupported("packet", "data without modification detection (tag 9)")),
            None => return Err(Error::MissingPacket("integrity protected encrypted data")),
        };

        Ok(Self { s2k, encrypted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{AlgorithmDescriptor, HashAlgorithm};

    fn params() -> S2kParams {
        S2kParams::iterated(AlgorithmDescriptor::from_id(9).unwrap(), HashAlgorithm::Sha256, [7u8; 8], 96)
    }

    #[test]
    fn test_tag_ids() {
        for id in 0..=63u8 {
            assert_eq!(Tag::from(id).id(), id);
        }
        assert_eq!(Tag::from(18), Tag::SymEncryptedIntegrityProtectedData);
        assert_eq!(Tag::from(15), Tag::Unknown(15));
        assert_eq!(Tag::LiteralData.to_string(), "literal data (11)");
    }

    #[test]
    fn test_symkey_packet_bytes() {
        let packet = Packet::symkey(params()).unwrap();
        let bytes = packet.to_bytes();
        assert_eq!(bytes[..6], [0x8C, 0x0D, 0x04, 0x09, 0x03, 0x08]);
        assert_eq!(bytes[6..14], [7u8; 8]);
        assert_eq!(bytes[14], 96);
        assert_eq!(bytes.len(), 15);
    }

    #[test]
    fn test_listing() {
        let listing = Packet::symkey(params()).unwrap().listing();
        let mut lines = listing.lines();
        assert_eq!(lines.next(), Some("# off=0 ctb=8c tag=3 hlen=2 plen=13"));
        assert_eq!(lines.next(), Some(":symkey enc packet: version 4, cipher AES256, s2k 3, hash SHA256, salt 0707070707070707, count 65536"));

        let raw = Packet::new(PacketHeader::new_format(Tag::Marker, 3).unwrap(), PacketBody::Raw(b"PGP".to_vec()));
        assert!(raw.listing().ends_with(":marker packet: 3 bytes"));
    }

    #[test]
    fn test_categorize() {
        let packets = vec![Packet::symkey(params()).unwrap(), Packet::encrypted(EncryptedData::new(vec![1, 2, 3])).unwrap()];
        let message = Message::categorize(packets).unwrap();
        assert_eq!(message.s2k, params());
        assert_eq!(message.encrypted.ciphertext(), &[1, 2, 3]);
    }

    #[test]
    fn test_categorize_missing_packets() {
        let only_s2k = vec![Packet::symkey(params()).unwrap()];
        assert!(matches!(Message::categorize(only_s2k), Err(Error::MissingPacket(_))));

        let only_data = vec![Packet::encrypted(EncryptedData::new(vec![1])).unwrap()];
        assert!(matches!(Message::categorize(only_data), Err(Error::MissingPacket(_))));
    }

    #[test]
    fn test_categorize_rejects_legacy_encrypted_data() {
        let header = PacketHeader::new_format(Tag::SymEncryptedData, 3).unwrap();
        let legacy = Packet::new(header, PacketBody::Raw(vec![1, 2, 3]));
        let result = Message::categorize(vec![Packet::symkey(params()).unwrap(), legacy]);
        assert!(matches!(result, Err(Error::Unsupported { .. })));
    }
}
