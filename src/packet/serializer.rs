use std::io::Write;

use crate::error::Result;
use crate::packet::Packet;

/// Writes packets, header then body, to any [`Write`] sink.
pub struct Serializer<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> Serializer<W> {
    #[inline]
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn write(&mut self, packet: &Packet) -> Result<()> {
        let bytes = packet.to_bytes();
        self.writer.write_all(&bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    /// Total bytes written so far.
    #[inline]
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{EncryptedData, Tag};

    #[test]
    fn test_writes_header_and_body() {
        let mut serializer = Serializer::new(Vec::new());
        serializer.write(&Packet::encrypted(EncryptedData::new(vec![0xEE; 3])).unwrap()).unwrap();
        assert_eq!(serializer.written(), 6);

        let bytes = serializer.into_inner().unwrap();
        assert_eq!(bytes, vec![0xC0 | Tag::SymEncryptedIntegrityProtectedData.id(), 0x04, 0x01, 0xEE, 0xEE, 0xEE]);
    }
}
