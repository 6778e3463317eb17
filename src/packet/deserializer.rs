//! Packet stream deserialization.
//!
//! Walks an in-memory buffer header by header. Each header is decoded at the
//! current offset, its body sliced out and handed to [`PacketBody::parse`].
//! Old-format packets of indeterminate length consume the rest of the input.

use tracing::debug;

use crate::error::{Error, Result};
use crate::packet::{Packet, PacketBody, PacketHeader};

pub struct Deserializer<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Deserializer<'a> {
    #[inline]
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0, failed: false }
    }

    /// Parses every packet in `data`.
    ///
    /// # Errors
    ///
    /// Returns the first header or body error encountered.
    pub fn parse(data: &'a [u8]) -> Result<Vec<Packet>> {
        Self::new(data).collect()
    }

    /// Current read position in the input.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn next_packet(&mut self) -> Result<Packet> {
        let header = PacketHeader::decode(self.data, self.offset)?;
        let body_start = self.offset + header.header_len();
        let available = self.data.len() - body_start.min(self.data.len());

        let body_len = match header.body_len() {
            Some(len) => usize::try_from(len).unwrap_or(usize::MAX),
            None => available,
        };
        if body_len > available {
            return Err(Error::Truncated { offset: body_start, expected: body_len, actual: available });
        }

        debug!(offset = self.offset, tag = header.tag().id(), header_len = header.header_len(), body_len, "packet");

        let body = PacketBody::parse(header.tag(), &self.data[body_start..body_start + body_len], body_start)?;
        self.offset = body_start + body_len;
        Ok(Packet::new(header, body))
    }
}

impl Iterator for Deserializer<'_> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let packet = self.next_packet();
        self.failed = packet.is_err();
        Some(packet)
    }
}
