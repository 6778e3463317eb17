//! Literal Data packet body (tag 11).
//!
//! ```text
//! format (b'b') | filename length | filename | mtime: u32 BE | content
//! ```

use crate::config::{LITERAL_FORMAT_BINARY, MAX_FILENAME_LENGTH};
use crate::error::{Error, Result};

const FIXED_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralData {
    format: u8,
    filename: Vec<u8>,
    timestamp: u32,
    content: Vec<u8>,
}

impl LiteralData {
    /// Binary literal data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] when the filename does not fit its one-octet
    /// length field.
    pub fn new(filename: impl Into<Vec<u8>>, timestamp: u32, content: Vec<u8>) -> Result<Self> {
        let filename = filename.into();
        if filename.len() > MAX_FILENAME_LENGTH {
            return Err(Error::Range { value: filename.len() as u64, min: 0, max: MAX_FILENAME_LENGTH as u64 });
        }
        Ok(Self { format: LITERAL_FORMAT_BINARY, filename, timestamp, content })
    }

    pub fn from_bytes(body: &[u8], offset: usize) -> Result<Self> {
        if body.len() < 2 {
            return Err(Error::Truncated { offset, expected: FIXED_LEN, actual: body.len() });
        }

        let format = body[0];
        if !matches!(format, b'b' | b't' | b'u') {
            return Err(Error::format(offset, format!("unknown literal data format 0x{format:02x}")));
        }

        let name_len = usize::from(body[1]);
        let expected = FIXED_LEN + name_len;
        if body.len() < expected {
            return Err(Error::Truncated { offset, expected, actual: body.len() });
        }

        let filename = body[2..2 + name_len].to_vec();
        let time = &body[2 + name_len..expected];
        let timestamp = u32::from_be_bytes([time[0], time[1], time[2], time[3]]);

        Ok(Self { format, filename, timestamp, content: body[expected..].to_vec() })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body_len());
        out.push(self.format);
        // Length checked in `new`; parsed names come from a one-octet field.
        out.push(u8::try_from(self.filename.len()).unwrap_or(u8::MAX));
        out.extend_from_slice(&self.filename);
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.content);
        out
    }

    #[inline]
    #[must_use]
    pub fn body_len(&self) -> usize {
        FIXED_LEN + self.filename.len() + self.content.len()
    }

    #[inline]
    #[must_use]
    pub const fn format(&self) -> u8 {
        self.format
    }

    #[inline]
    #[must_use]
    pub fn filename(&self) -> &[u8] {
        &self.filename
    }

    #[must_use]
    pub fn filename_lossy(&self) -> String {
        String::from_utf8_lossy(&self.filename).into_owned()
    }

    /// Modification time in seconds since the Unix epoch.
    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        self.timestamp
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}
