//! Packet header codec (RFC 4880 section 4.2).
//!
//! Two layouts share the leading "cipher type byte" (CTB), whose high bit is
//! always set:
//!
//! - **Old format**: `10tttt ll`, a four-bit tag and a length type selecting
//!   1, 2 or 4 big-endian length octets, or an indeterminate length that runs
//!   to the end of the input.
//! - **New format**: `11tttttt`, a six-bit tag followed by a one, two or
//!   five-octet length.

use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::packet::Tag;

const CTB_ALWAYS_SET: u8 = 0x80;
const CTB_NEW_FORMAT: u8 = 0x40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Old,
    New,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    offset: usize,
    ctb: u8,
    tag: Tag,
    header_len: usize,
    body_len: Option<u32>,
    format: Format,
}

/// Old-format header length for a body of `len` bytes, CTB included.
#[inline]
#[must_use]
pub const fn old_header_len(len: u32) -> usize {
    if len < 256 {
        2
    } else if len < 65_536 {
        3
    } else {
        5
    }
}

/// Number of octets a new-format length field takes for a body of `len` bytes.
#[inline]
#[must_use]
pub const fn new_length_len(len: u32) -> usize {
    if len < 192 {
        1
    } else if len < 8384 {
        2
    } else {
        5
    }
}

fn body_len_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::Range { value: len as u64, min: 0, max: u64::from(u32::MAX) })
}

/// The `count` length octets following the CTB at `offset`.
fn length_octets(data: &[u8], offset: usize, count: usize) -> Result<&[u8]> {
    let start = offset + 1;
    let available = data.len().saturating_sub(start);
    if available < count {
        return Err(Error::Truncated { offset: start, expected: count, actual: available });
    }
    Ok(&data[start..start + count])
}

impl PacketHeader {
    /// New-format header for a body of `body_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] when the body does not fit a 32-bit length.
    pub fn new_format(tag: Tag, body_len: usize) -> Result<Self> {
        let len = body_len_u32(body_len)?;
        let ctb = CTB_ALWAYS_SET | CTB_NEW_FORMAT | (tag.id() & 0x3F);
        Ok(Self { offset: 0, ctb, tag, header_len: 1 + new_length_len(len), body_len: Some(len), format: Format::New })
    }

    /// Old-format header for a body of `body_len` bytes; the length type is
    /// picked by [`old_header_len`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] for tags above 15, which the old format
    /// cannot express, and [`Error::Range`] for bodies over 32 bits.
    pub fn old_format(tag: Tag, body_len: usize) -> Result<Self> {
        if tag.id() > 0x0F {
            return Err(Error::unsupported("old-format tag", tag.id()));
        }

        let len = body_len_u32(body_len)?;
        let header_len = old_header_len(len);
        let length_type = match header_len {
            2 => 0,
            3 => 1,
            _ => 2,
        };
        let ctb = CTB_ALWAYS_SET | (tag.id() << 2) | length_type;
        Ok(Self { offset: 0, ctb, tag, header_len, body_len: Some(len), format: Format::Old })
    }

    /// Decodes the header starting at `data[offset]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for a CTB without the high bit or a partial
    /// body length, and [`Error::Truncated`] when the length octets run past
    /// the end of `data`.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self> {
        let ctb = *data.get(offset).ok_or(Error::Truncated { offset, expected: 1, actual: 0 })?;
        if ctb & CTB_ALWAYS_SET == 0 {
            return Err(Error::format(offset, format!("invalid CTB 0x{ctb:02x}: high bit not set")));
        }

        if ctb & CTB_NEW_FORMAT == 0 {
            let tag = Tag::from((ctb & 0x3C) >> 2);
            let (header_len, body_len) = match ctb & 0x03 {
                0 => (2, Some(u32::from(length_octets(data, offset, 1)?[0]))),
                1 => {
                    let octets = length_octets(data, offset, 2)?;
                    (3, Some(u32::from(u16::from_be_bytes([octets[0], octets[1]]))))
                }
                2 => {
                    let octets = length_octets(data, offset, 4)?;
                    (5, Some(u32::from_be_bytes([octets[0], octets[1], octets[2], octets[3]])))
                }
                _ => (1, None),
            };
            return Ok(Self { offset, ctb, tag, header_len, body_len, format: Format::Old });
        }

        let tag = Tag::from(ctb & 0x3F);
        let first = length_octets(data, offset, 1)?[0];
        let (header_len, body_len) = match first {
            0..=191 => (2, u32::from(first)),
            192..=223 => {
                let second = length_octets(data, offset, 2)?[1];
                (3, ((u32::from(first) - 192) << 8) + u32::from(second) + 192)
            }
            255 => {
                let octets = length_octets(data, offset, 5)?;
                (6, u32::from_be_bytes([octets[1], octets[2], octets[3], octets[4]]))
            }
            _ => return Err(Error::format(offset, "partial body lengths are not supported")),
        };

        Ok(Self { offset, ctb, tag, header_len, body_len: Some(body_len), format: Format::New })
    }

    /// Serialises the header. Indeterminate old-format headers emit only the CTB.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_len);
        out.push(self.ctb);

        let Some(len) = self.body_len else {
            return out;
        };

        match (self.format, self.header_len) {
            (Format::Old, 2) => out.push(len.to_be_bytes()[3]),
            (Format::Old, 3) => out.extend_from_slice(&len.to_be_bytes()[2..]),
            (Format::Old, _) => out.extend_from_slice(&len.to_be_bytes()),
            (Format::New, 2) => out.push(len.to_be_bytes()[3]),
            (Format::New, 3) => {
                let first = ((len - 192) >> 8) + 192;
                let second = len - 192 - ((first - 192) << 8);
                out.push(first.to_be_bytes()[3]);
                out.push(second.to_be_bytes()[3]);
            }
            (Format::New, _) => {
                out.push(0xFF);
                out.extend_from_slice(&len.to_be_bytes());
            }
        }

        out
    }

    /// Byte offset of the CTB in the parsed input (0 for constructed headers).
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    #[must_use]
    pub const fn ctb(&self) -> u8 {
        self.ctb
    }

    #[inline]
    #[must_use]
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    /// Header length in bytes, CTB included.
    #[inline]
    #[must_use]
    pub const fn header_len(&self) -> usize {
        self.header_len
    }

    /// Body length, `None` for an indeterminate old-format packet.
    #[inline]
    #[must_use]
    pub const fn body_len(&self) -> Option<u32> {
        self.body_len
    }

    #[inline]
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }
}

impl Display for PacketHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "# off={} ctb={:02x} tag={} hlen={} plen=", self.offset, self.ctb, self.tag.id(), self.header_len)?;
        match self.body_len {
            Some(len) => write!(f, "{len}")?,
            None => f.write_str("indeterminate")?,
        }
        if self.format == Format::New {
            f.write_str(" new-ctb")?;
        }
        Ok(())
    }
}
