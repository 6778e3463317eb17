use block_padding::array::typenum::{U8, U16, Unsigned};
use block_padding::array::{Array, ArraySize};
use block_padding::{Padding, Pkcs7};

use crate::error::{Error, Result};

/// Block sizes of the supported ciphers: 8 bytes for DES, 16 for AES.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockSize {
    B8,
    #[default]
    B16,
}

impl TryFrom<usize> for BlockSize {
    type Error = Error;

    fn try_from(len: usize) -> Result<Self> {
        match len {
            8 => Ok(Self::B8),
            16 => Ok(Self::B16),
            other => Err(Error::unsupported("block size", other)),
        }
    }
}

impl From<BlockSize> for usize {
    fn from(block_size: BlockSize) -> Self {
        match block_size {
            BlockSize::B8 => 8,
            BlockSize::B16 => 16,
        }
    }
}

/// PKCS#7 padding: every pad byte equals the pad length, 1..=block size.
/// Aligned input gains a whole block of padding.
pub struct Pkcs7Padding {
    block_size: BlockSize,
}

impl Pkcs7Padding {
    #[inline]
    #[must_use]
    pub const fn new(block_size: BlockSize) -> Self {
        Self { block_size }
    }

    pub fn pad(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.block_size {
            BlockSize::B8 => Self::pad_with::<U8>(data),
            BlockSize::B16 => Self::pad_with::<U16>(data),
        }
    }

    pub fn unpad(&self, data: &[u8]) -> Result<Vec<u8>> {
        let block_size: usize = self.block_size.into();
        if data.is_empty() {
            return Err(Error::Padding);
        }
        if !data.len().is_multiple_of(block_size) {
            return Err(Error::Alignment { len: data.len(), block_len: block_size });
        }

        match self.block_size {
            BlockSize::B8 => Self::unpad_with::<U8>(data),
            BlockSize::B16 => Self::unpad_with::<U16>(data),
        }
    }

    fn pad_with<B: ArraySize>(data: &[u8]) -> Result<Vec<u8>> {
        match Pkcs7::pad_detached::<B>(data) {
            block_padding::PaddedData::Pad { blocks, tail_block } => {
                let mut result = Vec::with_capacity(blocks.len() * B::USIZE + B::USIZE);
                for block in blocks {
                    result.extend_from_slice(block.as_slice());
                }
                result.extend_from_slice(tail_block.as_slice());
                Ok(result)
            }
            block_padding::PaddedData::NoPad { blocks } => Ok(blocks.iter().flat_map(|block| block.iter().copied()).collect()),
            block_padding::PaddedData::Error => Err(Error::Padding),
        }
    }

    fn unpad_with<B: ArraySize + Unsigned>(data: &[u8]) -> Result<Vec<u8>> {
        let blocks: Vec<Array<u8, B>> = data
            .chunks_exact(B::USIZE)
            .map(|chunk| {
                let mut block = Array::default();
                block.copy_from_slice(chunk);
                block
            })
            .collect();

        Ok(Pkcs7::unpad_blocks::<B>(&blocks).map_err(|_| Error::Padding)?.to_vec())
    }
}
