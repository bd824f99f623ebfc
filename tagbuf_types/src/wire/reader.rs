use crate::error::DecodeError;
use crate::wire::{read_uvarint, Tag, WireType};

/// Bounds-checked cursor over one wire record.
///
/// A submessage is decoded through a nested `WireReader` over its declared
/// slice, so its boundary is enforced structurally: inner reads can never
/// touch outer bytes.
pub struct WireReader<'a> {
    buf: &'a [u8],
    read_pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, read_pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.read_pos
    }

    pub fn is_empty(&self) -> bool {
        self.read_pos >= self.buf.len()
    }

    pub fn read_uvarint(&mut self) -> Result<u64, DecodeError> {
        let (r_len, value) = read_uvarint(&self.buf[self.read_pos..])?;
        self.read_pos += r_len;
        Ok(value)
    }

    pub fn read_tag(&mut self) -> Result<Tag, DecodeError> {
        let (r_len, tag) = Tag::read(&self.buf[self.read_pos..])?;
        self.read_pos += r_len;
        Ok(tag)
    }

    pub fn read_fixed64(&mut self) -> Result<[u8; 8], DecodeError> {
        let bytes = self.read_exact(8)?;
        // read_exact returned exactly 8 bytes.
        Ok(bytes.try_into().unwrap())
    }

    pub fn read_fixed32(&mut self) -> Result<[u8; 4], DecodeError> {
        let bytes = self.read_exact(4)?;
        Ok(bytes.try_into().unwrap())
    }

    /// Reads a varint length prefix, then borrows exactly that many bytes.
    pub fn read_len_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let declared = self.read_uvarint()?;
        if declared > self.remaining() as u64 {
            return Err(DecodeError::TruncatedPayload {
                declared: declared as usize,
                remaining: self.remaining(),
            });
        }
        self.read_exact(declared as usize)
    }

    fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::TruncatedPayload {
                declared: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.read_pos..self.read_pos + len];
        self.read_pos += len;
        Ok(bytes)
    }

    /// Discards one payload according to the wire type's length rule.
    /// This is how a well-formed but unknown field number is tolerated.
    pub fn skip(&mut self, wire_type: WireType) -> Result<(), DecodeError> {
        match wire_type {
            WireType::Varint => {
                self.read_uvarint()?;
            }
            WireType::Fixed64 => {
                self.read_exact(8)?;
            }
            WireType::LenDelimited => {
                self.read_len_delimited()?;
            }
            WireType::Fixed32 => {
                self.read_exact(4)?;
            }
        }
        Ok(())
    }
}
