use crate::error::DecodeError;
use crate::wire::{read_uvarint, uvarint_len, write_uvarint};
use derive_more::{Deref, From, Into};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::io::{self, Write};

/// How a field's payload is framed on the wire.
///
/// Wire types 3 and 4 (groups) predate the observed format and are not
/// defined here; a tag carrying them is rejected as [`DecodeError::UnknownWireType`].
#[repr(u8)]
#[derive(PartialEq, Eq, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LenDelimited = 2,
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = DecodeError;
    fn try_from(int: u8) -> Result<Self, DecodeError> {
        WireType::from_u8(int).ok_or(DecodeError::UnknownWireType(int))
    }
}

/// A field's stable identifier within one message type.
///
/// Wire-compatible schema evolution may add new numbers but never reuses
/// or changes the meaning of an existing one.
#[derive(
    From, Into, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug,
)]
pub struct FieldNumber(pub u32);

/// The `(field_number << 3) | wire_type` header preceding each payload.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Tag {
    pub number: FieldNumber,
    pub wire_type: WireType,
}

impl Tag {
    pub fn new(number: impl Into<FieldNumber>, wire_type: WireType) -> Self {
        Self {
            number: number.into(),
            wire_type,
        }
    }

    fn to_raw(self) -> u64 {
        // to_u8 is total over the enum.
        let wt = self.wire_type.to_u8().unwrap();
        (u64::from(*self.number) << 3) | u64::from(wt)
    }

    pub fn wire_len(self) -> usize {
        uvarint_len(self.to_raw())
    }

    pub fn ser(self, w: &mut impl Write) -> Result<usize, io::Error> {
        write_uvarint(w, self.to_raw())
    }

    /// Reads one tag off the front of `buf`. Returns `(consumed, tag)`.
    pub fn read(buf: &[u8]) -> Result<(usize, Self), DecodeError> {
        let (r_len, raw) = read_uvarint(buf)?;
        let wire_type = WireType::try_from((raw & 0x7) as u8)?;
        // Tags fit in 32 bits in the standard format.
        let number =
            u32::try_from(raw >> 3).map_err(|_| DecodeError::OversizedFieldNumber(raw >> 3))?;
        if number == 0 {
            return Err(DecodeError::ZeroFieldNumber);
        }
        Ok((
            r_len,
            Self {
                number: FieldNumber(number),
                wire_type,
            },
        ))
    }
}
