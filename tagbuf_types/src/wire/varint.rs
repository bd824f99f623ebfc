use crate::error::DecodeError;
use std::io::{self, Write};

/// A `u64` spans at most 10 varint bytes. An 11th continuation byte is
/// malformed even if more input remains.
pub const MAX_VARINT_LEN: usize = 10;

pub fn uvarint_len(value: u64) -> usize {
    let data_bits = 64 - (value | 1).leading_zeros() as usize;
    (data_bits + 6) / 7
}

pub fn write_uvarint(w: &mut impl Write, mut value: u64) -> Result<usize, io::Error> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut i = 0;
    loop {
        if value < 0x80 {
            buf[i] = value as u8;
            i += 1;
            break;
        }
        buf[i] = (value as u8 & 0x7f) | 0x80;
        value >>= 7;
        i += 1;
    }
    w.write_all(&buf[..i])?;
    Ok(i)
}

/// Reads one varint off the front of `buf`. Returns `(consumed, value)`.
pub fn read_uvarint(buf: &[u8]) -> Result<(usize, u64), DecodeError> {
    let mut value = 0u64;
    for (i, byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(DecodeError::MalformedVarint);
        }
        // The 10th byte may only carry bit 63; anything above overflows u64.
        if i == MAX_VARINT_LEN - 1 && byte & 0x7e != 0 {
            return Err(DecodeError::MalformedVarint);
        }
        value |= u64::from(byte & 0x7f) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((i + 1, value));
        }
    }
    Err(DecodeError::MalformedVarint)
}
