//! # Wire format
//!
//! A wire record is nothing but the concatenation of per-field segments.
//! There is no magic header, no overall length prefix, and no checksum.
//!
//! Every segment starts with a `tag`, a varint holding
//! `(field_number << 3) | wire_type`. The low three bits select how the
//! payload that follows is framed.
//!
//! ```text
//! segment (wire_type = 0, varint):
//!     tag:        varint,
//!     payload:    varint,             // bool / int32 / int64 / enum
//!
//! segment (wire_type = 1, fixed64):
//!     tag:        varint,
//!     payload:    [u8; 8],            // double, little-endian
//!
//! segment (wire_type = 2, length-delimited):
//!     tag:        varint,
//!     len:        varint,
//!     payload:    [u8; len],          // string / bytes / submessage / map entry
//!
//! segment (wire_type = 5, fixed32):
//!     tag:        varint,
//!     payload:    [u8; 4],            // skippable; no field kind produces it
//! ```
//!
//! A varint carries 7 data bits per byte, least-significant group first;
//! the high bit of each byte signals continuation. A `u64` therefore
//! never takes more than 10 bytes.
//!
//! Submessages and map entries are ordinary wire records nested inside a
//! length-delimited payload. Decoding one stops at its declared length
//! boundary regardless of what follows in the outer record.

mod reader;
mod tag;
mod varint;

pub use reader::*;
pub use tag::*;
pub use varint::*;
