//! The codec engine: a schema-driven encoder and decoder pair.
//!
//! Exactly two operations exist at this boundary per message type:
//! [`serialize`] and [`deserialize`]. Both are synchronous, bounded by
//! input size alone, and share nothing mutable; encoding and decoding of
//! independent values may run fully in parallel.

mod codec_test;
mod decode;
mod encode;

pub use decode::*;
pub use encode::*;
