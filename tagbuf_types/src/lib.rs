//! Schema-driven codec for a protobuf-style wire format.
//!
//! The engine is generic: one encoder/decoder pair driven by runtime
//! [`schema`] descriptors, instead of one emitted accessor set per
//! message type. Typed call sites live in wrapper crates layered on top.
//!
//! See [`wire`] for the byte-level format and [`codec`] for the
//! serialize/deserialize operations.

pub mod codec;
mod error;
pub mod schema;
pub mod value;
pub mod wire;

pub use codec::{deserialize, serialize};
pub use error::*;
