//! Typed ledger messages built on the generic codec.
//!
//! Each type converts to and from the codec's [`MessageValue`] form and
//! serializes against the shared [`schema::registry`].
//!
//! [`MessageValue`]: tagbuf_types::value::MessageValue

mod account;
mod block;
mod convert;
mod node;
pub mod schema;
mod transaction;

pub use account::*;
pub use block::*;
pub use node::*;
pub use transaction::*;
