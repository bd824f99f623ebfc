use std::io;
use thiserror::Error;

/// Fatal conditions while reading a wire record.
///
/// A well-formed tag whose field number is absent from the schema is *not*
/// an error; the decoder skips it. Each variant below aborts the whole
/// `deserialize` call, and no partially populated value escapes.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum DecodeError {
    #[error("varint continues past the end of input, or runs over 10 bytes")]
    MalformedVarint,

    #[error("length-delimited payload declares {declared} bytes but only {remaining} remain")]
    TruncatedPayload { declared: usize, remaining: usize },

    #[error("wire type {0} is not defined")]
    UnknownWireType(u8),

    #[error("string field payload is not valid utf-8")]
    InvalidUtf8,

    #[error("tag carries field number zero")]
    ZeroFieldNumber,

    #[error("tag carries field number {0}, which does not fit in 32 bits")]
    OversizedFieldNumber(u64),
}

/// Conditions while writing a wire record.
///
/// Encoding a value that conforms to its schema cannot fail; `KindMismatch`
/// is the guard that defines "conforms" at this boundary.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("field {field_name} of {message} holds a {actual} value where {expected} is declared")]
    KindMismatch {
        message: String,
        field_name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Conditions while assembling a `SchemaRegistry`.
///
/// Schema problems surface when the registry is built, never during
/// encode/decode of an individual value.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum SchemaError {
    #[error("type {0} is declared more than once")]
    DuplicateTypeName(String),

    #[error("message {message} declares field number {number} more than once")]
    DuplicateFieldNumber { message: String, number: u32 },

    #[error("message {message} declares field {field_name} with number zero")]
    ZeroFieldNumber { message: String, field_name: String },

    #[error("field {field_name} of {message} references undeclared type {referenced}")]
    UnresolvedTypeRef {
        message: String,
        field_name: String,
        referenced: String,
    },

    #[error("map field {field_name} of {message} may not be declared repeated")]
    RepeatedMap { message: String, field_name: String },

    #[error("map field {field_name} of {message} may not hold a map value")]
    NestedMap { message: String, field_name: String },

    #[error("type {0} is not registered")]
    UnknownType(String),
}
