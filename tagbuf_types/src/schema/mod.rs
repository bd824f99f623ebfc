//! Field descriptors for message types, and the registry that holds them.
//!
//! A schema is data, not codegen: one [`MessageDescriptor`] per message
//! type, holding ordered [`FieldDescriptor`]s. Nested message and enum
//! kinds reference their target by full name; [`RegistryBuilder::build`]
//! refuses a registry with a dangling reference, so resolution failures
//! are load-time, never decode-time.

use crate::wire::{FieldNumber, WireType};
use std::collections::HashMap;

mod registry;
pub use registry::*;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// Key kinds a map field may declare. These are the kinds whose values
/// carry a total order and identity on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MapKeyKind {
    Bool,
    Int32,
    Int64,
    Str,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    Double,
    Bytes,
    Str,
    Enum(String),
    Message(String),
    Map {
        key: MapKeyKind,
        value: Box<FieldKind>,
    },
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::Str => "string",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
            Self::Map { .. } => "map",
        }
    }

    pub fn map(key: MapKeyKind, value: FieldKind) -> Self {
        Self::Map {
            key,
            value: Box::new(value),
        }
    }

    /// How one occurrence of this kind frames its payload.
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Bool | Self::Int32 | Self::Int64 | Self::Enum(_) => WireType::Varint,
            Self::Double => WireType::Fixed64,
            Self::Bytes | Self::Str | Self::Message(_) | Self::Map { .. } => {
                WireType::LenDelimited
            }
        }
    }
}

impl MapKeyKind {
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Bool | Self::Int32 | Self::Int64 => WireType::Varint,
            Self::Str => WireType::LenDelimited,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct FieldDescriptor {
    pub number: FieldNumber,
    pub name: String,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
}

impl FieldDescriptor {
    pub fn singular(number: u32, name: &str, kind: FieldKind) -> Self {
        Self {
            number: FieldNumber(number),
            name: String::from(name),
            kind,
            cardinality: Cardinality::Singular,
        }
    }

    pub fn repeated(number: u32, name: &str, kind: FieldKind) -> Self {
        Self {
            number: FieldNumber(number),
            name: String::from(name),
            kind,
            cardinality: Cardinality::Repeated,
        }
    }
}

/// Ordered field descriptors for one message type.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MessageDescriptor {
    full_name: String,
    fields: Vec<FieldDescriptor>,
    by_number: HashMap<FieldNumber, usize>,
}

impl MessageDescriptor {
    pub fn new(full_name: &str, fields: Vec<FieldDescriptor>) -> Self {
        let by_number = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.number, i))
            .collect();
        Self {
            full_name: String::from(full_name),
            fields,
            by_number,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Fields in declared order. Encoding walks this order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, number: FieldNumber) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|i| &self.fields[*i])
    }
}

/// Named ordinals for one enum type. Ordinal 0 is the default.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct EnumDescriptor {
    full_name: String,
    values: Vec<(String, i32)>,
}

impl EnumDescriptor {
    pub fn new(full_name: &str, values: Vec<(&str, i32)>) -> Self {
        Self {
            full_name: String::from(full_name),
            values: values
                .into_iter()
                .map(|(name, number)| (String::from(name), number))
                .collect(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn values(&self) -> &[(String, i32)] {
        &self.values
    }

    /// `None` for an ordinal this schema does not name. Such ordinals
    /// still round-trip through the codec verbatim.
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, n)| *n == number)
            .map(|(name, _)| name.as_str())
    }

    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, number)| *number)
    }
}
