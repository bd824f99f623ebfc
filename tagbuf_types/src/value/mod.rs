//! In-memory message values, independent of any wire bytes.
//!
//! A [`MessageValue`] maps field numbers to [`Value`]s. A field absent
//! from the map reads as its kind's default; only message-kind fields
//! distinguish "unset" from "present but all-default" (presence is the
//! key existing in the map). Each value is a single-owner tree: nested
//! messages are owned by their parent, and schemas form a DAG, so no
//! cycles can occur.

use crate::schema::{FieldKind, MapKeyKind};
use crate::wire::FieldNumber;
use derive_more::{Deref, From, Into};
use std::collections::BTreeMap;

/// A raw enum ordinal. Ordinals the schema does not name are carried
/// verbatim; converting to a named variant is a separate, fallible step
/// through [`crate::schema::EnumDescriptor::name_of`].
#[derive(From, Into, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct EnumNumber(pub i32);

/// Keys of a map field. `BTreeMap` ordering over these makes a map's
/// entry iteration deterministic within and across serialization calls.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    Str(String),
}

impl MapKey {
    pub fn default_for(kind: MapKeyKind) -> Self {
        match kind {
            MapKeyKind::Bool => Self::Bool(false),
            MapKeyKind::Int32 => Self::I32(0),
            MapKeyKind::Int64 => Self::I64(0),
            MapKeyKind::Str => Self::Str(String::new()),
        }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    Bytes(Vec<u8>),
    Str(String),
    Enum(EnumNumber),
    Message(MessageValue),
    List(Vec<Value>),
    Map(BTreeMap<MapKey, Value>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "int32",
            Self::I64(_) => "int64",
            Self::F64(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::Str(_) => "string",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
            Self::List(_) => "repeated",
            Self::Map(_) => "map",
        }
    }

    /// The value an absent field of `kind` reads as.
    pub fn default_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Bool => Self::Bool(false),
            FieldKind::Int32 => Self::I32(0),
            FieldKind::Int64 => Self::I64(0),
            FieldKind::Double => Self::F64(0.0),
            FieldKind::Bytes => Self::Bytes(vec![]),
            FieldKind::Str => Self::Str(String::new()),
            FieldKind::Enum(_) => Self::Enum(EnumNumber(0)),
            FieldKind::Message(_) => Self::Message(MessageValue::new()),
            FieldKind::Map { .. } => Self::Map(BTreeMap::new()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(f) => Some(*f),
            _ => None,
        }
    }
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_enum(&self) -> Option<EnumNumber> {
        match self {
            Self::Enum(e) => Some(*e),
            _ => None,
        }
    }
    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(elems) => Some(elems),
            _ => None,
        }
    }
    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// One message instance: field number -> value.
///
/// Built empty, mutated field by field, then serialized. Decoding builds
/// a fresh one by replaying the wire record.
#[derive(PartialEq, Clone, Default, Debug)]
pub struct MessageValue {
    fields: BTreeMap<FieldNumber, Value>,
}

impl MessageValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, number: impl Into<FieldNumber>) -> Option<&Value> {
        self.fields.get(&number.into())
    }

    pub fn get_mut(&mut self, number: impl Into<FieldNumber>) -> Option<&mut Value> {
        self.fields.get_mut(&number.into())
    }

    /// Overwrites any previous value for the field.
    pub fn set(&mut self, number: impl Into<FieldNumber>, value: Value) {
        self.fields.insert(number.into(), value);
    }

    pub fn clear(&mut self, number: impl Into<FieldNumber>) {
        self.fields.remove(&number.into());
    }

    /// Appends to a repeated field, creating the list on first use.
    pub fn push(&mut self, number: impl Into<FieldNumber>, value: Value) {
        let slot = self
            .fields
            .entry(number.into())
            .or_insert_with(|| Value::List(vec![]));
        if let Value::List(elems) = slot {
            elems.push(value);
        } else {
            *slot = Value::List(vec![value]);
        }
    }

    /// Upserts one map entry, overwriting any existing value for the key.
    pub fn insert_entry(&mut self, number: impl Into<FieldNumber>, key: MapKey, value: Value) {
        let slot = self
            .fields
            .entry(number.into())
            .or_insert_with(|| Value::Map(BTreeMap::new()));
        if let Value::Map(map) = slot {
            map.insert(key, value);
        } else {
            *slot = Value::Map(BTreeMap::from([(key, value)]));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldNumber, &Value)> {
        self.fields.iter().map(|(number, value)| (*number, value))
    }
}
