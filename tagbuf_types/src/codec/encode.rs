use crate::error::EncodeError;
use crate::schema::{
    Cardinality, FieldDescriptor, FieldKind, MapKeyKind, MessageDescriptor, SchemaRegistry,
};
use crate::value::{MapKey, MessageValue, Value};
use crate::wire::{uvarint_len, write_uvarint, Tag};
use derive_more::Deref;
use std::io::Write;

#[derive(Deref)]
pub struct WriteLen(pub usize);

/// Serializes `msg` against `desc`. A sizing pass runs first so nested
/// length prefixes are known up front and the output is built in one
/// allocation.
pub fn serialize(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    msg: &MessageValue,
) -> Result<Vec<u8>, EncodeError> {
    let len = message_len(registry, desc, msg)?;
    let mut buf: Vec<u8> = Vec::with_capacity(len);
    let w_len = write_message(registry, desc, msg, &mut buf)?;
    debug_assert_eq!(len, *w_len);
    Ok(buf)
}

/// Total encoded size of `msg`: the sum of per-field contributions.
pub fn message_len(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    msg: &MessageValue,
) -> Result<usize, EncodeError> {
    let mut len = 0;
    for field in desc.fields() {
        if let Some(value) = msg.get(field.number) {
            len += field_len(registry, desc, field, value)?;
        }
    }
    Ok(len)
}

pub fn write_message(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    msg: &MessageValue,
    w: &mut impl Write,
) -> Result<WriteLen, EncodeError> {
    let mut w_len = 0;
    /* fields, in the schema's declared order */
    for field in desc.fields() {
        if let Some(value) = msg.get(field.number) {
            w_len += write_field(registry, desc, field, value, w)?;
        }
    }
    Ok(WriteLen(w_len))
}

fn field_len(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    value: &Value,
) -> Result<usize, EncodeError> {
    match (&field.kind, value) {
        (FieldKind::Map { key, value: val_kind }, Value::Map(map)) => {
            let mut len = 0;
            for (map_key, map_val) in map {
                let entry_len = entry_len(registry, desc, field, *key, val_kind, map_key, map_val)?;
                len += tag_len(field) + uvarint_len(entry_len as u64) + entry_len;
            }
            Ok(len)
        }
        (FieldKind::Map { .. }, other) => Err(mismatch(desc, field, "map", other)),
        _ => match field.cardinality {
            Cardinality::Repeated => match value {
                Value::List(elems) => {
                    let mut len = 0;
                    for elem in elems {
                        len += tag_len(field)
                            + payload_len(registry, desc, field, &field.kind, elem)?;
                    }
                    Ok(len)
                }
                other => Err(mismatch(desc, field, "repeated", other)),
            },
            Cardinality::Singular => {
                if is_default(&field.kind, value) {
                    return Ok(0);
                }
                Ok(tag_len(field) + payload_len(registry, desc, field, &field.kind, value)?)
            }
        },
    }
}

fn write_field(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    value: &Value,
    w: &mut impl Write,
) -> Result<usize, EncodeError> {
    match (&field.kind, value) {
        (FieldKind::Map { key, value: val_kind }, Value::Map(map)) => {
            let mut w_len = 0;
            /* one synthetic (key = 1, value = 2) entry submessage per pair */
            for (map_key, map_val) in map {
                let entry_len = entry_len(registry, desc, field, *key, val_kind, map_key, map_val)?;
                w_len += write_tag(field, w)?;
                w_len += write_uvarint(w, entry_len as u64)?;
                w_len += write_entry(registry, desc, field, *key, val_kind, map_key, map_val, w)?;
            }
            Ok(w_len)
        }
        (FieldKind::Map { .. }, other) => Err(mismatch(desc, field, "map", other)),
        _ => match field.cardinality {
            Cardinality::Repeated => match value {
                Value::List(elems) => {
                    let mut w_len = 0;
                    /* one tag + payload per element, in list order */
                    for elem in elems {
                        w_len += write_tag(field, w)?;
                        w_len += write_payload(registry, desc, field, &field.kind, elem, w)?;
                    }
                    Ok(w_len)
                }
                other => Err(mismatch(desc, field, "repeated", other)),
            },
            Cardinality::Singular => {
                /* scalar fields at default value are not serialized;
                 * message fields are gated on presence, checked by the caller */
                if is_default(&field.kind, value) {
                    return Ok(0);
                }
                let mut w_len = write_tag(field, w)?;
                w_len += write_payload(registry, desc, field, &field.kind, value, w)?;
                Ok(w_len)
            }
        },
    }
}

/// Size of one occurrence's payload (everything after the tag).
fn payload_len(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    kind: &FieldKind,
    value: &Value,
) -> Result<usize, EncodeError> {
    match (kind, value) {
        (FieldKind::Bool, Value::Bool(b)) => Ok(uvarint_len(u64::from(*b))),
        (FieldKind::Int32, Value::I32(i)) => Ok(uvarint_len(*i as i64 as u64)),
        (FieldKind::Int64, Value::I64(i)) => Ok(uvarint_len(*i as u64)),
        (FieldKind::Enum(_), Value::Enum(e)) => Ok(uvarint_len(**e as i64 as u64)),
        (FieldKind::Double, Value::F64(_)) => Ok(8),
        (FieldKind::Bytes, Value::Bytes(b)) => Ok(uvarint_len(b.len() as u64) + b.len()),
        (FieldKind::Str, Value::Str(s)) => {
            Ok(uvarint_len(s.as_bytes().len() as u64) + s.as_bytes().len())
        }
        (FieldKind::Message(referenced), Value::Message(nested)) => {
            let nested_desc = registry.message_ref(referenced);
            let nested_len = message_len(registry, nested_desc, nested)?;
            Ok(uvarint_len(nested_len as u64) + nested_len)
        }
        (expected, other) => Err(mismatch(desc, field, expected.name(), other)),
    }
}

fn write_payload(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    kind: &FieldKind,
    value: &Value,
    w: &mut impl Write,
) -> Result<usize, EncodeError> {
    match (kind, value) {
        (FieldKind::Bool, Value::Bool(b)) => Ok(write_uvarint(w, u64::from(*b))?),
        (FieldKind::Int32, Value::I32(i)) => Ok(write_uvarint(w, *i as i64 as u64)?),
        (FieldKind::Int64, Value::I64(i)) => Ok(write_uvarint(w, *i as u64)?),
        (FieldKind::Enum(_), Value::Enum(e)) => Ok(write_uvarint(w, **e as i64 as u64)?),
        (FieldKind::Double, Value::F64(f)) => {
            w.write_all(&f.to_le_bytes())?;
            Ok(8)
        }
        (FieldKind::Bytes, Value::Bytes(b)) => {
            let mut w_len = write_uvarint(w, b.len() as u64)?;
            w.write_all(b)?;
            w_len += b.len();
            Ok(w_len)
        }
        (FieldKind::Str, Value::Str(s)) => {
            let b = s.as_bytes();
            let mut w_len = write_uvarint(w, b.len() as u64)?;
            w.write_all(b)?;
            w_len += b.len();
            Ok(w_len)
        }
        (FieldKind::Message(referenced), Value::Message(nested)) => {
            let nested_desc = registry.message_ref(referenced);
            let nested_len = message_len(registry, nested_desc, nested)?;
            let mut w_len = write_uvarint(w, nested_len as u64)?;
            w_len += *write_message(registry, nested_desc, nested, w)?;
            Ok(w_len)
        }
        (expected, other) => Err(mismatch(desc, field, expected.name(), other)),
    }
}

#[allow(clippy::too_many_arguments)]
fn entry_len(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    key_kind: MapKeyKind,
    val_kind: &FieldKind,
    key: &MapKey,
    value: &Value,
) -> Result<usize, EncodeError> {
    let mut len = key_len(desc, field, key_kind, key)?;
    if !is_default(val_kind, value) {
        let val_tag = Tag::new(2u32, val_kind.wire_type());
        len += val_tag.wire_len() + payload_len(registry, desc, field, val_kind, value)?;
    }
    Ok(len)
}

#[allow(clippy::too_many_arguments)]
fn write_entry(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    key_kind: MapKeyKind,
    val_kind: &FieldKind,
    key: &MapKey,
    value: &Value,
    w: &mut impl Write,
) -> Result<usize, EncodeError> {
    let mut w_len = write_key(desc, field, key_kind, key, w)?;
    if !is_default(val_kind, value) {
        let val_tag = Tag::new(2u32, val_kind.wire_type());
        w_len += val_tag.ser(w)?;
        w_len += write_payload(registry, desc, field, val_kind, value, w)?;
    }
    Ok(w_len)
}

/// Key field of a synthetic map entry. Default keys (0 / false / "") are
/// omitted like any scalar field and resurface as defaults on decode.
fn key_len(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    key_kind: MapKeyKind,
    key: &MapKey,
) -> Result<usize, EncodeError> {
    let key_tag = Tag::new(1u32, key_kind.wire_type());
    match (key_kind, key) {
        (MapKeyKind::Bool, MapKey::Bool(false)) => Ok(0),
        (MapKeyKind::Bool, MapKey::Bool(true)) => Ok(key_tag.wire_len() + 1),
        (MapKeyKind::Int32, MapKey::I32(0)) | (MapKeyKind::Int64, MapKey::I64(0)) => Ok(0),
        (MapKeyKind::Int32, MapKey::I32(i)) => {
            Ok(key_tag.wire_len() + uvarint_len(*i as i64 as u64))
        }
        (MapKeyKind::Int64, MapKey::I64(i)) => Ok(key_tag.wire_len() + uvarint_len(*i as u64)),
        (MapKeyKind::Str, MapKey::Str(s)) => {
            if s.is_empty() {
                Ok(0)
            } else {
                let b = s.as_bytes();
                Ok(key_tag.wire_len() + uvarint_len(b.len() as u64) + b.len())
            }
        }
        (_, key) => Err(key_mismatch(desc, field, key_kind, key)),
    }
}

fn write_key(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    key_kind: MapKeyKind,
    key: &MapKey,
    w: &mut impl Write,
) -> Result<usize, EncodeError> {
    let key_tag = Tag::new(1u32, key_kind.wire_type());
    match (key_kind, key) {
        (MapKeyKind::Bool, MapKey::Bool(false)) => Ok(0),
        (MapKeyKind::Bool, MapKey::Bool(true)) => {
            let mut w_len = key_tag.ser(w)?;
            w_len += write_uvarint(w, 1)?;
            Ok(w_len)
        }
        (MapKeyKind::Int32, MapKey::I32(0)) | (MapKeyKind::Int64, MapKey::I64(0)) => Ok(0),
        (MapKeyKind::Int32, MapKey::I32(i)) => {
            let mut w_len = key_tag.ser(w)?;
            w_len += write_uvarint(w, *i as i64 as u64)?;
            Ok(w_len)
        }
        (MapKeyKind::Int64, MapKey::I64(i)) => {
            let mut w_len = key_tag.ser(w)?;
            w_len += write_uvarint(w, *i as u64)?;
            Ok(w_len)
        }
        (MapKeyKind::Str, MapKey::Str(s)) => {
            if s.is_empty() {
                return Ok(0);
            }
            let b = s.as_bytes();
            let mut w_len = key_tag.ser(w)?;
            w_len += write_uvarint(w, b.len() as u64)?;
            w.write_all(b)?;
            w_len += b.len();
            Ok(w_len)
        }
        (_, key) => Err(key_mismatch(desc, field, key_kind, key)),
    }
}

fn tag_len(field: &FieldDescriptor) -> usize {
    Tag::new(field.number, field.kind.wire_type()).wire_len()
}

fn write_tag(field: &FieldDescriptor, w: &mut impl Write) -> Result<usize, EncodeError> {
    Ok(Tag::new(field.number, field.kind.wire_type()).ser(w)?)
}

fn is_default(kind: &FieldKind, value: &Value) -> bool {
    match (kind, value) {
        (FieldKind::Bool, Value::Bool(b)) => !*b,
        (FieldKind::Int32, Value::I32(i)) => *i == 0,
        (FieldKind::Int64, Value::I64(i)) => *i == 0,
        (FieldKind::Double, Value::F64(f)) => *f == 0.0,
        (FieldKind::Bytes, Value::Bytes(b)) => b.is_empty(),
        (FieldKind::Str, Value::Str(s)) => s.is_empty(),
        (FieldKind::Enum(_), Value::Enum(e)) => **e == 0,
        // A present message field is emitted even when it encodes to zero
        // bytes. Mismatched variants fall through to the payload match.
        _ => false,
    }
}

fn mismatch(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    expected: &'static str,
    actual: &Value,
) -> EncodeError {
    EncodeError::KindMismatch {
        message: String::from(desc.full_name()),
        field_name: field.name.clone(),
        expected,
        actual: actual.kind_name(),
    }
}

fn key_mismatch(
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    key_kind: MapKeyKind,
    _key: &MapKey,
) -> EncodeError {
    let expected = match key_kind {
        MapKeyKind::Bool => "bool",
        MapKeyKind::Int32 => "int32",
        MapKeyKind::Int64 => "int64",
        MapKeyKind::Str => "string",
    };
    EncodeError::KindMismatch {
        message: String::from(desc.full_name()),
        field_name: field.name.clone(),
        expected,
        actual: "map key",
    }
}
