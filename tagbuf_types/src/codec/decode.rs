use crate::error::DecodeError;
use crate::schema::{
    Cardinality, FieldDescriptor, FieldKind, MapKeyKind, MessageDescriptor, SchemaRegistry,
};
use crate::value::{EnumNumber, MapKey, MessageValue, Value};
use crate::wire::{WireReader, WireType};

/// Rebuilds a [`MessageValue`] by replaying the wire record in `buf`.
///
/// Field order in the bytes is not significant. Well-formed tags whose
/// field numbers the schema does not know are skipped; malformed input
/// aborts the whole call and no partial value escapes.
pub fn deserialize(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    buf: &[u8],
) -> Result<MessageValue, DecodeError> {
    let mut msg = MessageValue::new();
    decode_into(registry, desc, buf, &mut msg)?;
    Ok(msg)
}

fn decode_into(
    registry: &SchemaRegistry,
    desc: &MessageDescriptor,
    buf: &[u8],
    msg: &mut MessageValue,
) -> Result<(), DecodeError> {
    let mut r = WireReader::new(buf);
    while !r.is_empty() {
        /* tag */
        let tag = r.read_tag()?;

        /* payload, dispatched by the schema's kind for this number */
        match desc.field(tag.number) {
            None => r.skip(tag.wire_type)?,
            Some(field) => decode_field(registry, field, tag.wire_type, &mut r, msg)?,
        }
    }
    Ok(())
}

fn decode_field(
    registry: &SchemaRegistry,
    field: &FieldDescriptor,
    wire_type: WireType,
    r: &mut WireReader<'_>,
    msg: &mut MessageValue,
) -> Result<(), DecodeError> {
    match &field.kind {
        FieldKind::Map {
            key: key_kind,
            value: val_kind,
        } => {
            if wire_type != WireType::LenDelimited {
                return r.skip(wire_type);
            }
            let entry_buf = r.read_len_delimited()?;
            let (key, value) = decode_map_entry(registry, *key_kind, val_kind, entry_buf)?;
            msg.insert_entry(field.number, key, value);
            Ok(())
        }
        FieldKind::Message(referenced) => {
            if wire_type != WireType::LenDelimited {
                return r.skip(wire_type);
            }
            let nested_buf = r.read_len_delimited()?;
            let nested_desc = registry.message_ref(referenced);
            match field.cardinality {
                Cardinality::Repeated => {
                    let mut nested = MessageValue::new();
                    decode_into(registry, nested_desc, nested_buf, &mut nested)?;
                    msg.push(field.number, Value::Message(nested));
                }
                Cardinality::Singular => {
                    /* a repeated occurrence of a singular message field
                     * merges into the earlier value, field by field */
                    match msg.get_mut(field.number) {
                        Some(Value::Message(existing)) => {
                            decode_into(registry, nested_desc, nested_buf, existing)?;
                        }
                        _ => {
                            let mut nested = MessageValue::new();
                            decode_into(registry, nested_desc, nested_buf, &mut nested)?;
                            msg.set(field.number, Value::Message(nested));
                        }
                    }
                }
            }
            Ok(())
        }
        scalar_kind => decode_scalar_field(field, scalar_kind, wire_type, r, msg),
    }
}

fn decode_scalar_field(
    field: &FieldDescriptor,
    kind: &FieldKind,
    wire_type: WireType,
    r: &mut WireReader<'_>,
    msg: &mut MessageValue,
) -> Result<(), DecodeError> {
    let declared_wt = kind.wire_type();
    match field.cardinality {
        Cardinality::Singular => {
            if wire_type != declared_wt {
                // Wire-type drift is treated like an unknown field.
                return r.skip(wire_type);
            }
            let value = read_scalar(kind, r)?;
            /* last one wins on duplicate tags */
            msg.set(field.number, value);
            Ok(())
        }
        Cardinality::Repeated => {
            if wire_type == declared_wt {
                let value = read_scalar(kind, r)?;
                msg.push(field.number, value);
                Ok(())
            } else if wire_type == WireType::LenDelimited && declared_wt != WireType::LenDelimited
            {
                /* packed: one length-delimited run of element payloads */
                let packed = r.read_len_delimited()?;
                let mut pr = WireReader::new(packed);
                while !pr.is_empty() {
                    let value = read_scalar(kind, &mut pr)?;
                    msg.push(field.number, value);
                }
                Ok(())
            } else {
                r.skip(wire_type)
            }
        }
    }
}

/// One scalar payload at the reader's position. `kind` is guaranteed
/// non-composite by `decode_field`'s dispatch.
fn read_scalar(kind: &FieldKind, r: &mut WireReader<'_>) -> Result<Value, DecodeError> {
    match kind {
        FieldKind::Bool => Ok(Value::Bool(r.read_uvarint()? != 0)),
        FieldKind::Int32 => Ok(Value::I32(r.read_uvarint()? as i32)),
        FieldKind::Int64 => Ok(Value::I64(r.read_uvarint()? as i64)),
        FieldKind::Enum(_) => Ok(Value::Enum(EnumNumber(r.read_uvarint()? as i32))),
        FieldKind::Double => Ok(Value::F64(f64::from_le_bytes(r.read_fixed64()?))),
        FieldKind::Bytes => Ok(Value::Bytes(r.read_len_delimited()?.to_vec())),
        FieldKind::Str => {
            let bytes = r.read_len_delimited()?.to_vec();
            let s = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
            Ok(Value::Str(s))
        }
        FieldKind::Message(_) | FieldKind::Map { .. } => {
            unreachable!("composite kinds are dispatched in decode_field")
        }
    }
}

/// Decodes a synthetic two-field entry: key = 1, value = 2. A missing
/// key or value reads as the kind's default, like any absent field.
fn decode_map_entry(
    registry: &SchemaRegistry,
    key_kind: MapKeyKind,
    val_kind: &FieldKind,
    buf: &[u8],
) -> Result<(MapKey, Value), DecodeError> {
    let mut r = WireReader::new(buf);
    let mut key: Option<MapKey> = None;
    let mut value: Option<Value> = None;

    while !r.is_empty() {
        let tag = r.read_tag()?;
        match *tag.number {
            1 if tag.wire_type == key_kind.wire_type() => {
                key = Some(read_map_key(key_kind, &mut r)?);
            }
            2 if tag.wire_type == val_kind.wire_type() => match val_kind {
                FieldKind::Message(referenced) => {
                    let nested_buf = r.read_len_delimited()?;
                    let nested_desc = registry.message_ref(referenced);
                    let mut nested = MessageValue::new();
                    decode_into(registry, nested_desc, nested_buf, &mut nested)?;
                    value = Some(Value::Message(nested));
                }
                scalar_kind => {
                    value = Some(read_scalar(scalar_kind, &mut r)?);
                }
            },
            _ => r.skip(tag.wire_type)?,
        }
    }

    let key = key.unwrap_or_else(|| MapKey::default_for(key_kind));
    let value = value.unwrap_or_else(|| Value::default_for(val_kind));
    Ok((key, value))
}

fn read_map_key(key_kind: MapKeyKind, r: &mut WireReader<'_>) -> Result<MapKey, DecodeError> {
    match key_kind {
        MapKeyKind::Bool => Ok(MapKey::Bool(r.read_uvarint()? != 0)),
        MapKeyKind::Int32 => Ok(MapKey::I32(r.read_uvarint()? as i32)),
        MapKeyKind::Int64 => Ok(MapKey::I64(r.read_uvarint()? as i64)),
        MapKeyKind::Str => {
            let bytes = r.read_len_delimited()?.to_vec();
            let s = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
            Ok(MapKey::Str(s))
        }
    }
}
