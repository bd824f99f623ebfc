#[cfg(test)]
mod test {
    use crate::codec::{deserialize, serialize};
    use crate::error::DecodeError;
    use crate::schema::{
        EnumDescriptor, FieldDescriptor, FieldKind, MapKeyKind, MessageDescriptor, SchemaRegistry,
    };
    use crate::value::{EnumNumber, MapKey, MessageValue, Value};
    use anyhow::Result;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .message(MessageDescriptor::new(
                "test.Wallet",
                vec![
                    FieldDescriptor::singular(1, "name", FieldKind::Bytes),
                    FieldDescriptor::singular(2, "balance", FieldKind::Int64),
                ],
            ))
            .message(MessageDescriptor::new(
                "test.Holding",
                vec![
                    FieldDescriptor::singular(
                        1,
                        "wallet",
                        FieldKind::Message(String::from("test.Wallet")),
                    ),
                    FieldDescriptor::repeated(2, "memo", FieldKind::Str),
                    FieldDescriptor::singular(
                        3,
                        "asset",
                        FieldKind::map(MapKeyKind::Str, FieldKind::Int64),
                    ),
                    FieldDescriptor::singular(4, "kind", FieldKind::Enum(String::from("test.Kind"))),
                    FieldDescriptor::repeated(5, "weights", FieldKind::Int64),
                    FieldDescriptor::singular(6, "ratio", FieldKind::Double),
                ],
            ))
            .enumeration(EnumDescriptor::new(
                "test.Kind",
                vec![("KIND_UNSET", 0), ("KIND_COLD", 1), ("KIND_HOT", 2)],
            ))
            .build()
            .unwrap()
    }

    fn wallet(name: &[u8], balance: i64) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Bytes(name.to_vec()));
        msg.set(2u32, Value::I64(balance));
        msg
    }

    #[test]
    fn known_byte_layout() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Wallet")?;

        let bytes = serialize(&registry, desc, &wallet(b"abc", 150))?;
        assert_eq!(bytes, hex::decode("0a036162631096 01".replace(' ', ""))?);

        let decoded = deserialize(&registry, desc, &bytes)?;
        assert_eq!(decoded.get(1u32).and_then(Value::as_bytes), Some(&b"abc"[..]));
        assert_eq!(decoded.get(2u32).and_then(Value::as_i64), Some(150));
        Ok(())
    }

    #[test]
    fn defaults_are_not_serialized() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Wallet")?;

        let bytes = serialize(&registry, desc, &MessageValue::new())?;
        assert_eq!(bytes.len(), 0);

        let bytes = serialize(&registry, desc, &wallet(b"", 0))?;
        assert_eq!(bytes.len(), 0);

        /* decoding the empty record yields the never-set value */
        let decoded = deserialize(&registry, desc, &bytes)?;
        assert!(decoded.is_empty());

        let full = serialize(&registry, desc, &wallet(b"abc", 150))?;
        let partial = serialize(&registry, desc, &wallet(b"abc", 0))?;
        assert_eq!(full.len() - partial.len(), 3);
        Ok(())
    }

    #[test]
    fn present_empty_message_is_serialized() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Holding")?;

        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Message(MessageValue::new()));

        /* presence, not emptiness, gates message fields */
        let bytes = serialize(&registry, desc, &msg)?;
        assert_eq!(bytes, [0x0a, 0x00]);

        let decoded = deserialize(&registry, desc, &bytes)?;
        let nested = decoded.get(1u32).and_then(Value::as_message).unwrap();
        assert!(nested.is_empty());
        Ok(())
    }

    #[test]
    fn duplicate_singular_scalar_last_one_wins() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Wallet")?;

        // Two occurrences of field 2: varint 7, then varint 150.
        let bytes = [0x10, 0x07, 0x10, 0x96, 0x01];
        let decoded = deserialize(&registry, desc, &bytes)?;
        assert_eq!(decoded.get(2u32).and_then(Value::as_i64), Some(150));
        Ok(())
    }

    #[test]
    fn duplicate_singular_message_merges() -> Result<()> {
        let registry = registry();
        let holding_desc = registry.describe("test.Holding")?;
        let wallet_desc = registry.describe("test.Wallet")?;

        let mut first = MessageValue::new();
        first.set(1u32, Value::Message(wallet(b"abc", 0)));
        let mut second = MessageValue::new();
        second.set(1u32, Value::Message(wallet(b"", 150)));

        let mut bytes = serialize(&registry, holding_desc, &first)?;
        bytes.extend(serialize(&registry, holding_desc, &second)?);

        let decoded = deserialize(&registry, holding_desc, &bytes)?;
        let merged = decoded.get(1u32).and_then(Value::as_message).unwrap();
        let expected = deserialize(
            &registry,
            wallet_desc,
            &serialize(&registry, wallet_desc, &wallet(b"abc", 150))?,
        )?;
        assert_eq!(merged, &expected);
        Ok(())
    }

    #[test]
    fn repeated_fields_keep_order() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Holding")?;

        let mut msg = MessageValue::new();
        for memo in ["x", "y", "z"] {
            msg.push(2u32, Value::Str(String::from(memo)));
        }
        let decoded = deserialize(&registry, desc, &serialize(&registry, desc, &msg)?)?;
        let memos = decoded.get(2u32).and_then(Value::as_list).unwrap();
        let memos = memos.iter().map(|v| v.as_str().unwrap()).collect::<Vec<_>>();
        assert_eq!(memos, ["x", "y", "z"]);
        Ok(())
    }

    #[test]
    fn map_entries_round_trip_in_any_order() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Holding")?;

        let mut msg = MessageValue::new();
        msg.insert_entry(3u32, MapKey::Str(String::from("a")), Value::I64(1));
        msg.insert_entry(3u32, MapKey::Str(String::from("b")), Value::I64(2));

        let bytes = serialize(&registry, desc, &msg)?;
        // Two entries: tag(3,len) len=5 (key "a" -> 1), then (key "b" -> 2).
        assert_eq!(
            bytes,
            hex::decode("1a050a01611001 1a050a01621002".replace(' ', ""))?
        );

        /* entry encounter order is not significant */
        let mut reversed = bytes[7..].to_vec();
        reversed.extend(&bytes[..7]);
        assert_eq!(
            deserialize(&registry, desc, &bytes)?,
            deserialize(&registry, desc, &reversed)?,
        );
        Ok(())
    }

    #[test]
    fn map_entry_defaults_and_upsert() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Holding")?;

        // Entry with no key and no value fields at all.
        let bytes = [0x1a, 0x00];
        let decoded = deserialize(&registry, desc, &bytes)?;
        let map = decoded.get(3u32).and_then(Value::as_map).unwrap();
        assert_eq!(
            map.get(&MapKey::Str(String::new())).and_then(Value::as_i64),
            Some(0),
        );

        // Same key twice: the later entry overwrites.
        let mut msg = MessageValue::new();
        msg.insert_entry(3u32, MapKey::Str(String::from("a")), Value::I64(1));
        let mut bytes = serialize(&registry, desc, &msg)?;
        let mut newer = MessageValue::new();
        newer.insert_entry(3u32, MapKey::Str(String::from("a")), Value::I64(9));
        bytes.extend(serialize(&registry, desc, &newer)?);

        let decoded = deserialize(&registry, desc, &bytes)?;
        let map = decoded.get(3u32).and_then(Value::as_map).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&MapKey::Str(String::from("a"))).and_then(Value::as_i64),
            Some(9),
        );
        Ok(())
    }

    #[test]
    fn unknown_enum_ordinal_is_preserved() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Holding")?;

        let mut msg = MessageValue::new();
        msg.set(4u32, Value::Enum(EnumNumber(99)));

        let decoded = deserialize(&registry, desc, &serialize(&registry, desc, &msg)?)?;
        let ordinal = decoded.get(4u32).and_then(Value::as_enum).unwrap();
        assert_eq!(*ordinal, 99);

        let kind_enum = registry.describe_enum("test.Kind")?;
        assert_eq!(kind_enum.name_of(*ordinal), None);
        assert_eq!(kind_enum.name_of(2), Some("KIND_HOT"));
        Ok(())
    }

    #[test]
    fn packed_repeated_scalars_decode() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Holding")?;

        // Field 5 as one length-delimited run: varints 3, 270, 86942.
        let bytes = hex::decode("2a06038e029ea705")?;
        let decoded = deserialize(&registry, desc, &bytes)?;
        let weights = decoded.get(5u32).and_then(Value::as_list).unwrap();
        let weights = weights.iter().map(|v| v.as_i64().unwrap()).collect::<Vec<_>>();
        assert_eq!(weights, [3, 270, 86942]);
        Ok(())
    }

    #[test]
    fn double_round_trips_through_fixed64() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Holding")?;

        let mut msg = MessageValue::new();
        msg.set(6u32, Value::F64(-2.5));
        let bytes = serialize(&registry, desc, &msg)?;
        assert_eq!(bytes.len(), 1 + 8);

        let decoded = deserialize(&registry, desc, &bytes)?;
        assert_eq!(decoded.get(6u32).and_then(Value::as_f64), Some(-2.5));
        Ok(())
    }

    #[test]
    fn negative_int_round_trips() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Wallet")?;

        let mut msg = MessageValue::new();
        msg.set(2u32, Value::I64(-150));
        let bytes = serialize(&registry, desc, &msg)?;
        // Negative ints sign-extend to the full 10-byte varint.
        assert_eq!(bytes.len(), 1 + 10);

        let decoded = deserialize(&registry, desc, &bytes)?;
        assert_eq!(decoded.get(2u32).and_then(Value::as_i64), Some(-150));
        Ok(())
    }

    #[test]
    fn unknown_fields_are_skipped() -> Result<()> {
        let registry = registry();
        let desc = registry.describe("test.Wallet")?;

        let mut bytes: Vec<u8> = vec![];
        bytes.extend([0x18, 0x07]); // field 3, varint
        bytes.extend([0x21, 1, 2, 3, 4, 5, 6, 7, 8]); // field 4, fixed64
        bytes.extend([0x2a, 0x02, 0xff, 0xfe]); // field 5, length-delimited
        bytes.extend([0x35, 1, 2, 3, 4]); // field 6, fixed32
        bytes.extend([0x10, 0x96, 0x01]); // field 2, known

        let decoded = deserialize(&registry, desc, &bytes)?;
        assert_eq!(decoded.get(2u32).and_then(Value::as_i64), Some(150));
        assert_eq!(decoded.get(1u32), None);
        Ok(())
    }

    #[test]
    fn malformed_varint_is_rejected() {
        let registry = registry();
        let desc = registry.describe("test.Wallet").unwrap();

        let err = deserialize(&registry, desc, &[0x10, 0x96]).unwrap_err();
        assert_eq!(err, DecodeError::MalformedVarint);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let registry = registry();
        let desc = registry.describe("test.Wallet").unwrap();

        let err = deserialize(&registry, desc, &[0x0a, 0x05, 0x61, 0x62]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedPayload {
                declared: 5,
                remaining: 2
            },
        );
    }

    #[test]
    fn unknown_wire_type_is_rejected() {
        let registry = registry();
        let desc = registry.describe("test.Wallet").unwrap();

        // Field 1 with wire type 3 (group start).
        let err = deserialize(&registry, desc, &[0x0b]).unwrap_err();
        assert_eq!(err, DecodeError::UnknownWireType(3));
    }

    #[test]
    fn invalid_utf8_in_string_is_rejected() {
        let registry = registry();
        let desc = registry.describe("test.Holding").unwrap();

        let err = deserialize(&registry, desc, &[0x12, 0x02, 0xc3, 0x28]).unwrap_err();
        assert_eq!(err, DecodeError::InvalidUtf8);
    }
}
