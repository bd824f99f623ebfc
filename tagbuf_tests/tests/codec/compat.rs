use super::helpers::{self, EVERYTHING};
use anyhow::Result;
use tagbuf_ledger::{schema, Account, AccountType};
use tagbuf_types::schema::{FieldDescriptor, FieldKind, MessageDescriptor, SchemaRegistry};
use tagbuf_types::value::{MessageValue, Value};
use tagbuf_types::{deserialize, serialize};

/// Every truncation point that does not fall on a field boundary must be
/// rejected; the boundaries themselves decode as shorter, valid messages.
#[test]
fn truncation_fails_off_field_boundaries() -> Result<()> {
    let registry = helpers::probe_registry();
    let desc = registry.describe(EVERYTHING)?;

    let mut msg = MessageValue::new();
    msg.set(5u32, Value::Bytes(b"abc".to_vec()));
    msg.set(3u32, Value::I64(150));
    let bytes = serialize(&registry, desc, &msg)?;

    /* blob: tag 0x2a, len 3, "abc"; total: tag 0x18, varint 96 01 */
    assert_eq!(bytes, hex::decode("2a03616263189601")?);
    let field_boundaries = [0, 5, 8];

    for prefix_len in 0..=bytes.len() {
        let res = deserialize(&registry, desc, &bytes[..prefix_len]);
        if field_boundaries.contains(&prefix_len) {
            assert!(res.is_ok(), "prefix_len {prefix_len}");
        } else {
            assert!(res.is_err(), "prefix_len {prefix_len}");
        }
    }

    Ok(())
}

fn versioned_registry(with_extra: bool) -> SchemaRegistry {
    let mut fields = vec![
        FieldDescriptor::singular(1, "id", FieldKind::Int64),
        FieldDescriptor::singular(2, "name", FieldKind::Str),
    ];
    if with_extra {
        fields.push(FieldDescriptor::singular(3, "extra", FieldKind::Bytes));
    }
    SchemaRegistry::builder()
        .message(MessageDescriptor::new("probe.Record", fields))
        .build()
        .unwrap()
}

/// A reader built against an older message revision skips the numbers it
/// does not know and keeps the rest.
#[test]
fn old_reader_skips_new_fields() -> Result<()> {
    let writer_registry = versioned_registry(true);
    let writer_desc = writer_registry.describe("probe.Record")?;
    let mut msg = MessageValue::new();
    msg.set(1u32, Value::I64(42));
    msg.set(2u32, Value::Str(String::from("rec")));
    msg.set(3u32, Value::Bytes(vec![0xde, 0xad]));
    let bytes = serialize(&writer_registry, writer_desc, &msg)?;

    let reader_registry = versioned_registry(false);
    let reader_desc = reader_registry.describe("probe.Record")?;
    let decoded = deserialize(&reader_registry, reader_desc, &bytes)?;

    assert_eq!(decoded.get(1u32), Some(&Value::I64(42)));
    assert_eq!(decoded.get(2u32), Some(&Value::Str(String::from("rec"))));
    assert_eq!(decoded.get(3u32), None);
    Ok(())
}

/// A field whose declared kind changed wire type between revisions is
/// dropped rather than misread.
#[test]
fn wire_type_drift_drops_the_field() -> Result<()> {
    let writer_registry = versioned_registry(false);
    let writer_desc = writer_registry.describe("probe.Record")?;
    let mut msg = MessageValue::new();
    msg.set(1u32, Value::I64(42));
    msg.set(2u32, Value::Str(String::from("rec")));
    let bytes = serialize(&writer_registry, writer_desc, &msg)?;

    let reader_registry = SchemaRegistry::builder()
        .message(MessageDescriptor::new(
            "probe.Record",
            vec![
                FieldDescriptor::singular(1, "id", FieldKind::Int64),
                // Was a string in the writer's revision.
                FieldDescriptor::singular(2, "name", FieldKind::Int64),
            ],
        ))
        .build()
        .unwrap();
    let reader_desc = reader_registry.describe("probe.Record")?;
    let decoded = deserialize(&reader_registry, reader_desc, &bytes)?;

    assert_eq!(decoded.get(1u32), Some(&Value::I64(42)));
    assert_eq!(decoded.get(2u32), None);
    Ok(())
}

/// The typed ledger layer and the generic codec agree on the same bytes.
#[test]
fn typed_and_generic_views_agree() -> Result<()> {
    let account = Account {
        account_name: b"acct".to_vec(),
        account_type: AccountType::ASSET_ISSUE,
        balance: 31_415,
        ..Account::default()
    };
    let bytes = account.ser()?;

    let registry = schema::registry();
    let desc = registry.describe(schema::ACCOUNT)?;
    let generic = deserialize(registry, desc, &bytes)?;

    assert_eq!(generic.get(1u32), Some(&Value::Bytes(b"acct".to_vec())));
    assert_eq!(generic.get(4u32), Some(&Value::I64(31_415)));
    assert_eq!(serialize(registry, desc, &generic)?, bytes);
    Ok(())
}
