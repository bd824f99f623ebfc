use super::helpers::{self, EVERYTHING};
use anyhow::Result;
use itertools::Itertools;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tagbuf_types::value::{EnumNumber, MapKey, MessageValue, Value};
use tagbuf_types::{deserialize, serialize};

/// Serializes, deserializes, and demands the original back. Also checks
/// that the byte output does not depend on field insertion order, by
/// comparing against the bytes of the sorted-by-number rendition.
fn verify(fields: &[(u32, Value)]) -> Result<()> {
    let registry = helpers::probe_registry();
    let desc = registry.describe(EVERYTHING)?;

    let build = |fields: &[(u32, Value)]| {
        let mut msg = MessageValue::new();
        for (number, value) in fields {
            match value {
                Value::List(elems) => {
                    for elem in elems {
                        msg.push(*number, elem.clone());
                    }
                }
                Value::Map(entries) => {
                    for (key, val) in entries {
                        msg.insert_entry(*number, key.clone(), val.clone());
                    }
                }
                other => msg.set(*number, other.clone()),
            }
        }
        msg
    };

    let msg = build(fields);
    let serialized = serialize(&registry, desc, &msg)?;

    let mut sorted = fields.to_vec();
    sorted.sort_by_key(|(number, _)| *number);
    let resorted_bytes = serialize(&registry, desc, &build(&sorted))?;
    assert_eq!(serialized, resorted_bytes, "\n{fields:?}");

    let deserialized = deserialize(&registry, desc, &serialized)?;
    assert_eq!(msg, deserialized, "\n{fields:?}\n{serialized:?}");

    Ok(())
}

/* Generators stay clear of default values: an explicitly-set default is
omitted on the wire and would not survive the round trip. */

fn gen_flag() -> (u32, Value) {
    (1, Value::Bool(true))
}
fn gen_count() -> (u32, Value) {
    (2, Value::I32(-40))
}
fn gen_total() -> (u32, Value) {
    (3, Value::I64(1 << 40))
}
fn gen_ratio() -> (u32, Value) {
    (4, Value::F64(-2.5))
}
fn gen_blob() -> (u32, Value) {
    (5, Value::Bytes(vec![0x00, 0xff, 0x7f]))
}
fn gen_label() -> (u32, Value) {
    (6, Value::Str(String::from("asdf")))
}
fn gen_color() -> (u32, Value) {
    (7, Value::Enum(EnumNumber(2)))
}
fn gen_origin() -> (u32, Value) {
    let mut point = MessageValue::new();
    point.set(1u32, Value::I64(-3));
    point.set(2u32, Value::I64(77));
    (8, Value::Message(point))
}
fn gen_tags() -> (u32, Value) {
    (
        9,
        Value::List(vec![
            Value::Str(String::from("zxcv")),
            Value::Str(String::new()),
            Value::Str(String::from("qwer")),
        ]),
    )
}
fn gen_attrs() -> (u32, Value) {
    (
        10,
        Value::Map(BTreeMap::from([
            (MapKey::Str(String::from("a")), Value::I64(1)),
            (MapKey::Str(String::new()), Value::I64(-9)),
        ])),
    )
}

#[test]
fn ser_then_deser() -> Result<()> {
    let mut rand_rng = rand::thread_rng();

    let gen_fns = [
        gen_flag, gen_count, gen_total, gen_ratio, gen_blob, gen_label, gen_color, gen_origin,
        gen_tags, gen_attrs,
    ];

    for mut gen_fns in gen_fns.iter().powerset() {
        let fields = gen_fns.iter().map(|gen| gen()).collect::<Vec<_>>();
        verify(&fields)?;

        gen_fns.shuffle(&mut rand_rng);
        let fields = gen_fns.iter().map(|gen| gen()).collect::<Vec<_>>();
        verify(&fields)?;
    }

    Ok(())
}
