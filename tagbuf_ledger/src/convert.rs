//! Shape checks for pulling typed fields out of a decoded [`MessageValue`].
//!
//! An absent field reads as its default; a present field holding the
//! wrong kind is an error in the caller's conversion.

use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use tagbuf_types::value::{MapKey, MessageValue, Value};

static EMPTY_LIST: [Value; 0] = [];
static EMPTY_MAP: BTreeMap<MapKey, Value> = BTreeMap::new();

pub(crate) fn field_i64(msg: &MessageValue, number: u32) -> Result<i64> {
    match msg.get(number) {
        None => Ok(0),
        Some(Value::I64(i)) => Ok(*i),
        Some(other) => Err(wrong_kind(number, "int64", other)),
    }
}

pub(crate) fn field_i32(msg: &MessageValue, number: u32) -> Result<i32> {
    match msg.get(number) {
        None => Ok(0),
        Some(Value::I32(i)) => Ok(*i),
        Some(other) => Err(wrong_kind(number, "int32", other)),
    }
}

pub(crate) fn field_enum(msg: &MessageValue, number: u32) -> Result<i32> {
    match msg.get(number) {
        None => Ok(0),
        Some(Value::Enum(e)) => Ok(**e),
        Some(other) => Err(wrong_kind(number, "enum", other)),
    }
}

pub(crate) fn field_bytes(msg: &MessageValue, number: u32) -> Result<Vec<u8>> {
    match msg.get(number) {
        None => Ok(vec![]),
        Some(Value::Bytes(b)) => Ok(b.clone()),
        Some(other) => Err(wrong_kind(number, "bytes", other)),
    }
}

pub(crate) fn field_str(msg: &MessageValue, number: u32) -> Result<String> {
    match msg.get(number) {
        None => Ok(String::new()),
        Some(Value::Str(s)) => Ok(s.clone()),
        Some(other) => Err(wrong_kind(number, "string", other)),
    }
}

/// Message fields keep their presence distinction: `None` means unset.
pub(crate) fn field_message<'a>(
    msg: &'a MessageValue,
    number: u32,
) -> Result<Option<&'a MessageValue>> {
    match msg.get(number) {
        None => Ok(None),
        Some(Value::Message(nested)) => Ok(Some(nested)),
        Some(other) => Err(wrong_kind(number, "message", other)),
    }
}

pub(crate) fn field_list<'a>(msg: &'a MessageValue, number: u32) -> Result<&'a [Value]> {
    match msg.get(number) {
        None => Ok(&EMPTY_LIST),
        Some(Value::List(elems)) => Ok(elems),
        Some(other) => Err(wrong_kind(number, "repeated", other)),
    }
}

pub(crate) fn field_map<'a>(
    msg: &'a MessageValue,
    number: u32,
) -> Result<&'a BTreeMap<MapKey, Value>> {
    match msg.get(number) {
        None => Ok(&EMPTY_MAP),
        Some(Value::Map(map)) => Ok(map),
        Some(other) => Err(wrong_kind(number, "map", other)),
    }
}

fn wrong_kind(number: u32, expected: &'static str, actual: &Value) -> anyhow::Error {
    anyhow!(
        "field {} holds a {} value where {} is expected",
        number,
        actual.kind_name(),
        expected
    )
}
