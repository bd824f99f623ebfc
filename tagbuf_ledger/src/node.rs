use crate::convert::{field_i32, field_i64, field_map, field_str};
use crate::schema::{self, registry};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use tagbuf_types::codec;
use tagbuf_types::value::{MapKey, MessageValue, Value};

/// Peer/node metadata exchanged out of band from consensus traffic.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct NodeInfo {
    pub begin_sync_num: i64,
    pub block: String,
    pub solidity_block: String,
    pub current_connect_count: i32,
    pub config: BTreeMap<String, String>,
}

impl NodeInfo {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::I64(self.begin_sync_num));
        msg.set(2u32, Value::Str(self.block.clone()));
        msg.set(3u32, Value::Str(self.solidity_block.clone()));
        msg.set(4u32, Value::I32(self.current_connect_count));
        for (key, value) in &self.config {
            msg.insert_entry(5u32, MapKey::Str(key.clone()), Value::Str(value.clone()));
        }
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        let mut config = BTreeMap::new();
        for (key, value) in field_map(msg, 5)? {
            let key = match key {
                MapKey::Str(s) => s.clone(),
                _ => return Err(anyhow!("config key is not a string")),
            };
            let value = value
                .as_str()
                .ok_or_else(|| anyhow!("config value holds a {} value", value.kind_name()))?;
            config.insert(key, String::from(value));
        }
        Ok(Self {
            begin_sync_num: field_i64(msg, 1)?,
            block: field_str(msg, 2)?,
            solidity_block: field_str(msg, 3)?,
            current_connect_count: field_i32(msg, 4)?,
            config,
        })
    }

    pub fn ser(&self) -> Result<Vec<u8>> {
        let registry = registry();
        let desc = registry.describe(schema::NODE_INFO)?;
        Ok(codec::serialize(registry, desc, &self.to_value())?)
    }

    pub fn deser(buf: &[u8]) -> Result<Self> {
        let registry = registry();
        let desc = registry.describe(schema::NODE_INFO)?;
        Self::from_value(&codec::deserialize(registry, desc, buf)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn node_info_round_trip() -> Result<()> {
        let info = NodeInfo {
            begin_sync_num: 16_632_000,
            block: String::from("Num:16632913,ID:0000000000fdcad1"),
            solidity_block: String::from("Num:16632894,ID:0000000000fdcabe"),
            current_connect_count: 30,
            config: BTreeMap::from([
                (String::from("p2pVersion"), String::from("11111")),
                (String::from("listenPort"), String::from("18888")),
            ]),
        };
        assert_eq!(NodeInfo::deser(&info.ser()?)?, info);
        Ok(())
    }

    #[test]
    fn empty_config_map_is_omitted() -> Result<()> {
        let info = NodeInfo {
            begin_sync_num: 1,
            ..NodeInfo::default()
        };
        let bytes = info.ser()?;
        // Only field 1 makes it to the wire.
        assert_eq!(bytes, [0x08, 0x01]);
        Ok(())
    }
}
