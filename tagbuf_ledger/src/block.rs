use crate::convert::{field_bytes, field_i64, field_list, field_message};
use crate::schema::{self, registry};
use crate::transaction::Transaction;
use anyhow::{anyhow, Result};
use tagbuf_types::codec;
use tagbuf_types::value::{MessageValue, Value};

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct BlockHeaderRaw {
    pub timestamp: i64,
    pub tx_trie_root: Vec<u8>,
    pub parent_hash: Vec<u8>,
    pub number: i64,
    pub witness_address: Vec<u8>,
}

impl BlockHeaderRaw {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::I64(self.timestamp));
        msg.set(2u32, Value::Bytes(self.tx_trie_root.clone()));
        msg.set(3u32, Value::Bytes(self.parent_hash.clone()));
        msg.set(7u32, Value::I64(self.number));
        msg.set(9u32, Value::Bytes(self.witness_address.clone()));
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        Ok(Self {
            timestamp: field_i64(msg, 1)?,
            tx_trie_root: field_bytes(msg, 2)?,
            parent_hash: field_bytes(msg, 3)?,
            number: field_i64(msg, 7)?,
            witness_address: field_bytes(msg, 9)?,
        })
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct BlockHeader {
    pub raw_data: Option<BlockHeaderRaw>,
    pub witness_signature: Vec<u8>,
}

impl BlockHeader {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        if let Some(raw_data) = &self.raw_data {
            msg.set(1u32, Value::Message(raw_data.to_value()));
        }
        msg.set(2u32, Value::Bytes(self.witness_signature.clone()));
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        let raw_data = match field_message(msg, 1)? {
            None => None,
            Some(nested) => Some(BlockHeaderRaw::from_value(nested)?),
        };
        Ok(Self {
            raw_data,
            witness_signature: field_bytes(msg, 2)?,
        })
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Block {
    pub transactions: Vec<Transaction>,
    pub block_header: Option<BlockHeader>,
}

impl Block {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        for tx in &self.transactions {
            msg.push(1u32, Value::Message(tx.to_value()));
        }
        if let Some(header) = &self.block_header {
            msg.set(2u32, Value::Message(header.to_value()));
        }
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        let mut transactions = vec![];
        for elem in field_list(msg, 1)? {
            let nested = elem.as_message().ok_or_else(|| {
                anyhow!("transactions element holds a {} value", elem.kind_name())
            })?;
            transactions.push(Transaction::from_value(nested)?);
        }
        let block_header = match field_message(msg, 2)? {
            None => None,
            Some(nested) => Some(BlockHeader::from_value(nested)?),
        };
        Ok(Self {
            transactions,
            block_header,
        })
    }

    pub fn ser(&self) -> Result<Vec<u8>> {
        let registry = registry();
        let desc = registry.describe(schema::BLOCK)?;
        Ok(codec::serialize(registry, desc, &self.to_value())?)
    }

    pub fn deser(buf: &[u8]) -> Result<Self> {
        let registry = registry();
        let desc = registry.describe(schema::BLOCK)?;
        Self::from_value(&codec::deserialize(registry, desc, buf)?)
    }
}
