use crate::convert::{field_bytes, field_enum, field_i64, field_list, field_map};
use crate::schema::{self, registry};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use tagbuf_types::codec;
use tagbuf_types::value::{EnumNumber, MapKey, MessageValue, Value};

/// Raw account-type ordinal. Ordinals the schema does not name decode
/// and re-encode verbatim, so new upstream variants pass through intact.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct AccountType(pub i32);

impl AccountType {
    pub const NORMAL: Self = Self(0);
    pub const ASSET_ISSUE: Self = Self(1);
    pub const CONTRACT: Self = Self(2);

    /// `None` for an unrecognized ordinal.
    pub fn name(self) -> Option<&'static str> {
        let desc = registry().describe_enum(schema::ACCOUNT_TYPE).ok()?;
        desc.name_of(self.0)
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Vote {
    pub vote_address: Vec<u8>,
    pub vote_count: i64,
}

impl Vote {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Bytes(self.vote_address.clone()));
        msg.set(2u32, Value::I64(self.vote_count));
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        Ok(Self {
            vote_address: field_bytes(msg, 1)?,
            vote_count: field_i64(msg, 2)?,
        })
    }

    pub fn ser(&self) -> Result<Vec<u8>> {
        let registry = registry();
        let desc = registry.describe(schema::VOTE)?;
        Ok(codec::serialize(registry, desc, &self.to_value())?)
    }

    pub fn deser(buf: &[u8]) -> Result<Self> {
        let registry = registry();
        let desc = registry.describe(schema::VOTE)?;
        Self::from_value(&codec::deserialize(registry, desc, buf)?)
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Account {
    pub account_name: Vec<u8>,
    pub account_type: AccountType,
    pub address: Vec<u8>,
    pub balance: i64,
    pub votes: Vec<Vote>,
    pub asset: BTreeMap<String, i64>,
    pub create_time: i64,
}

impl Account {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Bytes(self.account_name.clone()));
        msg.set(2u32, Value::Enum(EnumNumber(self.account_type.0)));
        msg.set(3u32, Value::Bytes(self.address.clone()));
        msg.set(4u32, Value::I64(self.balance));
        for vote in &self.votes {
            msg.push(5u32, Value::Message(vote.to_value()));
        }
        for (name, amount) in &self.asset {
            msg.insert_entry(6u32, MapKey::Str(name.clone()), Value::I64(*amount));
        }
        msg.set(9u32, Value::I64(self.create_time));
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        let mut votes = vec![];
        for elem in field_list(msg, 5)? {
            let nested = elem
                .as_message()
                .ok_or_else(|| anyhow!("votes element holds a {} value", elem.kind_name()))?;
            votes.push(Vote::from_value(nested)?);
        }

        let mut asset = BTreeMap::new();
        for (key, value) in field_map(msg, 6)? {
            let name = match key {
                MapKey::Str(s) => s.clone(),
                _ => return Err(anyhow!("asset key is not a string")),
            };
            let amount = value
                .as_i64()
                .ok_or_else(|| anyhow!("asset value holds a {} value", value.kind_name()))?;
            asset.insert(name, amount);
        }

        Ok(Self {
            account_name: field_bytes(msg, 1)?,
            account_type: AccountType(field_enum(msg, 2)?),
            address: field_bytes(msg, 3)?,
            balance: field_i64(msg, 4)?,
            votes,
            asset,
            create_time: field_i64(msg, 9)?,
        })
    }

    pub fn ser(&self) -> Result<Vec<u8>> {
        let registry = registry();
        let desc = registry.describe(schema::ACCOUNT)?;
        Ok(codec::serialize(registry, desc, &self.to_value())?)
    }

    pub fn deser(buf: &[u8]) -> Result<Self> {
        let registry = registry();
        let desc = registry.describe(schema::ACCOUNT)?;
        Self::from_value(&codec::deserialize(registry, desc, buf)?)
    }
}
