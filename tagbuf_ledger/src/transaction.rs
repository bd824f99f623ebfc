use crate::convert::{field_bytes, field_enum, field_i64, field_list, field_message, field_str};
use crate::schema::{self, registry};
use anyhow::{anyhow, Result};
use tagbuf_types::codec;
use tagbuf_types::value::{EnumNumber, MessageValue, Value};

/// Raw contract-type ordinal, preserved verbatim when unrecognized.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct ContractType(pub i32);

impl ContractType {
    pub const ACCOUNT_CREATE: Self = Self(0);
    pub const TRANSFER: Self = Self(1);
    pub const VOTE_WITNESS: Self = Self(4);
    pub const ACCOUNT_PERMISSION_UPDATE: Self = Self(46);

    pub fn name(self) -> Option<&'static str> {
        let desc = registry().describe_enum(schema::CONTRACT_TYPE).ok()?;
        desc.name_of(self.0)
    }
}

/// A contract parameter: a type URL plus the parameter message's own
/// encoding, carried opaquely.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Any {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Str(self.type_url.clone()));
        msg.set(2u32, Value::Bytes(self.value.clone()));
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        Ok(Self {
            type_url: field_str(msg, 1)?,
            value: field_bytes(msg, 2)?,
        })
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct TransferContract {
    pub owner_address: Vec<u8>,
    pub to_address: Vec<u8>,
    pub amount: i64,
}

impl TransferContract {
    pub const TYPE_URL: &'static str = "type.googleapis.com/protocol.TransferContract";

    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Bytes(self.owner_address.clone()));
        msg.set(2u32, Value::Bytes(self.to_address.clone()));
        msg.set(3u32, Value::I64(self.amount));
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        Ok(Self {
            owner_address: field_bytes(msg, 1)?,
            to_address: field_bytes(msg, 2)?,
            amount: field_i64(msg, 3)?,
        })
    }

    pub fn ser(&self) -> Result<Vec<u8>> {
        let registry = registry();
        let desc = registry.describe(schema::TRANSFER_CONTRACT)?;
        Ok(codec::serialize(registry, desc, &self.to_value())?)
    }

    pub fn deser(buf: &[u8]) -> Result<Self> {
        let registry = registry();
        let desc = registry.describe(schema::TRANSFER_CONTRACT)?;
        Self::from_value(&codec::deserialize(registry, desc, buf)?)
    }

    /// Wraps this contract the way it travels inside [`Contract::parameter`].
    pub fn to_any(&self) -> Result<Any> {
        Ok(Any {
            type_url: String::from(Self::TYPE_URL),
            value: self.ser()?,
        })
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Contract {
    pub contract_type: ContractType,
    pub parameter: Option<Any>,
}

impl Contract {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Enum(EnumNumber(self.contract_type.0)));
        if let Some(parameter) = &self.parameter {
            msg.set(2u32, Value::Message(parameter.to_value()));
        }
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        let parameter = match field_message(msg, 2)? {
            None => None,
            Some(nested) => Some(Any::from_value(nested)?),
        };
        Ok(Self {
            contract_type: ContractType(field_enum(msg, 1)?),
            parameter,
        })
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct TransactionRaw {
    pub ref_block_bytes: Vec<u8>,
    pub ref_block_hash: Vec<u8>,
    pub expiration: i64,
    pub contract: Vec<Contract>,
    pub timestamp: i64,
}

impl TransactionRaw {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        msg.set(1u32, Value::Bytes(self.ref_block_bytes.clone()));
        msg.set(4u32, Value::Bytes(self.ref_block_hash.clone()));
        msg.set(8u32, Value::I64(self.expiration));
        for contract in &self.contract {
            msg.push(11u32, Value::Message(contract.to_value()));
        }
        msg.set(14u32, Value::I64(self.timestamp));
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        let mut contract = vec![];
        for elem in field_list(msg, 11)? {
            let nested = elem
                .as_message()
                .ok_or_else(|| anyhow!("contract element holds a {} value", elem.kind_name()))?;
            contract.push(Contract::from_value(nested)?);
        }
        Ok(Self {
            ref_block_bytes: field_bytes(msg, 1)?,
            ref_block_hash: field_bytes(msg, 4)?,
            expiration: field_i64(msg, 8)?,
            contract,
            timestamp: field_i64(msg, 14)?,
        })
    }

    pub fn ser(&self) -> Result<Vec<u8>> {
        let registry = registry();
        let desc = registry.describe(schema::TRANSACTION_RAW)?;
        Ok(codec::serialize(registry, desc, &self.to_value())?)
    }

    pub fn deser(buf: &[u8]) -> Result<Self> {
        let registry = registry();
        let desc = registry.describe(schema::TRANSACTION_RAW)?;
        Self::from_value(&codec::deserialize(registry, desc, buf)?)
    }
}

#[derive(PartialEq, Eq, Clone, Default, Debug)]
pub struct Transaction {
    pub raw_data: Option<TransactionRaw>,
    pub signature: Vec<Vec<u8>>,
}

impl Transaction {
    pub fn to_value(&self) -> MessageValue {
        let mut msg = MessageValue::new();
        if let Some(raw_data) = &self.raw_data {
            msg.set(1u32, Value::Message(raw_data.to_value()));
        }
        for sig in &self.signature {
            msg.push(2u32, Value::Bytes(sig.clone()));
        }
        msg
    }

    pub fn from_value(msg: &MessageValue) -> Result<Self> {
        let raw_data = match field_message(msg, 1)? {
            None => None,
            Some(nested) => Some(TransactionRaw::from_value(nested)?),
        };
        let mut signature = vec![];
        for elem in field_list(msg, 2)? {
            let sig = elem
                .as_bytes()
                .ok_or_else(|| anyhow!("signature element holds a {} value", elem.kind_name()))?;
            signature.push(sig.to_vec());
        }
        Ok(Self { raw_data, signature })
    }

    pub fn ser(&self) -> Result<Vec<u8>> {
        let registry = registry();
        let desc = registry.describe(schema::TRANSACTION)?;
        Ok(codec::serialize(registry, desc, &self.to_value())?)
    }

    pub fn deser(buf: &[u8]) -> Result<Self> {
        let registry = registry();
        let desc = registry.describe(schema::TRANSACTION)?;
        Self::from_value(&codec::deserialize(registry, desc, buf)?)
    }
}
