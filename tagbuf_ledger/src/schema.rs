//! Wire schema of the ledger message set, declared as descriptor data.
//!
//! Field numbers mirror the upstream protocol definitions and are stable
//! identifiers: new numbers may be added, existing ones never reused.

use std::sync::OnceLock;
use tagbuf_types::schema::{
    EnumDescriptor, FieldDescriptor, FieldKind, MapKeyKind, MessageDescriptor, SchemaRegistry,
};

pub const ACCOUNT_TYPE: &str = "ledger.AccountType";
pub const CONTRACT_TYPE: &str = "ledger.ContractType";
pub const VOTE: &str = "ledger.Vote";
pub const ACCOUNT: &str = "ledger.Account";
pub const ANY: &str = "ledger.Any";
pub const TRANSFER_CONTRACT: &str = "ledger.TransferContract";
pub const CONTRACT: &str = "ledger.Contract";
pub const TRANSACTION_RAW: &str = "ledger.TransactionRaw";
pub const TRANSACTION: &str = "ledger.Transaction";
pub const BLOCK_HEADER_RAW: &str = "ledger.BlockHeaderRaw";
pub const BLOCK_HEADER: &str = "ledger.BlockHeader";
pub const BLOCK: &str = "ledger.Block";
pub const NODE_INFO: &str = "ledger.NodeInfo";

/// The shared, read-only registry for every ledger message type.
pub fn registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        // The declarations below are fixed data; build() re-validates them
        // on first use.
        build_registry().expect("ledger schema declarations are self-consistent")
    })
}

fn build_registry() -> Result<SchemaRegistry, tagbuf_types::SchemaError> {
    SchemaRegistry::builder()
        .enumeration(EnumDescriptor::new(
            ACCOUNT_TYPE,
            vec![("Normal", 0), ("AssetIssue", 1), ("Contract", 2)],
        ))
        .enumeration(EnumDescriptor::new(
            CONTRACT_TYPE,
            vec![
                ("AccountCreateContract", 0),
                ("TransferContract", 1),
                ("VoteWitnessContract", 4),
                ("AccountPermissionUpdateContract", 46),
            ],
        ))
        .message(MessageDescriptor::new(
            VOTE,
            vec![
                FieldDescriptor::singular(1, "vote_address", FieldKind::Bytes),
                FieldDescriptor::singular(2, "vote_count", FieldKind::Int64),
            ],
        ))
        .message(MessageDescriptor::new(
            ACCOUNT,
            vec![
                FieldDescriptor::singular(1, "account_name", FieldKind::Bytes),
                FieldDescriptor::singular(2, "type", FieldKind::Enum(String::from(ACCOUNT_TYPE))),
                FieldDescriptor::singular(3, "address", FieldKind::Bytes),
                FieldDescriptor::singular(4, "balance", FieldKind::Int64),
                FieldDescriptor::repeated(5, "votes", FieldKind::Message(String::from(VOTE))),
                FieldDescriptor::singular(
                    6,
                    "asset",
                    FieldKind::map(MapKeyKind::Str, FieldKind::Int64),
                ),
                FieldDescriptor::singular(9, "create_time", FieldKind::Int64),
            ],
        ))
        .message(MessageDescriptor::new(
            ANY,
            vec![
                FieldDescriptor::singular(1, "type_url", FieldKind::Str),
                FieldDescriptor::singular(2, "value", FieldKind::Bytes),
            ],
        ))
        .message(MessageDescriptor::new(
            TRANSFER_CONTRACT,
            vec![
                FieldDescriptor::singular(1, "owner_address", FieldKind::Bytes),
                FieldDescriptor::singular(2, "to_address", FieldKind::Bytes),
                FieldDescriptor::singular(3, "amount", FieldKind::Int64),
            ],
        ))
        .message(MessageDescriptor::new(
            CONTRACT,
            vec![
                FieldDescriptor::singular(1, "type", FieldKind::Enum(String::from(CONTRACT_TYPE))),
                FieldDescriptor::singular(2, "parameter", FieldKind::Message(String::from(ANY))),
            ],
        ))
        .message(MessageDescriptor::new(
            TRANSACTION_RAW,
            vec![
                FieldDescriptor::singular(1, "ref_block_bytes", FieldKind::Bytes),
                FieldDescriptor::singular(4, "ref_block_hash", FieldKind::Bytes),
                FieldDescriptor::singular(8, "expiration", FieldKind::Int64),
                FieldDescriptor::repeated(
                    11,
                    "contract",
                    FieldKind::Message(String::from(CONTRACT)),
                ),
                FieldDescriptor::singular(14, "timestamp", FieldKind::Int64),
            ],
        ))
        .message(MessageDescriptor::new(
            TRANSACTION,
            vec![
                FieldDescriptor::singular(
                    1,
                    "raw_data",
                    FieldKind::Message(String::from(TRANSACTION_RAW)),
                ),
                FieldDescriptor::repeated(2, "signature", FieldKind::Bytes),
            ],
        ))
        .message(MessageDescriptor::new(
            BLOCK_HEADER_RAW,
            vec![
                FieldDescriptor::singular(1, "timestamp", FieldKind::Int64),
                FieldDescriptor::singular(2, "tx_trie_root", FieldKind::Bytes),
                FieldDescriptor::singular(3, "parent_hash", FieldKind::Bytes),
                FieldDescriptor::singular(7, "number", FieldKind::Int64),
                FieldDescriptor::singular(9, "witness_address", FieldKind::Bytes),
            ],
        ))
        .message(MessageDescriptor::new(
            BLOCK_HEADER,
            vec![
                FieldDescriptor::singular(
                    1,
                    "raw_data",
                    FieldKind::Message(String::from(BLOCK_HEADER_RAW)),
                ),
                FieldDescriptor::singular(2, "witness_signature", FieldKind::Bytes),
            ],
        ))
        .message(MessageDescriptor::new(
            BLOCK,
            vec![
                FieldDescriptor::repeated(
                    1,
                    "transactions",
                    FieldKind::Message(String::from(TRANSACTION)),
                ),
                FieldDescriptor::singular(
                    2,
                    "block_header",
                    FieldKind::Message(String::from(BLOCK_HEADER)),
                ),
            ],
        ))
        .message(MessageDescriptor::new(
            NODE_INFO,
            vec![
                FieldDescriptor::singular(1, "begin_sync_num", FieldKind::Int64),
                FieldDescriptor::singular(2, "block", FieldKind::Str),
                FieldDescriptor::singular(3, "solidity_block", FieldKind::Str),
                FieldDescriptor::singular(4, "current_connect_count", FieldKind::Int32),
                FieldDescriptor::singular(
                    5,
                    "config",
                    FieldKind::map(MapKeyKind::Str, FieldKind::Str),
                ),
            ],
        ))
        .build()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registry_builds_and_resolves() {
        let registry = registry();
        for type_name in [
            VOTE,
            ACCOUNT,
            ANY,
            TRANSFER_CONTRACT,
            CONTRACT,
            TRANSACTION_RAW,
            TRANSACTION,
            BLOCK_HEADER_RAW,
            BLOCK_HEADER,
            BLOCK,
            NODE_INFO,
        ] {
            assert!(registry.describe(type_name).is_ok(), "{type_name}");
        }
        assert!(registry.describe_enum(ACCOUNT_TYPE).is_ok());
        assert!(registry.describe_enum(CONTRACT_TYPE).is_ok());
    }
}
