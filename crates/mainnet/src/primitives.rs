//! Block and transaction primitives consumed by the protocol rules.
//!
//! These are the slim views the rule bundle operates on; full block import types
//! live with the external block importer.

use alloy_primitives::{Address, Bloom, Bytes, Log, TxKind, B256, B64, U256};

/// Transaction Type
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TxType {
    /// Legacy (pre-typed) transaction.
    #[default]
    Legacy = 0,
    /// Access-list transaction ([EIP-2930](https://eips.ethereum.org/EIPS/eip-2930)).
    AccessList = 1,
    /// Dynamic-fee transaction ([EIP-1559](https://eips.ethereum.org/EIPS/eip-1559)).
    Eip1559 = 2,
    /// Blob transaction ([EIP-4844](https://eips.ethereum.org/EIPS/eip-4844)).
    Blob = 3,
}

impl TxType {
    /// Returns `true` for the legacy, untyped wire form.
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy)
    }
}

impl From<TxType> for u8 {
    fn from(value: TxType) -> Self {
        value as Self
    }
}

impl TryFrom<u8> for TxType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Legacy,
            1 => Self::AccessList,
            2 => Self::Eip1559,
            3 => Self::Blob,
            _ => return Err(value),
        })
    }
}

/// Block header.
///
/// Mirrors the execution-layer header; fields introduced by later forks are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct BlockHeader {
    /// The Keccak 256-bit hash of the parent block's header.
    pub parent_hash: B256,
    /// The Keccak 256-bit hash of the ommers list portion of this block.
    pub ommers_hash: B256,
    /// The 160-bit address to which all fees collected from the successful mining of
    /// this block are transferred.
    pub beneficiary: Address,
    /// The Keccak 256-bit hash of the root node of the state trie, after all
    /// transactions are executed and finalisations applied.
    pub state_root: B256,
    /// The Keccak 256-bit hash of the root node of the trie structure populated with
    /// each transaction in the transactions list portion of the block.
    pub transactions_root: B256,
    /// The Keccak 256-bit hash of the root node of the trie structure populated with
    /// the receipts of each transaction in the transactions list portion of the block.
    pub receipts_root: B256,
    /// The Bloom filter composed from indexable information contained in each log
    /// entry from the receipt of each transaction.
    pub logs_bloom: Bloom,
    /// The block difficulty. Zero for post-merge blocks, whose `mix_hash` carries the
    /// RANDAO reveal instead of a proof-of-work seal.
    pub difficulty: U256,
    /// The number of ancestor blocks.
    pub number: u64,
    /// The current limit of gas expenditure per block.
    pub gas_limit: u64,
    /// The total gas used in transactions in this block.
    pub gas_used: u64,
    /// The Unix timestamp at this block's inception.
    pub timestamp: u64,
    /// An arbitrary byte array containing data relevant to this block; 32 bytes or
    /// fewer.
    pub extra_data: Bytes,
    /// Proof-of-work mix hash, reinterpreted as the RANDAO reveal after the merge.
    pub mix_hash: B256,
    /// Proof-of-work nonce; zero after the merge.
    pub nonce: B64,
    /// The base fee per gas, added in London.
    pub base_fee_per_gas: Option<u64>,
    /// The Keccak 256-bit hash of the withdrawals list, added in Shanghai.
    pub withdrawals_root: Option<B256>,
    /// The total amount of blob gas consumed by this block, added in Cancun.
    pub blob_gas_used: Option<u64>,
    /// The running total of blob gas consumed in excess of the target, added in
    /// Cancun.
    pub excess_blob_gas: Option<u64>,
    /// The hash of the parent beacon block's root, added in Cancun.
    pub parent_beacon_block_root: Option<B256>,
}

impl BlockHeader {
    /// Returns `true` if the ommers list this header commits to is empty.
    pub fn ommers_hash_is_empty(&self) -> bool {
        self.ommers_hash == crate::constants::EMPTY_OMMER_ROOT_HASH
    }

    /// Returns the RANDAO reveal carried by this header, i.e. its `mix_hash`.
    ///
    /// Only meaningful for post-merge headers.
    pub const fn prev_randao(&self) -> B256 {
        self.mix_hash
    }
}

/// The view of a transaction that protocol-level validation operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The transaction envelope type.
    pub tx_type: TxType,
    /// The chain id the transaction is bound to, if any.
    pub chain_id: Option<u64>,
    /// Call target, or create.
    pub kind: TxKind,
    /// Call data, or the init code for contract creations.
    pub input: Bytes,
    /// The gas limit of the transaction.
    pub gas_limit: u64,
}

impl Transaction {
    /// Returns `true` if the transaction is a contract creation.
    pub const fn is_create(&self) -> bool {
        matches!(self.kind, TxKind::Create)
    }
}

/// Withdrawal represents a validator withdrawal from the consensus layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, serde::Serialize, serde::Deserialize)]
pub struct Withdrawal {
    /// Monotonically increasing identifier issued by consensus layer.
    pub index: u64,
    /// Index of validator associated with withdrawal.
    pub validator_index: u64,
    /// Target address for withdrawn ether.
    pub address: Address,
    /// Value of the withdrawal in gwei.
    pub amount: u64,
}

impl Withdrawal {
    /// Return the withdrawal amount in wei.
    pub fn amount_wei(&self) -> U256 {
        U256::from(self.amount) * U256::from(1_000_000_000u64)
    }
}

/// A deposit receipt bridged from the consensus layer
/// ([EIP-6110](https://eips.ethereum.org/EIPS/eip-6110)).
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Deposit {
    /// Validator public key.
    pub pubkey: Bytes,
    /// Withdrawal credentials.
    pub withdrawal_credentials: B256,
    /// Deposited amount in gwei.
    pub amount: u64,
    /// Deposit signature.
    pub signature: Bytes,
    /// Deposit index.
    pub index: u64,
}

/// The outcome of executing a single transaction, as reported by the external
/// transaction processor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionProcessingResult {
    /// Whether the top-level message frame completed successfully.
    pub successful: bool,
    /// Logs emitted during execution.
    pub logs: Vec<Log>,
    /// The output of a `REVERT`, when the transaction reverted with one.
    pub revert_reason: Option<Bytes>,
}

impl TransactionProcessingResult {
    /// A successful result with the given logs.
    pub fn successful(logs: Vec<Log>) -> Self {
        Self { successful: true, logs, revert_reason: None }
    }

    /// A failed result carrying an optional revert reason.
    pub fn failed(revert_reason: Option<Bytes>) -> Self {
        Self { successful: false, logs: Vec::new(), revert_reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_type_u8_roundtrip() {
        for tx_type in [TxType::Legacy, TxType::AccessList, TxType::Eip1559, TxType::Blob] {
            assert_eq!(TxType::try_from(u8::from(tx_type)), Ok(tx_type));
        }
        assert_eq!(TxType::try_from(4u8), Err(4));
    }

    #[test]
    fn withdrawal_amount_in_wei() {
        let withdrawal = Withdrawal { amount: 3, ..Default::default() };
        assert_eq!(withdrawal.amount_wei(), U256::from(3_000_000_000u64));
    }
}
