//! Transaction receipts and the per-fork receipt factories.
//!
//! Four wire forms exist across the fork history:
//!
//! | Variant          | Outcome field | Revert reason | Type prefix |
//! |------------------|---------------|---------------|-------------|
//! | Frontier         | state root    | no            | no          |
//! | Byzantium        | 0/1 status    | no            | no          |
//! | Byzantium+reason | 0/1 status    | if reverted   | no          |
//! | Berlin (typed)   | 0/1 status    | optional      | yes         |
//!
//! The revert reason is never part of the consensus encoding; receipts that carry
//! one append it as a trailing field in the storage form only.

use crate::primitives::{TransactionProcessingResult, TxType};
use alloy_primitives::{logs_bloom, Bloom, Bytes, Log, B256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};

/// The execution outcome committed in a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Pre-Byzantium: the world state root after the transaction.
    StateRoot(B256),
    /// [EIP-658](https://eips.ethereum.org/EIPS/eip-658): the 0/1 status code.
    Status(bool),
}

impl TransactionOutcome {
    fn length(&self) -> usize {
        match self {
            Self::StateRoot(root) => root.length(),
            Self::Status(status) => status.length(),
        }
    }

    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::StateRoot(root) => root.encode(out),
            Self::Status(status) => status.encode(out),
        }
    }
}

/// Receipt containing the result of a transaction execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Receipt type.
    pub tx_type: TxType,
    /// State root or status code, depending on the fork.
    pub outcome: TransactionOutcome,
    /// Gas used by the block up to and including this transaction.
    pub cumulative_gas_used: u64,
    /// Logs emitted by the transaction.
    pub logs: Vec<Log>,
    /// Bloom filter over the logs.
    pub logs_bloom: Bloom,
    /// Revert reason, when the creating factory was configured to carry one.
    pub revert_reason: Option<Bytes>,
}

impl TransactionReceipt {
    /// Returns `true` if the receipt reports a successful execution.
    ///
    /// Pre-Byzantium receipts carry no status; they always report success.
    pub fn is_successful(&self) -> bool {
        match self.outcome {
            TransactionOutcome::StateRoot(_) => true,
            TransactionOutcome::Status(status) => status,
        }
    }

    fn rlp_encoded_fields_length(&self, with_reason: bool) -> usize {
        let mut len = self.outcome.length() +
            self.cumulative_gas_used.length() +
            self.logs_bloom.length() +
            self.logs.length();
        if with_reason {
            if let Some(reason) = &self.revert_reason {
                len += reason.length();
            }
        }
        len
    }

    fn rlp_encode_fields(&self, with_reason: bool, out: &mut dyn BufMut) {
        self.outcome.encode(out);
        self.cumulative_gas_used.encode(out);
        self.logs_bloom.encode(out);
        self.logs.encode(out);
        if with_reason {
            if let Some(reason) = &self.revert_reason {
                reason.encode(out);
            }
        }
    }

    fn rlp_header(&self, with_reason: bool) -> Header {
        Header { list: true, payload_length: self.rlp_encoded_fields_length(with_reason) }
    }

    fn eip2718_encoded_length(&self, with_reason: bool) -> usize {
        self.rlp_header(with_reason).length_with_payload() +
            // account for the type prefix
            !self.tx_type.is_legacy() as usize
    }

    fn eip2718_encode(&self, with_reason: bool, out: &mut dyn BufMut) {
        if !self.tx_type.is_legacy() {
            out.put_u8(self.tx_type.into());
        }
        self.rlp_header(with_reason).encode(out);
        self.rlp_encode_fields(with_reason, out);
    }

    fn rlp_encode(&self, with_reason: bool, out: &mut dyn BufMut) {
        if !self.tx_type.is_legacy() {
            Header { list: false, payload_length: self.eip2718_encoded_length(with_reason) }
                .encode(out);
        }
        self.eip2718_encode(with_reason, out);
    }

    fn rlp_encoded_length(&self, with_reason: bool) -> usize {
        let mut len = self.eip2718_encoded_length(with_reason);
        if !self.tx_type.is_legacy() {
            len += Header { list: false, payload_length: len }.length();
        }
        len
    }

    /// Encodes the storage form, which appends the revert reason when one is
    /// carried. The [`Encodable`] impl produces the consensus form.
    pub fn encode_with_revert_reason(&self, out: &mut dyn BufMut) {
        self.rlp_encode(true, out);
    }

    /// Decodes the storage form produced by [`Self::encode_with_revert_reason`].
    pub fn decode_with_revert_reason(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::rlp_decode(buf, true)
    }

    fn decode_receipt(
        buf: &mut &[u8],
        tx_type: TxType,
        with_reason: bool,
    ) -> alloy_rlp::Result<Self> {
        let b = &mut &**buf;
        let rlp_head = Header::decode(b)?;
        if !rlp_head.list {
            return Err(alloy_rlp::Error::UnexpectedString)
        }
        let started_len = b.len();

        // A state root encodes as a 32-byte string, a status code as a single byte.
        let outcome = if b.first() == Some(&0xa0) {
            TransactionOutcome::StateRoot(Decodable::decode(b)?)
        } else {
            TransactionOutcome::Status(Decodable::decode(b)?)
        };
        let cumulative_gas_used = Decodable::decode(b)?;
        let logs_bloom = Decodable::decode(b)?;
        let logs = Decodable::decode(b)?;

        let consumed = started_len - b.len();
        let revert_reason = if with_reason && rlp_head.payload_length > consumed {
            Some(Bytes::decode(b)?)
        } else {
            None
        };

        let consumed = started_len - b.len();
        if consumed != rlp_head.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: rlp_head.payload_length,
                got: consumed,
            })
        }
        *buf = *b;
        Ok(Self { tx_type, outcome, cumulative_gas_used, logs, logs_bloom, revert_reason })
    }

    fn rlp_decode(buf: &mut &[u8], with_reason: bool) -> alloy_rlp::Result<Self> {
        let header_buf = &mut &**buf;
        let header = Header::decode(header_buf)?;

        if header.list {
            return Self::decode_receipt(buf, TxType::Legacy, with_reason)
        }

        *buf = *header_buf;
        let remaining = buf.len();
        let tx_type = match buf.first() {
            Some(&byte) => TxType::try_from(byte).map_err(|_| {
                alloy_rlp::Error::Custom("unexpected transaction type byte")
            })?,
            None => return Err(alloy_rlp::Error::InputTooShort),
        };
        *buf = &buf[1..];
        let this = Self::decode_receipt(buf, tx_type, with_reason)?;

        if buf.len() + header.payload_length != remaining {
            return Err(alloy_rlp::Error::UnexpectedLength)
        }

        Ok(this)
    }
}

impl Encodable for TransactionReceipt {
    fn encode(&self, out: &mut dyn BufMut) {
        self.rlp_encode(false, out);
    }

    fn length(&self) -> usize {
        self.rlp_encoded_length(false)
    }
}

impl Decodable for TransactionReceipt {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::rlp_decode(buf, false)
    }
}

/// The per-fork receipt factory.
///
/// Factories are pure: the same inputs always produce the same receipt value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransactionReceiptFactory {
    /// Pre-Byzantium state-root form. The envelope type is ignored: only legacy
    /// transactions existed.
    Frontier,
    /// Status form, untyped.
    Byzantium {
        /// Carry the revert reason out of band.
        with_revert_reason: bool,
    },
    /// Status form with the envelope type carried ([EIP-2718](https://eips.ethereum.org/EIPS/eip-2718)).
    Berlin {
        /// Carry the revert reason out of band.
        with_revert_reason: bool,
    },
}

impl TransactionReceiptFactory {
    /// Creates the receipt for one executed transaction.
    pub fn create(
        &self,
        tx_type: TxType,
        result: &TransactionProcessingResult,
        world_state_root: B256,
        cumulative_gas_used: u64,
    ) -> TransactionReceipt {
        let logs_bloom = logs_bloom(result.logs.iter());
        match self {
            Self::Frontier => TransactionReceipt {
                tx_type: TxType::Legacy,
                outcome: TransactionOutcome::StateRoot(world_state_root),
                cumulative_gas_used,
                logs: result.logs.clone(),
                logs_bloom,
                revert_reason: None,
            },
            Self::Byzantium { with_revert_reason } => TransactionReceipt {
                tx_type: TxType::Legacy,
                outcome: TransactionOutcome::Status(result.successful),
                cumulative_gas_used,
                logs: result.logs.clone(),
                logs_bloom,
                revert_reason: with_revert_reason
                    .then(|| result.revert_reason.clone())
                    .flatten(),
            },
            Self::Berlin { with_revert_reason } => TransactionReceipt {
                tx_type,
                outcome: TransactionOutcome::Status(result.successful),
                cumulative_gas_used,
                logs: result.logs.clone(),
                logs_bloom,
                revert_reason: with_revert_reason
                    .then(|| result.revert_reason.clone())
                    .flatten(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, bytes, hex_literal::hex};
    use proptest::prelude::*;

    // Test vector from: https://eips.ethereum.org/EIPS/eip-2481
    #[test]
    fn encode_legacy_status_receipt() {
        let expected = hex!("f901668001b9010000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000f85ff85d940000000000000000000000000000000000000011f842a0000000000000000000000000000000000000000000000000000000000000deada0000000000000000000000000000000000000000000000000000000000000beef830100ff");

        let receipt = TransactionReceipt {
            tx_type: TxType::Legacy,
            outcome: TransactionOutcome::Status(false),
            cumulative_gas_used: 0x1,
            logs: vec![Log::new_unchecked(
                address!("0000000000000000000000000000000000000011"),
                vec![
                    b256!("000000000000000000000000000000000000000000000000000000000000dead"),
                    b256!("000000000000000000000000000000000000000000000000000000000000beef"),
                ],
                bytes!("0100ff"),
            )],
            logs_bloom: [0; 256].into(),
            revert_reason: None,
        };

        let mut data = Vec::with_capacity(expected.len());
        receipt.encode(&mut data);

        assert_eq!(receipt.length(), expected.len());
        assert_eq!(data, expected);
    }

    // Test vector from: https://eips.ethereum.org/EIPS/eip-2481
    #[test]
    fn decode_legacy_status_receipt() {
        let data = hex!("f901668001b9010000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000f85ff85d940000000000000000000000000000000000000011f842a0000000000000000000000000000000000000000000000000000000000000deada0000000000000000000000000000000000000000000000000000000000000beef830100ff");

        let receipt = TransactionReceipt::decode(&mut &data[..]).unwrap();
        assert_eq!(receipt.tx_type, TxType::Legacy);
        assert_eq!(receipt.outcome, TransactionOutcome::Status(false));
        assert_eq!(receipt.cumulative_gas_used, 0x1);
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.revert_reason, None);
    }

    #[test]
    fn state_root_receipt_roundtrip() {
        let receipt = TransactionReceipt {
            tx_type: TxType::Legacy,
            outcome: TransactionOutcome::StateRoot(b256!(
                "a4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3"
            )),
            cumulative_gas_used: 21_000,
            logs: vec![],
            logs_bloom: Bloom::default(),
            revert_reason: None,
        };

        let mut data = Vec::new();
        receipt.encode(&mut data);
        let decoded = TransactionReceipt::decode(&mut &data[..]).unwrap();
        assert_eq!(decoded, receipt);
    }

    #[test]
    fn typed_receipt_roundtrip() {
        let receipt = TransactionReceipt {
            tx_type: TxType::AccessList,
            outcome: TransactionOutcome::Status(true),
            cumulative_gas_used: 21_000,
            logs: vec![],
            logs_bloom: Bloom::default(),
            revert_reason: None,
        };

        let mut data = Vec::new();
        receipt.encode(&mut data);
        let decoded = TransactionReceipt::decode(&mut &data[..]).unwrap();
        assert_eq!(decoded, receipt);
    }

    #[test]
    fn revert_reason_storage_roundtrip() {
        let receipt = TransactionReceipt {
            tx_type: TxType::Eip1559,
            outcome: TransactionOutcome::Status(false),
            cumulative_gas_used: 40_000,
            logs: vec![],
            logs_bloom: Bloom::default(),
            revert_reason: Some(bytes!("08c379a0")),
        };

        let mut storage = Vec::new();
        receipt.encode_with_revert_reason(&mut storage);
        let decoded = TransactionReceipt::decode_with_revert_reason(&mut &storage[..]).unwrap();
        assert_eq!(decoded, receipt);

        // The consensus form drops the reason.
        let mut consensus = Vec::new();
        receipt.encode(&mut consensus);
        assert!(consensus.len() < storage.len());
        let decoded = TransactionReceipt::decode(&mut &consensus[..]).unwrap();
        assert_eq!(decoded.revert_reason, None);
    }

    proptest! {
        #[test]
        fn status_receipts_roundtrip(
            success in any::<bool>(),
            gas in any::<u64>(),
            type_byte in 0u8..4,
            reason in proptest::option::of(proptest::collection::vec(any::<u8>(), 0..64)),
        ) {
            let receipt = TransactionReceipt {
                tx_type: TxType::try_from(type_byte).unwrap(),
                outcome: TransactionOutcome::Status(success),
                cumulative_gas_used: gas,
                logs: vec![],
                logs_bloom: Bloom::default(),
                revert_reason: reason.map(Bytes::from),
            };

            let mut storage = Vec::new();
            receipt.encode_with_revert_reason(&mut storage);
            let decoded = TransactionReceipt::decode_with_revert_reason(&mut &storage[..]).unwrap();
            prop_assert_eq!(decoded, receipt);
        }
    }

    #[test]
    fn frontier_factory_commits_state_root() {
        let root = b256!("a4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3");
        let result = TransactionProcessingResult::successful(vec![]);
        let receipt =
            TransactionReceiptFactory::Frontier.create(TxType::Legacy, &result, root, 21_000);
        assert_eq!(receipt.outcome, TransactionOutcome::StateRoot(root));
        assert_eq!(receipt.tx_type, TxType::Legacy);
    }

    #[test]
    fn byzantium_factory_reason_flag() {
        let result = TransactionProcessingResult::failed(Some(bytes!("dead")));
        let without = TransactionReceiptFactory::Byzantium { with_revert_reason: false }
            .create(TxType::Legacy, &result, B256::ZERO, 21_000);
        assert_eq!(without.revert_reason, None);
        assert_eq!(without.outcome, TransactionOutcome::Status(false));

        let with = TransactionReceiptFactory::Byzantium { with_revert_reason: true }
            .create(TxType::Legacy, &result, B256::ZERO, 21_000);
        assert_eq!(with.revert_reason, Some(bytes!("dead")));
    }

    #[test]
    fn berlin_factory_carries_type() {
        let result = TransactionProcessingResult::successful(vec![]);
        let receipt = TransactionReceiptFactory::Berlin { with_revert_reason: false }.create(
            TxType::AccessList,
            &result,
            B256::ZERO,
            21_000,
        );
        assert_eq!(receipt.tx_type, TxType::AccessList);
        assert_eq!(receipt.outcome, TransactionOutcome::Status(true));
        assert_eq!(receipt.cumulative_gas_used, 21_000);
        assert_eq!(receipt.revert_reason, None);
    }
}
