//! Protocol-level transaction validation.
//!
//! Only the rules that the fork registry swaps per fork live here: envelope type
//! acceptance, chain-id binding, signature malleability and the init-code bound.
//! Balance, nonce and signature recovery checks belong to the external transaction
//! pool and processor.

use crate::primitives::{Transaction, TxType};

/// Transactions rejected by the protocol-level validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTransaction {
    /// The transaction envelope type is not accepted by the current fork.
    #[error("transaction type {tx_type:?} is not supported")]
    TypeNotSupported {
        /// The offending envelope type.
        tx_type: TxType,
    },
    /// The transaction is bound to a different chain.
    #[error("transaction chain id {got} does not match the chain id {expected}")]
    WrongChainId {
        /// The chain id of this chain.
        expected: u64,
        /// The chain id the transaction is bound to.
        got: u64,
    },
    /// The transaction carries a chain id but replay protection is not yet active.
    #[error("chain id transactions are not yet supported")]
    ReplayProtectionUnsupported,
    /// The init code of a creation transaction exceeds the fork's bound.
    #[error("init code size {size} exceeds the limit of {limit}")]
    InitCodeTooLarge {
        /// Actual init code size.
        size: usize,
        /// The enforced limit.
        limit: usize,
    },
}

/// The per-fork transaction validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionValidator {
    /// Envelope types accepted by this fork.
    pub accepted_types: Vec<TxType>,
    /// The chain id transactions may bind to, once replay protection is active.
    pub chain_id: Option<u64>,
    /// Reject upper-half signature s values (Homestead).
    pub check_signature_malleability: bool,
    /// Accept chain-bound transactions ([EIP-155](https://eips.ethereum.org/EIPS/eip-155)).
    pub replay_protection: bool,
    /// Maximum init code size of creation transactions
    /// ([EIP-3860](https://eips.ethereum.org/EIPS/eip-3860)).
    pub max_init_code_size: usize,
    /// GoQuorum-compatible validation mode.
    pub quorum_compatibility_mode: bool,
}

impl TransactionValidator {
    /// Validates the protocol-level rules for `transaction`.
    pub fn validate(&self, transaction: &Transaction) -> Result<(), InvalidTransaction> {
        if !self.accepted_types.contains(&transaction.tx_type) {
            return Err(InvalidTransaction::TypeNotSupported { tx_type: transaction.tx_type })
        }

        if let Some(tx_chain_id) = transaction.chain_id {
            if !self.replay_protection {
                return Err(InvalidTransaction::ReplayProtectionUnsupported)
            }
            if let Some(chain_id) = self.chain_id {
                if tx_chain_id != chain_id {
                    return Err(InvalidTransaction::WrongChainId {
                        expected: chain_id,
                        got: tx_chain_id,
                    })
                }
            }
        }

        if transaction.is_create() && transaction.input.len() > self.max_init_code_size {
            return Err(InvalidTransaction::InitCodeTooLarge {
                size: transaction.input.len(),
                limit: self.max_init_code_size,
            })
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, TxKind};

    fn legacy_tx() -> Transaction {
        Transaction {
            tx_type: TxType::Legacy,
            chain_id: None,
            kind: TxKind::Call(Address::ZERO),
            input: Bytes::new(),
            gas_limit: 21_000,
        }
    }

    fn validator() -> TransactionValidator {
        TransactionValidator {
            accepted_types: vec![TxType::Legacy],
            chain_id: Some(1),
            check_signature_malleability: true,
            replay_protection: true,
            max_init_code_size: usize::MAX,
            quorum_compatibility_mode: false,
        }
    }

    #[test]
    fn accepts_plain_legacy() {
        validator().validate(&legacy_tx()).unwrap();
    }

    #[test]
    fn rejects_unknown_type() {
        let tx = Transaction { tx_type: TxType::Blob, ..legacy_tx() };
        assert_eq!(
            validator().validate(&tx),
            Err(InvalidTransaction::TypeNotSupported { tx_type: TxType::Blob })
        );
    }

    #[test]
    fn rejects_foreign_chain_id() {
        let tx = Transaction { chain_id: Some(61), ..legacy_tx() };
        assert_eq!(
            validator().validate(&tx),
            Err(InvalidTransaction::WrongChainId { expected: 1, got: 61 })
        );
    }

    #[test]
    fn rejects_chain_id_before_replay_protection() {
        let mut validator = validator();
        validator.replay_protection = false;
        let tx = Transaction { chain_id: Some(1), ..legacy_tx() };
        assert_eq!(
            validator.validate(&tx),
            Err(InvalidTransaction::ReplayProtectionUnsupported)
        );
    }

    #[test]
    fn rejects_oversized_init_code() {
        let mut validator = validator();
        validator.max_init_code_size = 49_152;
        let tx = Transaction {
            kind: TxKind::Create,
            input: Bytes::from(vec![0u8; 49_153]),
            ..legacy_tx()
        };
        assert_eq!(
            validator.validate(&tx),
            Err(InvalidTransaction::InitCodeTooLarge { size: 49_153, limit: 49_152 })
        );

        let tx = Transaction {
            kind: TxKind::Create,
            input: Bytes::from(vec![0u8; 49_152]),
            ..legacy_tx()
        };
        validator.validate(&tx).unwrap();
    }
}
