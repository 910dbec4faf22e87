//! Message-call, contract-creation and transaction processor bindings.
//!
//! These are the immutable parameter bundles the external execution engine is
//! driven by. Consensus-critical quirks (the RIPEMD-160 force-delete exception, the
//! 0xEF prefix rejection) are first-class data here rather than branches buried in
//! the execution pipeline.

use crate::{
    fee_market::FeeMarket,
    rules::{EvmSpec, PrecompileSet},
};
use alloy_primitives::Address;

/// Parameters of the message-call processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCallProcessor {
    /// The EVM interpreter executing call frames.
    pub evm: EvmSpec,
    /// The precompiled contracts reachable by calls.
    pub precompiles: PrecompileSet,
    /// Accounts deleted when empty at the end of a transaction regardless of whether
    /// the touching message frame succeeded.
    pub force_delete_when_empty: Vec<Address>,
}

impl MessageCallProcessor {
    /// A processor without force-delete exceptions.
    pub fn new(evm: EvmSpec, precompiles: PrecompileSet) -> Self {
        Self { evm, precompiles, force_delete_when_empty: Vec::new() }
    }

    /// A processor carrying force-delete exceptions.
    pub fn with_force_delete(
        evm: EvmSpec,
        precompiles: PrecompileSet,
        force_delete_when_empty: Vec<Address>,
    ) -> Self {
        Self { evm, precompiles, force_delete_when_empty }
    }
}

/// A validation rule applied to deployed contract code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CodeValidationRule {
    /// Deployed code may not exceed this size.
    MaxCodeSize(usize),
    /// Deployed code may not start with the 0xEF byte
    /// ([EIP-3541](https://eips.ethereum.org/EIPS/eip-3541)).
    RejectEfPrefix,
    /// Code starting with the EOF magic must be a container of the given version;
    /// full container validation is performed by the external EVM.
    EofValidation {
        /// The accepted container version.
        version: u8,
    },
}

/// Violations of the contract code rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeValidationError {
    /// The code exceeds the fork's size limit.
    #[error("contract code size {size} exceeds the limit of {limit}")]
    CodeTooLarge {
        /// Actual code size.
        size: usize,
        /// The enforced limit.
        limit: usize,
    },
    /// The code starts with the reserved 0xEF byte.
    #[error("contract code must not start with the 0xEF byte")]
    InvalidEfPrefix,
    /// The code looks like an EOF container of an unsupported version.
    #[error("unsupported EOF container version {version}")]
    UnsupportedEofVersion {
        /// The version byte found in the container.
        version: u8,
    },
}

/// Parameters of the contract-creation processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCreationProcessor {
    /// Whether an unpayable code deposit cost fails the creation (Homestead) or is
    /// silently skipped (Frontier).
    pub require_code_deposit_to_succeed: bool,
    /// Rules applied to the code being deployed, in order.
    pub code_rules: Vec<CodeValidationRule>,
    /// The nonce a freshly created contract account starts with.
    pub initial_contract_nonce: u64,
    /// Accounts deleted when empty regardless of the execution outcome.
    pub force_delete_when_empty: Vec<Address>,
}

impl ContractCreationProcessor {
    /// Validates deployed code against the fork's code rules.
    pub fn validate_code(&self, code: &[u8]) -> Result<(), CodeValidationError> {
        for rule in &self.code_rules {
            match rule {
                CodeValidationRule::MaxCodeSize(limit) => {
                    if code.len() > *limit {
                        return Err(CodeValidationError::CodeTooLarge {
                            size: code.len(),
                            limit: *limit,
                        })
                    }
                }
                CodeValidationRule::RejectEfPrefix => {
                    if code.first() == Some(&0xEF) {
                        return Err(CodeValidationError::InvalidEfPrefix)
                    }
                }
                CodeValidationRule::EofValidation { version } => {
                    // EOF containers start with the 0xEF00 magic followed by a
                    // version byte; anything else with the 0xEF prefix is invalid.
                    if code.first() == Some(&0xEF) {
                        match code.get(1..3) {
                            Some([0x00, v]) if v == version => {}
                            Some([0x00, v]) => {
                                return Err(CodeValidationError::UnsupportedEofVersion {
                                    version: *v,
                                })
                            }
                            _ => return Err(CodeValidationError::InvalidEfPrefix),
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// How the coinbase is credited for inclusion fees.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CoinbaseFeePrice {
    /// The full gas price of each transaction.
    Frontier,
    /// The EIP-1559 priority fee; the base fee is burned.
    Eip1559,
}

/// Parameters of the transaction processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionProcessor {
    /// Clear empty touched accounts at the end of the transaction
    /// ([EIP-158](https://eips.ethereum.org/EIPS/eip-158)).
    pub clear_empty_accounts: bool,
    /// Pre-warm the coinbase account ([EIP-3651](https://eips.ethereum.org/EIPS/eip-3651)).
    pub warm_coinbase: bool,
    /// Maximum depth of the message frame stack.
    pub stack_size_limit: usize,
    /// The fee market pricing this transaction.
    pub fee_market: FeeMarket,
    /// How the coinbase is credited.
    pub coinbase_fee_price: CoinbaseFeePrice,
}

/// Parameters of the private-transaction processor.
///
/// The privacy subsystem itself is an external collaborator; the rule bundle only
/// carries its configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateTransactionProcessor {
    /// Maximum depth of the message frame stack.
    pub stack_size_limit: usize,
    /// The chain id private transactions are validated against, if bound.
    pub chain_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EvmConfiguration, rules::EvmVariant};

    fn creation_processor(rules: Vec<CodeValidationRule>) -> ContractCreationProcessor {
        ContractCreationProcessor {
            require_code_deposit_to_succeed: true,
            code_rules: rules,
            initial_contract_nonce: 1,
            force_delete_when_empty: Vec::new(),
        }
    }

    #[test]
    fn max_code_size_rule() {
        let processor = creation_processor(vec![CodeValidationRule::MaxCodeSize(4)]);
        processor.validate_code(&[0u8; 4]).unwrap();
        let err = processor.validate_code(&[0u8; 5]).unwrap_err();
        assert_eq!(err, CodeValidationError::CodeTooLarge { size: 5, limit: 4 });
    }

    #[test]
    fn ef_prefix_rule() {
        let processor = creation_processor(vec![CodeValidationRule::RejectEfPrefix]);
        processor.validate_code(&[0x60, 0x00]).unwrap();
        assert_eq!(
            processor.validate_code(&[0xEF, 0x00]),
            Err(CodeValidationError::InvalidEfPrefix)
        );
    }

    #[test]
    fn eof_validation_rule() {
        let processor = creation_processor(vec![CodeValidationRule::EofValidation { version: 1 }]);
        // Legacy code passes through.
        processor.validate_code(&[0x60, 0x00]).unwrap();
        // A well-formed container of the accepted version passes.
        processor.validate_code(&[0xEF, 0x00, 0x01, 0x01]).unwrap();
        // Unknown versions and bare 0xEF prefixes are rejected.
        assert_eq!(
            processor.validate_code(&[0xEF, 0x00, 0x02]),
            Err(CodeValidationError::UnsupportedEofVersion { version: 2 })
        );
        assert_eq!(
            processor.validate_code(&[0xEF, 0x01]),
            Err(CodeValidationError::InvalidEfPrefix)
        );
    }

    #[test]
    fn force_delete_set_is_carried() {
        let evm = EvmSpec::new(EvmVariant::Frontier, EvmConfiguration::default());
        let processor = MessageCallProcessor::with_force_delete(
            evm,
            PrecompileSet::Frontier,
            crate::constants::SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        );
        assert_eq!(
            processor.force_delete_when_empty,
            vec![crate::constants::RIPEMD160_PRECOMPILE]
        );
    }
}
