//! Block header validation rules.
//!
//! Each fork binds a header validator assembled from named rules. Seal checking is
//! recorded as a rule so the external engine knows which hasher to run, but the
//! cryptographic verification itself happens outside this crate.

use crate::{
    constants::MAXIMUM_EXTRA_DATA_SIZE,
    dao::DAO_EXTRA_DATA,
    fee_market::BaseFeeMarket,
    gas_limit::{GasLimitCalculator, InvalidGasLimit},
    primitives::BlockHeader,
    rules::PowHasher,
};
use alloy_primitives::{Bytes, B64, U256};

/// Violations of the header validation rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderValidationError {
    /// The header used more gas than its own limit.
    #[error("block used gas {gas_used} is greater than the gas limit {gas_limit}")]
    GasUsedExceedsGasLimit {
        /// The used gas.
        gas_used: u64,
        /// The gas limit.
        gas_limit: u64,
    },
    /// The extra data field exceeds its bound.
    #[error("extra data of length {len} exceeds the maximum of {MAXIMUM_EXTRA_DATA_SIZE}")]
    ExtraDataExceedsMax {
        /// Length of the offending extra data.
        len: usize,
    },
    /// The timestamp does not advance past the parent's.
    #[error("block timestamp {timestamp} is not after the parent timestamp {parent_timestamp}")]
    TimestampIsInPast {
        /// The parent timestamp.
        parent_timestamp: u64,
        /// The offending timestamp.
        timestamp: u64,
    },
    /// The gas limit moved outside its bound.
    #[error(transparent)]
    GasLimit(#[from] InvalidGasLimit),
    /// The base fee is missing on a block governed by a base-fee market.
    #[error("base fee missing")]
    BaseFeeMissing,
    /// The base fee does not follow from the parent block.
    #[error("base fee mismatch: got {got}, expected {expected}")]
    BaseFeeDiff {
        /// The expected base fee.
        expected: u64,
        /// The base fee found in the header.
        got: u64,
    },
    /// A block inside the DAO recovery window does not carry the fork marker.
    #[error("missing DAO hard fork extra data, got {got}")]
    InvalidDaoExtraData {
        /// The extra data found in the header.
        got: Bytes,
    },
    /// A post-merge header carries a non-zero difficulty.
    #[error("difficulty {difficulty} is not zero after the merge")]
    TheMergeDifficultyIsNotZero {
        /// The offending difficulty.
        difficulty: U256,
    },
    /// A post-merge header carries a non-zero nonce.
    #[error("nonce is not zero after the merge")]
    TheMergeNonceIsNotZero,
    /// A post-merge header commits to ommers.
    #[error("ommer root is not empty after the merge")]
    TheMergeOmmerRootIsNotEmpty,
}

/// A single named header validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValidationRule {
    /// `gas_used <= gas_limit`.
    GasUsedWithinLimit,
    /// Extra data is at most [`MAXIMUM_EXTRA_DATA_SIZE`] bytes.
    ExtraDataMax,
    /// The timestamp is strictly after the parent's.
    TimestampMoreRecentThanParent,
    /// The gas limit stays within its per-block bound.
    GasLimit(GasLimitCalculator),
    /// The base fee is present and follows from the parent.
    BaseFee(BaseFeeMarket),
    /// The proof-of-work seal verifies under the given hasher. Checked by the
    /// external consensus engine.
    ProofOfWorkSeal(PowHasher),
    /// The header carries the `dao-hard-fork` extra-data marker. Bound only by the
    /// spec governing the DAO recovery window.
    DaoExtraData,
    /// Post-merge header shape: zero difficulty, zero nonce, no ommers.
    MergeRules,
}

/// A header validator assembled from named rules.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeaderValidator {
    rules: Vec<HeaderValidationRule>,
}

impl BlockHeaderValidator {
    /// The classic proof-of-work validator.
    pub fn create(pow_hasher: PowHasher, gas_limit: GasLimitCalculator) -> Self {
        Self {
            rules: vec![
                HeaderValidationRule::GasUsedWithinLimit,
                HeaderValidationRule::ExtraDataMax,
                HeaderValidationRule::TimestampMoreRecentThanParent,
                HeaderValidationRule::GasLimit(gas_limit),
                HeaderValidationRule::ProofOfWorkSeal(pow_hasher),
            ],
        }
    }

    /// The DAO recovery-window validator: the classic rules plus the extra-data
    /// marker.
    pub fn create_dao_validator(pow_hasher: PowHasher, gas_limit: GasLimitCalculator) -> Self {
        let mut validator = Self::create(pow_hasher, gas_limit);
        validator.rules.push(HeaderValidationRule::DaoExtraData);
        validator
    }

    /// The base-fee-market validator used from London on.
    pub fn create_base_fee_market_validator(
        pow_hasher: PowHasher,
        gas_limit: GasLimitCalculator,
        fee_market: BaseFeeMarket,
    ) -> Self {
        let mut validator = Self::create(pow_hasher, gas_limit);
        validator.rules.push(HeaderValidationRule::BaseFee(fee_market));
        validator
    }

    /// The post-merge validator: no proof-of-work seal, zero difficulty, the mix
    /// hash carries the RANDAO reveal.
    pub fn merge_block_header_validator(
        gas_limit: GasLimitCalculator,
        fee_market: BaseFeeMarket,
    ) -> Self {
        Self {
            rules: vec![
                HeaderValidationRule::GasUsedWithinLimit,
                HeaderValidationRule::ExtraDataMax,
                HeaderValidationRule::TimestampMoreRecentThanParent,
                HeaderValidationRule::GasLimit(gas_limit),
                HeaderValidationRule::BaseFee(fee_market),
                HeaderValidationRule::MergeRules,
            ],
        }
    }

    /// The relaxed validator applied to ommer headers under the legacy fee market.
    pub fn create_legacy_fee_market_ommer_validator(
        pow_hasher: PowHasher,
        gas_limit: GasLimitCalculator,
    ) -> Self {
        Self {
            rules: vec![
                HeaderValidationRule::GasUsedWithinLimit,
                HeaderValidationRule::ExtraDataMax,
                HeaderValidationRule::GasLimit(gas_limit),
                HeaderValidationRule::ProofOfWorkSeal(pow_hasher),
            ],
        }
    }

    /// The relaxed ommer validator under a base-fee market.
    pub fn create_base_fee_market_ommer_validator(
        pow_hasher: PowHasher,
        gas_limit: GasLimitCalculator,
        fee_market: BaseFeeMarket,
    ) -> Self {
        let mut validator = Self::create_legacy_fee_market_ommer_validator(pow_hasher, gas_limit);
        validator.rules.push(HeaderValidationRule::BaseFee(fee_market));
        validator
    }

    /// The rules applied by this validator, in order.
    pub fn rules(&self) -> &[HeaderValidationRule] {
        &self.rules
    }

    /// Validates `header` against its parent.
    pub fn validate(
        &self,
        header: &BlockHeader,
        parent: &BlockHeader,
    ) -> Result<(), HeaderValidationError> {
        for rule in &self.rules {
            match rule {
                HeaderValidationRule::GasUsedWithinLimit => {
                    if header.gas_used > header.gas_limit {
                        return Err(HeaderValidationError::GasUsedExceedsGasLimit {
                            gas_used: header.gas_used,
                            gas_limit: header.gas_limit,
                        })
                    }
                }
                HeaderValidationRule::ExtraDataMax => {
                    if header.extra_data.len() > MAXIMUM_EXTRA_DATA_SIZE {
                        return Err(HeaderValidationError::ExtraDataExceedsMax {
                            len: header.extra_data.len(),
                        })
                    }
                }
                HeaderValidationRule::TimestampMoreRecentThanParent => {
                    if header.timestamp <= parent.timestamp {
                        return Err(HeaderValidationError::TimestampIsInPast {
                            parent_timestamp: parent.timestamp,
                            timestamp: header.timestamp,
                        })
                    }
                }
                HeaderValidationRule::GasLimit(calculator) => {
                    calculator.validate_next_gas_limit(
                        parent.gas_limit,
                        header.gas_limit,
                        header.number,
                    )?;
                }
                HeaderValidationRule::BaseFee(market) => {
                    let got =
                        header.base_fee_per_gas.ok_or(HeaderValidationError::BaseFeeMissing)?;
                    let expected = market.next_base_fee(parent);
                    if got != expected {
                        return Err(HeaderValidationError::BaseFeeDiff { expected, got })
                    }
                }
                // Seal verification runs in the external consensus engine.
                HeaderValidationRule::ProofOfWorkSeal(_) => {}
                HeaderValidationRule::DaoExtraData => {
                    if header.extra_data.as_ref() != DAO_EXTRA_DATA {
                        return Err(HeaderValidationError::InvalidDaoExtraData {
                            got: header.extra_data.clone(),
                        })
                    }
                }
                HeaderValidationRule::MergeRules => {
                    if !header.difficulty.is_zero() {
                        return Err(HeaderValidationError::TheMergeDifficultyIsNotZero {
                            difficulty: header.difficulty,
                        })
                    }
                    if header.nonce != B64::ZERO {
                        return Err(HeaderValidationError::TheMergeNonceIsNotZero)
                    }
                    if !header.ommers_hash_is_empty() {
                        return Err(HeaderValidationError::TheMergeOmmerRootIsNotEmpty)
                    }
                }
            }
        }
        Ok(())
    }
}

/// The block body validator variant in force.
///
/// Body checks (transaction root, ommer hashes, withdrawals root) depend on the
/// external trie and RLP collaborators; the bundle records which variant to run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlockBodyValidator {
    /// Pre-London body rules.
    #[default]
    Mainnet,
    /// Base-fee-aware body rules, London on.
    BaseFee,
}
