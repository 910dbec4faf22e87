//! Block gas limit rules.
//!
//! A block may move its gas limit by strictly less than `parent / 1024` in either
//! direction. Across the London activation block the comparison point is the parent
//! limit multiplied by the fee-market elasticity, which is what doubles the gas
//! target when EIP-1559 turns on.

use crate::constants::{GAS_LIMIT_BOUND_DIVISOR, MAX_BLOB_GAS_PER_BLOCK, MIN_GAS_LIMIT};

/// Violations of the gas limit rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidGasLimit {
    /// The child gas limit increased beyond the allowed bound.
    #[error(
        "child gas limit {child_gas_limit} is above the allowed increase from parent gas limit {parent_gas_limit}"
    )]
    InvalidIncrease {
        /// Parent (elasticity adjusted) gas limit.
        parent_gas_limit: u64,
        /// Child gas limit.
        child_gas_limit: u64,
    },
    /// The child gas limit decreased beyond the allowed bound.
    #[error(
        "child gas limit {child_gas_limit} is below the allowed decrease from parent gas limit {parent_gas_limit}"
    )]
    InvalidDecrease {
        /// Parent (elasticity adjusted) gas limit.
        parent_gas_limit: u64,
        /// Child gas limit.
        child_gas_limit: u64,
    },
    /// The child gas limit is below the protocol minimum.
    #[error("child gas limit {child_gas_limit} is below the minimum of {MIN_GAS_LIMIT}")]
    BelowMinimum {
        /// Child gas limit.
        child_gas_limit: u64,
    },
}

/// The gas limit rule in force.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GasLimitCalculator {
    /// Pre-London targeting against the raw parent gas limit.
    Frontier,
    /// London targeting: the parent limit is scaled by the elasticity multiplier on
    /// the activation block.
    London {
        /// The London activation block.
        fork_block: u64,
        /// The fee-market elasticity multiplier.
        elasticity_multiplier: u64,
    },
    /// Cancun targeting: London rules plus the blob gas per block ceiling.
    Cancun {
        /// The London activation block.
        fork_block: u64,
        /// The fee-market elasticity multiplier.
        elasticity_multiplier: u64,
        /// Ceiling on blob gas per block.
        max_blob_gas_per_block: u64,
    },
}

impl GasLimitCalculator {
    /// The pre-London rule.
    pub const fn frontier() -> Self {
        Self::Frontier
    }

    /// The London rule with mainnet elasticity.
    pub const fn london(fork_block: u64) -> Self {
        Self::London { fork_block, elasticity_multiplier: 2 }
    }

    /// The Cancun rule with mainnet elasticity and blob ceiling.
    pub const fn cancun(fork_block: u64) -> Self {
        Self::Cancun {
            fork_block,
            elasticity_multiplier: 2,
            max_blob_gas_per_block: MAX_BLOB_GAS_PER_BLOCK,
        }
    }

    /// The blob gas per block ceiling, when this rule enforces one.
    pub const fn max_blob_gas_per_block(&self) -> Option<u64> {
        match self {
            Self::Cancun { max_blob_gas_per_block, .. } => Some(*max_blob_gas_per_block),
            _ => None,
        }
    }

    /// The parent gas limit adjusted for elasticity across the activation block.
    fn effective_parent_gas_limit(&self, parent_gas_limit: u64, new_block_number: u64) -> u64 {
        match self {
            Self::Frontier => parent_gas_limit,
            Self::London { fork_block, elasticity_multiplier } |
            Self::Cancun { fork_block, elasticity_multiplier, .. } => {
                if new_block_number == *fork_block {
                    parent_gas_limit * elasticity_multiplier
                } else {
                    parent_gas_limit
                }
            }
        }
    }

    /// Computes the gas limit of the next block, moving toward `target_gas_limit`
    /// when one is given and staying in place otherwise.
    pub fn next_gas_limit(
        &self,
        parent_gas_limit: u64,
        target_gas_limit: Option<u64>,
        new_block_number: u64,
    ) -> u64 {
        let parent = self.effective_parent_gas_limit(parent_gas_limit, new_block_number);
        let target = target_gas_limit.unwrap_or(parent).max(MIN_GAS_LIMIT);
        // Strictly-less-than bound, so the largest legal step is delta - 1.
        let max_step = (parent / GAS_LIMIT_BOUND_DIVISOR).saturating_sub(1);
        if target > parent {
            parent + max_step.min(target - parent)
        } else {
            parent - max_step.min(parent - target)
        }
    }

    /// Validates the gas limit of a new block against its parent's.
    pub fn validate_next_gas_limit(
        &self,
        parent_gas_limit: u64,
        new_gas_limit: u64,
        new_block_number: u64,
    ) -> Result<(), InvalidGasLimit> {
        if new_gas_limit < MIN_GAS_LIMIT {
            return Err(InvalidGasLimit::BelowMinimum { child_gas_limit: new_gas_limit })
        }
        let parent = self.effective_parent_gas_limit(parent_gas_limit, new_block_number);
        let delta = parent / GAS_LIMIT_BOUND_DIVISOR;
        if new_gas_limit >= parent + delta {
            return Err(InvalidGasLimit::InvalidIncrease {
                parent_gas_limit: parent,
                child_gas_limit: new_gas_limit,
            })
        }
        if new_gas_limit + delta <= parent {
            return Err(InvalidGasLimit::InvalidDecrease {
                parent_gas_limit: parent,
                child_gas_limit: new_gas_limit,
            })
        }
        Ok(())
    }
}
