//! Fee market rules.
//!
//! The fee market determines the base fee of a block, how the coinbase is paid and,
//! from Cancun on, the price of blob gas. The legacy market has neither: priority is
//! purely gas-price ordered and the whole fee goes to the coinbase.

use crate::constants::{
    BLOB_GASPRICE_UPDATE_FRACTION, EIP1559_INITIAL_BASE_FEE, MAX_BLOB_GAS_PER_BLOCK,
    MIN_BLOB_GASPRICE, TARGET_BLOB_GAS_PER_BLOCK,
};
use crate::primitives::BlockHeader;

/// Parameters of the EIP-1559 base fee adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BaseFeeParams {
    /// The maximum relative base fee change per block, as a divisor.
    pub max_change_denominator: u64,
    /// The gas limit over gas target ratio.
    pub elasticity_multiplier: u64,
}

impl BaseFeeParams {
    /// The parameters ratified for Ethereum mainnet.
    pub const fn ethereum() -> Self {
        Self { max_change_denominator: 8, elasticity_multiplier: 2 }
    }
}

/// Parameters of the EIP-4844 blob gas market.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlobFeeParams {
    /// Blob gas target per block.
    pub target_blob_gas_per_block: u64,
    /// Blob gas ceiling per block.
    pub max_blob_gas_per_block: u64,
    /// Denominator of the exponential price update.
    pub update_fraction: u64,
    /// Price floor, in wei.
    pub min_blob_gasprice: u64,
}

impl BlobFeeParams {
    /// The parameters ratified for Cancun.
    pub const fn cancun() -> Self {
        Self {
            target_blob_gas_per_block: TARGET_BLOB_GAS_PER_BLOCK,
            max_blob_gas_per_block: MAX_BLOB_GAS_PER_BLOCK,
            update_fraction: BLOB_GASPRICE_UPDATE_FRACTION,
            min_blob_gasprice: MIN_BLOB_GASPRICE,
        }
    }
}

/// A base-fee market anchored at its activation block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BaseFeeMarket {
    /// The block at which the market activates; the base fee of that block is fixed.
    pub fork_block: u64,
    /// The base fee of the activation block, in wei.
    pub initial_base_fee: u64,
    /// Adjustment parameters.
    pub params: BaseFeeParams,
    /// Pin the base fee to zero (free-gas networks).
    pub zero_base_fee: bool,
}

impl BaseFeeMarket {
    /// A London market with the default initial base fee.
    pub const fn london(fork_block: u64, initial_base_fee: Option<u64>) -> Self {
        Self {
            fork_block,
            initial_base_fee: match initial_base_fee {
                Some(fee) => fee,
                None => EIP1559_INITIAL_BASE_FEE,
            },
            params: BaseFeeParams::ethereum(),
            zero_base_fee: false,
        }
    }

    /// A market whose base fee is pinned to zero.
    pub const fn zero_base_fee(fork_block: u64) -> Self {
        Self {
            fork_block,
            initial_base_fee: 0,
            params: BaseFeeParams::ethereum(),
            zero_base_fee: true,
        }
    }

    /// Calculate the base fee of the block following `parent`.
    pub fn next_base_fee(&self, parent: &BlockHeader) -> u64 {
        if self.zero_base_fee {
            return 0
        }
        // The first market block has the pinned initial fee and its parent carries
        // none to adjust from.
        if parent.number + 1 <= self.fork_block {
            return self.initial_base_fee
        }
        let base_fee = parent.base_fee_per_gas.unwrap_or(self.initial_base_fee);
        calc_next_block_base_fee(parent.gas_used, parent.gas_limit, base_fee, self.params)
    }
}

/// Calculate the base fee for the next block based on the EIP-1559 specification.
fn calc_next_block_base_fee(gas_used: u64, gas_limit: u64, base_fee: u64, params: BaseFeeParams) -> u64 {
    let gas_target = gas_limit / params.elasticity_multiplier;

    match gas_used.cmp(&gas_target) {
        core::cmp::Ordering::Equal => base_fee,
        // If the gas used in the current block is greater than the gas target, the
        // base fee is increased.
        core::cmp::Ordering::Greater => {
            let gas_used_delta = gas_used - gas_target;
            let base_fee_delta = (base_fee as u128 * gas_used_delta as u128 /
                gas_target as u128 /
                params.max_change_denominator as u128)
                .max(1);
            base_fee + base_fee_delta as u64
        }
        // Otherwise it is decreased, saturating at zero.
        core::cmp::Ordering::Less => {
            let gas_used_delta = gas_target - gas_used;
            let base_fee_delta = base_fee as u128 * gas_used_delta as u128 /
                gas_target as u128 /
                params.max_change_denominator as u128;
            base_fee.saturating_sub(base_fee_delta as u64)
        }
    }
}

/// Approximates `factor * e ** (numerator / denominator)` using Taylor expansion.
///
/// This is the exponential used for blob gas pricing; the approximation is part of
/// the consensus rules and must match bit for bit.
fn fake_exponential(factor: u128, numerator: u128, denominator: u128) -> u128 {
    assert_ne!(denominator, 0, "attempt to divide by zero");

    let mut i = 1;
    let mut output = 0;
    let mut numerator_accum = factor * denominator;
    while numerator_accum > 0 {
        output += numerator_accum;
        numerator_accum = (numerator_accum * numerator) / (denominator * i);
        i += 1;
    }
    output / denominator
}

/// The fee market rules in force.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FeeMarket {
    /// Pre-London: gas-price ordered, the full fee goes to the coinbase.
    Legacy,
    /// London: EIP-1559 base fee burn with priority tips.
    London(BaseFeeMarket),
    /// Cancun: the London market plus blob gas pricing.
    Cancun {
        /// The base-fee market.
        base: BaseFeeMarket,
        /// Blob gas pricing parameters.
        blob: BlobFeeParams,
    },
}

impl FeeMarket {
    /// The legacy, pre-London market.
    pub const fn legacy() -> Self {
        Self::Legacy
    }

    /// Returns `true` if this market computes a base fee.
    pub const fn implements_base_fee(&self) -> bool {
        !matches!(self, Self::Legacy)
    }

    /// Returns the base-fee market, when one is in force.
    pub const fn base_fee_market(&self) -> Option<&BaseFeeMarket> {
        match self {
            Self::Legacy => None,
            Self::London(base) | Self::Cancun { base, .. } => Some(base),
        }
    }

    /// The expected base fee of the block following `parent`, `None` pre-London.
    pub fn next_base_fee(&self, parent: &BlockHeader) -> Option<u64> {
        self.base_fee_market().map(|market| market.next_base_fee(parent))
    }

    /// The blob gas price implied by the given excess blob gas, `None` pre-Cancun.
    pub fn blob_gas_price(&self, excess_blob_gas: u64) -> Option<u128> {
        match self {
            Self::Cancun { blob, .. } => Some(fake_exponential(
                blob.min_blob_gasprice as u128,
                excess_blob_gas as u128,
                blob.update_fraction as u128,
            )),
            _ => None,
        }
    }

    /// The running excess blob gas of the block following `parent`, `None` pre-Cancun.
    pub fn next_excess_blob_gas(&self, parent: &BlockHeader) -> Option<u64> {
        match self {
            Self::Cancun { blob, .. } => {
                let excess = parent.excess_blob_gas.unwrap_or(0);
                let used = parent.blob_gas_used.unwrap_or(0);
                Some((excess + used).saturating_sub(blob.target_blob_gas_per_block))
            }
            _ => None,
        }
    }
}
