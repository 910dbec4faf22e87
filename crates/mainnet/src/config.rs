//! Configuration consumed while assembling the protocol schedule.
//!
//! All of it is passed in by the embedder; the crate reads no environment and keeps
//! no persisted state.

use crate::{constants::EIP1559_INITIAL_BASE_FEE, error::SpecBuildError};
use ethspec_hardforks::{ChainHardforks, ForkCondition, Hardfork};

/// The proof-of-work algorithm a chain seals its pre-merge blocks with.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PowAlgorithm {
    /// Ethash, the mainnet algorithm.
    #[default]
    Ethash,
    /// Keccak-256 sealing, used by some ethash-family side chains.
    Keccak256,
    /// Sealing is not supported; seal validation always fails.
    Unsupported,
}

/// Tuning knobs forwarded to the external EVM interpreter when it is constructed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EvmConfiguration {
    /// Weight of the shared jump-destination analysis cache, in kilobytes.
    pub jump_dest_cache_weight_kb: u64,
}

impl EvmConfiguration {
    /// The default jump-destination cache weight: 32 MB.
    pub const DEFAULT: Self = Self { jump_dest_cache_weight_kb: 32_000 };
}

impl Default for EvmConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Chain-wide options that parameterize the fork definitions.
///
/// This is the distilled view of the genesis file options the registry cares about;
/// parsing the genesis file itself is the embedder's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecConfig {
    /// The chain id transactions are bound to from Spurious Dragon on.
    pub chain_id: Option<u64>,
    /// Overrides the fork-dependent contract code size limit.
    pub contract_code_size_limit: Option<usize>,
    /// Overrides the default message-frame stack depth limit.
    pub stack_size_limit: Option<usize>,
    /// Carry revert reasons in transaction receipts.
    ///
    /// Off by default: the reason is not part of the consensus receipt encoding.
    pub enable_revert_reason: bool,
    /// The initial base fee of the first London block, in wei.
    pub base_fee_per_gas: Option<u64>,
    /// Run the London fee market with a base fee pinned to zero.
    pub zero_base_fee: bool,
    /// The London activation block, used to anchor base-fee and gas-limit targeting.
    pub london_block_number: Option<u64>,
    /// The proof-of-work algorithm sealing pre-merge blocks.
    pub pow_algorithm: PowAlgorithm,
    /// Select the GoQuorum-compatible block validator and processor variants.
    pub quorum_compatibility_mode: bool,
    /// Tuning forwarded to the external EVM interpreter.
    pub evm_configuration: EvmConfiguration,
}

impl SpecConfig {
    /// Options matching the Ethereum mainnet genesis.
    pub fn mainnet() -> Self {
        Self {
            chain_id: Some(1),
            base_fee_per_gas: Some(EIP1559_INITIAL_BASE_FEE),
            london_block_number: Hardfork::London.mainnet_activation_block(),
            ..Default::default()
        }
    }

    /// Checks the options against the fork schedule they will be applied to.
    ///
    /// Mutually exclusive options and out-of-range values are rejected here, before
    /// any spec is assembled.
    pub fn validate(&self, hardforks: &ChainHardforks) -> Result<(), SpecBuildError> {
        if self.stack_size_limit == Some(0) {
            return Err(SpecBuildError::InvalidConfig {
                reason: "stack size limit must be positive".to_string(),
            })
        }
        if self.contract_code_size_limit == Some(0) {
            return Err(SpecBuildError::InvalidConfig {
                reason: "contract code size limit must be positive".to_string(),
            })
        }

        let london_scheduled = hardforks.get(Hardfork::London).is_some_and(|condition| {
            !matches!(condition, ForkCondition::Never)
        });
        if london_scheduled && self.base_fee_per_gas.is_none() && !self.zero_base_fee {
            return Err(SpecBuildError::InvalidConfig {
                reason: "base-fee market scheduled but no base fee provided and zero base fee not set"
                    .to_string(),
            })
        }

        Ok(())
    }
}
