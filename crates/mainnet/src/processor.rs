//! Block processor contracts.
//!
//! Transaction execution itself happens in the external block importer; the rule
//! bundle contributes the hooks around it: irregular state changes applied before
//! the first transaction, and the balance increments applied after the last one
//! (block and ommer rewards, withdrawals).

use crate::{
    error::StateRewriteError,
    primitives::{BlockHeader, Withdrawal},
    rules::MiningBeneficiaryCalculator,
    withdrawals::WithdrawalsProcessor,
};
use alloy_primitives::{Address, U256};
use std::{collections::HashMap, fmt, sync::Arc};

/// Minimal mutable world-state surface needed by irregular state transitions.
///
/// The caller hands exclusive access to the updater; implementations are free to
/// stage writes until [`commit`](Self::commit).
pub trait MutableWorldState {
    /// Current balance of `address`, zero when the account does not exist.
    fn balance(&self, address: Address) -> U256;

    /// Sets the balance of `address`, creating the account when absent.
    fn set_balance(&mut self, address: Address, balance: U256);

    /// Persists staged changes.
    fn commit(&mut self);
}

/// The per-fork block processing hooks.
pub trait BlockProcessor: fmt::Debug + Send + Sync {
    /// State changes applied before any transaction of the block executes.
    fn apply_pre_execution_changes(
        &self,
        state: &mut dyn MutableWorldState,
    ) -> Result<(), StateRewriteError>;

    /// Balance increments applied after the last transaction of the block: block and
    /// ommer rewards, and withdrawals from Shanghai on.
    fn post_block_balance_increments(
        &self,
        header: &BlockHeader,
        ommers: &[BlockHeader],
        withdrawals: Option<&[Withdrawal]>,
    ) -> HashMap<Address, U256>;
}

/// The mainnet block processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainnetBlockProcessor {
    /// The static block reward of the fork.
    pub block_reward: U256,
    /// Elide reward records when the reward is zero.
    pub skip_zero_block_rewards: bool,
    /// How the reward beneficiary is determined.
    pub mining_beneficiary_calculator: MiningBeneficiaryCalculator,
    /// Withdrawal crediting, bound from Shanghai on.
    pub withdrawals_processor: Option<WithdrawalsProcessor>,
}

impl MainnetBlockProcessor {
    /// Creates a processor paying the given static reward.
    pub fn new(
        block_reward: U256,
        skip_zero_block_rewards: bool,
        mining_beneficiary_calculator: MiningBeneficiaryCalculator,
    ) -> Self {
        Self {
            block_reward,
            skip_zero_block_rewards,
            mining_beneficiary_calculator,
            withdrawals_processor: None,
        }
    }

    /// Enables withdrawal crediting.
    pub fn with_withdrawals_processor(mut self, processor: WithdrawalsProcessor) -> Self {
        self.withdrawals_processor = Some(processor);
        self
    }
}

impl BlockProcessor for MainnetBlockProcessor {
    fn apply_pre_execution_changes(
        &self,
        _state: &mut dyn MutableWorldState,
    ) -> Result<(), StateRewriteError> {
        Ok(())
    }

    fn post_block_balance_increments(
        &self,
        header: &BlockHeader,
        ommers: &[BlockHeader],
        withdrawals: Option<&[Withdrawal]>,
    ) -> HashMap<Address, U256> {
        let mut balance_increments = HashMap::new();

        if !(self.skip_zero_block_rewards && self.block_reward.is_zero()) {
            let base = self.block_reward;

            // Ommer rewards
            for ommer in ommers {
                *balance_increments.entry(ommer.beneficiary).or_default() +=
                    ommer_reward(base, header.number, ommer.number);
            }

            // Full block reward, plus the nephew bounty per included ommer
            let beneficiary = self.mining_beneficiary_calculator.beneficiary(header);
            *balance_increments.entry(beneficiary).or_default() +=
                block_reward(base, ommers.len());
        }

        if let (Some(processor), Some(withdrawals)) = (&self.withdrawals_processor, withdrawals) {
            for (address, increment) in processor.balance_increments(withdrawals) {
                *balance_increments.entry(address).or_default() += increment;
            }
        }

        balance_increments
    }
}

/// The GoQuorum-compatible block processor.
///
/// Public-state processing matches [`MainnetBlockProcessor`]; the additional
/// private-state handling is implemented by the external private-transaction
/// subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumBlockProcessor {
    inner: MainnetBlockProcessor,
}

impl QuorumBlockProcessor {
    /// Creates a quorum processor over the mainnet reward rules.
    pub fn new(inner: MainnetBlockProcessor) -> Self {
        Self { inner }
    }
}

impl BlockProcessor for QuorumBlockProcessor {
    fn apply_pre_execution_changes(
        &self,
        state: &mut dyn MutableWorldState,
    ) -> Result<(), StateRewriteError> {
        self.inner.apply_pre_execution_changes(state)
    }

    fn post_block_balance_increments(
        &self,
        header: &BlockHeader,
        ommers: &[BlockHeader],
        withdrawals: Option<&[Withdrawal]>,
    ) -> HashMap<Address, U256> {
        self.inner.post_block_balance_increments(header, ommers, withdrawals)
    }
}

/// A deferred block-processor binding.
///
/// The concrete processor depends on bindings that may still change while fork
/// deltas are folded (the block reward most of all), so the builder records which
/// variant to construct and resolves it when the spec is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockProcessorBuilder {
    /// The mainnet processor.
    Mainnet,
    /// The GoQuorum-compatible processor.
    Quorum,
    /// The DAO recovery wrapper around another processor.
    DaoRecovery(Box<BlockProcessorBuilder>),
}

impl BlockProcessorBuilder {
    /// Resolves the binding against the final reward rules.
    pub fn resolve(
        &self,
        block_reward: U256,
        skip_zero_block_rewards: bool,
        mining_beneficiary_calculator: MiningBeneficiaryCalculator,
        withdrawals_processor: Option<WithdrawalsProcessor>,
    ) -> Arc<dyn BlockProcessor> {
        match self {
            Self::Mainnet => {
                let mut processor = MainnetBlockProcessor::new(
                    block_reward,
                    skip_zero_block_rewards,
                    mining_beneficiary_calculator,
                );
                if let Some(withdrawals) = withdrawals_processor {
                    processor = processor.with_withdrawals_processor(withdrawals);
                }
                Arc::new(processor)
            }
            Self::Quorum => {
                let mut processor = MainnetBlockProcessor::new(
                    block_reward,
                    skip_zero_block_rewards,
                    mining_beneficiary_calculator,
                );
                if let Some(withdrawals) = withdrawals_processor {
                    processor = processor.with_withdrawals_processor(withdrawals);
                }
                Arc::new(QuorumBlockProcessor::new(processor))
            }
            Self::DaoRecovery(inner) => Arc::new(crate::dao::DaoBlockProcessor::new(
                inner.resolve(
                    block_reward,
                    skip_zero_block_rewards,
                    mining_beneficiary_calculator,
                    withdrawals_processor,
                ),
            )),
        }
    }
}

/// Calculates the reward given to an ommer's beneficiary.
///
/// `reward * (8 + ommer_number - block_number) / 8`, zero for ommers more than eight
/// blocks back.
fn ommer_reward(base_block_reward: U256, block_number: u64, ommer_number: u64) -> U256 {
    let depth = block_number.saturating_sub(ommer_number);
    if depth > 8 {
        return U256::ZERO
    }
    base_block_reward * U256::from(8 - depth) / U256::from(8u64)
}

/// Calculates the reward of the block's beneficiary: the base reward plus one
/// thirty-second per included ommer.
fn block_reward(base_block_reward: U256, ommers: usize) -> U256 {
    base_block_reward + base_block_reward * U256::from(ommers) / U256::from(32u64)
}
