//! The immutable protocol spec and its builder.

use crate::{
    error::SpecBuildError,
    fee_market::FeeMarket,
    gas_limit::GasLimitCalculator,
    header_validation::{BlockBodyValidator, BlockHeaderValidator},
    processor::{BlockProcessor, BlockProcessorBuilder},
    processors::{
        ContractCreationProcessor, MessageCallProcessor, PrivateTransactionProcessor,
        TransactionProcessor,
    },
    receipts::TransactionReceiptFactory,
    rules::{
        BlockHeaderFunctions, BlockImporterKind, BlockValidatorKind, DifficultyCalculator,
        EvmSpec, GasSchedule, MiningBeneficiaryCalculator, PrecompileSet,
    },
    transaction::TransactionValidator,
    withdrawals::{DepositsValidator, WithdrawalsProcessor, WithdrawalsValidator},
};
use alloy_primitives::U256;
use std::sync::Arc;

/// A fully bound rule bundle governing the execution of blocks within one fork.
///
/// The spec is an immutable value: it is built once during schedule assembly and
/// shared read-only across all concurrent users for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ProtocolSpec {
    /// The name of the fork, e.g. `"Frontier"`.
    pub name: &'static str,
    /// The gas schedule in force.
    pub gas_calculator: GasSchedule,
    /// The block gas limit rule.
    pub gas_limit_calculator: GasLimitCalculator,
    /// The EVM interpreter request.
    pub evm: EvmSpec,
    /// The reachable precompiled contracts.
    pub precompile_registry: PrecompileSet,
    /// Message-call execution parameters.
    pub message_call_processor: MessageCallProcessor,
    /// Contract-creation execution parameters.
    pub contract_creation_processor: ContractCreationProcessor,
    /// Protocol-level transaction validation.
    pub transaction_validator: TransactionValidator,
    /// Transaction execution parameters.
    pub transaction_processor: TransactionProcessor,
    /// Private-transaction execution parameters, when the privacy subsystem is wired.
    pub private_transaction_processor: Option<PrivateTransactionProcessor>,
    /// Header validation for blocks.
    pub block_header_validator: BlockHeaderValidator,
    /// Header validation for ommers.
    pub ommer_header_validator: BlockHeaderValidator,
    /// Body validation variant.
    pub block_body_validator: BlockBodyValidator,
    /// Pre- and post-execution block processing hooks.
    pub block_processor: Arc<dyn BlockProcessor>,
    /// The block validator variant.
    pub block_validator: BlockValidatorKind,
    /// The block importer wiring.
    pub block_importer: BlockImporterKind,
    /// Header hashing helpers.
    pub block_header_functions: BlockHeaderFunctions,
    /// The receipt form produced by this fork.
    pub transaction_receipt_factory: TransactionReceiptFactory,
    /// The difficulty function.
    pub difficulty_calculator: DifficultyCalculator,
    /// The fee market rules.
    pub fee_market: FeeMarket,
    /// The static block reward.
    pub block_reward: U256,
    /// Elide reward records when the reward is zero.
    pub skip_zero_block_rewards: bool,
    /// How the reward beneficiary is determined.
    pub mining_beneficiary_calculator: MiningBeneficiaryCalculator,
    /// Withdrawal presence rules, Shanghai on.
    pub withdrawals_validator: Option<WithdrawalsValidator>,
    /// Withdrawal crediting, Shanghai on.
    pub withdrawals_processor: Option<WithdrawalsProcessor>,
    /// Deposit presence rules, experimental.
    pub deposits_validator: Option<DepositsValidator>,
    /// Whether this fork runs under proof of stake.
    pub is_proof_of_stake: bool,
}

fn require<T>(field: Option<T>, name: &'static str) -> Result<T, SpecBuildError> {
    field.ok_or(SpecBuildError::IncompleteSpec { field: name })
}

/// Mutable accumulator of rule bindings; produces an immutable [`ProtocolSpec`].
///
/// Builders are transient: they exist only while the schedule folds fork deltas.
/// Every setter replaces the previous binding, which is how a fork definition
/// overrides the rules of its base fork.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ProtocolSpecBuilder {
    name: Option<&'static str>,
    gas_calculator: Option<GasSchedule>,
    gas_limit_calculator: Option<GasLimitCalculator>,
    evm: Option<EvmSpec>,
    precompile_registry: Option<PrecompileSet>,
    message_call_processor: Option<MessageCallProcessor>,
    contract_creation_processor: Option<ContractCreationProcessor>,
    transaction_validator: Option<TransactionValidator>,
    transaction_processor: Option<TransactionProcessor>,
    private_transaction_processor: Option<PrivateTransactionProcessor>,
    block_header_validator: Option<BlockHeaderValidator>,
    ommer_header_validator: Option<BlockHeaderValidator>,
    block_body_validator: Option<BlockBodyValidator>,
    block_processor: Option<BlockProcessorBuilder>,
    block_validator: Option<BlockValidatorKind>,
    block_importer: Option<BlockImporterKind>,
    block_header_functions: Option<BlockHeaderFunctions>,
    transaction_receipt_factory: Option<TransactionReceiptFactory>,
    difficulty_calculator: Option<DifficultyCalculator>,
    fee_market: Option<FeeMarket>,
    block_reward: Option<U256>,
    skip_zero_block_rewards: Option<bool>,
    mining_beneficiary_calculator: Option<MiningBeneficiaryCalculator>,
    withdrawals_validator: Option<WithdrawalsValidator>,
    withdrawals_processor: Option<WithdrawalsProcessor>,
    deposits_validator: Option<DepositsValidator>,
    is_proof_of_stake: bool,
}

impl ProtocolSpecBuilder {
    /// Sets the fork name.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Binds the gas schedule.
    pub fn gas_calculator(mut self, gas_calculator: GasSchedule) -> Self {
        self.gas_calculator = Some(gas_calculator);
        self
    }

    /// Binds the gas limit rule.
    pub fn gas_limit_calculator(mut self, gas_limit_calculator: GasLimitCalculator) -> Self {
        self.gas_limit_calculator = Some(gas_limit_calculator);
        self
    }

    /// Binds the EVM interpreter request.
    pub fn evm(mut self, evm: EvmSpec) -> Self {
        self.evm = Some(evm);
        self
    }

    /// Binds the precompile registry.
    pub fn precompile_registry(mut self, precompile_registry: PrecompileSet) -> Self {
        self.precompile_registry = Some(precompile_registry);
        self
    }

    /// Binds the message-call processor parameters.
    pub fn message_call_processor(mut self, processor: MessageCallProcessor) -> Self {
        self.message_call_processor = Some(processor);
        self
    }

    /// Binds the contract-creation processor parameters.
    pub fn contract_creation_processor(mut self, processor: ContractCreationProcessor) -> Self {
        self.contract_creation_processor = Some(processor);
        self
    }

    /// Binds the transaction validator.
    pub fn transaction_validator(mut self, validator: TransactionValidator) -> Self {
        self.transaction_validator = Some(validator);
        self
    }

    /// Binds the transaction processor parameters.
    pub fn transaction_processor(mut self, processor: TransactionProcessor) -> Self {
        self.transaction_processor = Some(processor);
        self
    }

    /// Binds the private-transaction processor parameters.
    pub fn private_transaction_processor(
        mut self,
        processor: PrivateTransactionProcessor,
    ) -> Self {
        self.private_transaction_processor = Some(processor);
        self
    }

    /// Binds the block header validator.
    pub fn block_header_validator(mut self, validator: BlockHeaderValidator) -> Self {
        self.block_header_validator = Some(validator);
        self
    }

    /// Binds the ommer header validator.
    pub fn ommer_header_validator(mut self, validator: BlockHeaderValidator) -> Self {
        self.ommer_header_validator = Some(validator);
        self
    }

    /// Binds the body validator variant.
    pub fn block_body_validator(mut self, validator: BlockBodyValidator) -> Self {
        self.block_body_validator = Some(validator);
        self
    }

    /// Binds the block processing hooks.
    ///
    /// The binding is deferred: the concrete processor is resolved by
    /// [`build`](Self::build) once the reward rules it depends on are final.
    pub fn block_processor(mut self, processor: BlockProcessorBuilder) -> Self {
        self.block_processor = Some(processor);
        self
    }

    /// Binds the block validator variant.
    pub fn block_validator(mut self, validator: BlockValidatorKind) -> Self {
        self.block_validator = Some(validator);
        self
    }

    /// Binds the block importer wiring.
    pub fn block_importer(mut self, importer: BlockImporterKind) -> Self {
        self.block_importer = Some(importer);
        self
    }

    /// Binds the header hashing helpers.
    pub fn block_header_functions(mut self, functions: BlockHeaderFunctions) -> Self {
        self.block_header_functions = Some(functions);
        self
    }

    /// Binds the receipt factory.
    pub fn transaction_receipt_factory(mut self, factory: TransactionReceiptFactory) -> Self {
        self.transaction_receipt_factory = Some(factory);
        self
    }

    /// Binds the difficulty function.
    pub fn difficulty_calculator(mut self, calculator: DifficultyCalculator) -> Self {
        self.difficulty_calculator = Some(calculator);
        self
    }

    /// Binds the fee market.
    pub fn fee_market(mut self, fee_market: FeeMarket) -> Self {
        self.fee_market = Some(fee_market);
        self
    }

    /// Binds the static block reward.
    pub fn block_reward(mut self, block_reward: U256) -> Self {
        self.block_reward = Some(block_reward);
        self
    }

    /// Sets whether zero rewards are recorded.
    pub fn skip_zero_block_rewards(mut self, skip_zero_block_rewards: bool) -> Self {
        self.skip_zero_block_rewards = Some(skip_zero_block_rewards);
        self
    }

    /// Binds the beneficiary rule.
    pub fn mining_beneficiary_calculator(
        mut self,
        calculator: MiningBeneficiaryCalculator,
    ) -> Self {
        self.mining_beneficiary_calculator = Some(calculator);
        self
    }

    /// Binds the withdrawals presence rule.
    pub fn withdrawals_validator(mut self, validator: WithdrawalsValidator) -> Self {
        self.withdrawals_validator = Some(validator);
        self
    }

    /// Binds the withdrawals processor.
    pub fn withdrawals_processor(mut self, processor: WithdrawalsProcessor) -> Self {
        self.withdrawals_processor = Some(processor);
        self
    }

    /// Binds the deposits presence rule.
    pub fn deposits_validator(mut self, validator: DepositsValidator) -> Self {
        self.deposits_validator = Some(validator);
        self
    }

    /// Marks the spec as proof of stake.
    pub fn is_pos(mut self, is_proof_of_stake: bool) -> Self {
        self.is_proof_of_stake = is_proof_of_stake;
        self
    }

    /// Resolves all bindings and emits the immutable spec.
    ///
    /// Bindings are checked in dependency order, so the error names the earliest
    /// unbound field of the pipeline: gas calculator, then the execution stack built
    /// on top of it, then the validators and block-level rules.
    pub fn build(self) -> Result<ProtocolSpec, SpecBuildError> {
        let gas_calculator = require(self.gas_calculator, "gas_calculator")?;
        let evm = require(self.evm, "evm")?;
        let precompile_registry = require(self.precompile_registry, "precompile_registry")?;
        let message_call_processor =
            require(self.message_call_processor, "message_call_processor")?;
        let contract_creation_processor =
            require(self.contract_creation_processor, "contract_creation_processor")?;
        let transaction_validator = require(self.transaction_validator, "transaction_validator")?;
        let transaction_processor = require(self.transaction_processor, "transaction_processor")?;

        let gas_limit_calculator = require(self.gas_limit_calculator, "gas_limit_calculator")?;
        let block_header_validator =
            require(self.block_header_validator, "block_header_validator")?;
        let ommer_header_validator =
            require(self.ommer_header_validator, "ommer_header_validator")?;
        let block_body_validator = require(self.block_body_validator, "block_body_validator")?;
        let block_processor_builder = require(self.block_processor, "block_processor")?;
        let block_validator = require(self.block_validator, "block_validator")?;
        let block_importer = require(self.block_importer, "block_importer")?;
        let block_header_functions =
            require(self.block_header_functions, "block_header_functions")?;
        let transaction_receipt_factory =
            require(self.transaction_receipt_factory, "transaction_receipt_factory")?;
        let difficulty_calculator =
            require(self.difficulty_calculator, "difficulty_calculator")?;
        let fee_market = require(self.fee_market, "fee_market")?;
        let block_reward = require(self.block_reward, "block_reward")?;
        let skip_zero_block_rewards =
            require(self.skip_zero_block_rewards, "skip_zero_block_rewards")?;
        let mining_beneficiary_calculator =
            require(self.mining_beneficiary_calculator, "mining_beneficiary_calculator")?;
        let name = require(self.name, "name")?;

        // The processor is resolved last: it consumes the final reward bindings.
        let block_processor = block_processor_builder.resolve(
            block_reward,
            skip_zero_block_rewards,
            mining_beneficiary_calculator,
            self.withdrawals_processor,
        );

        Ok(ProtocolSpec {
            name,
            gas_calculator,
            gas_limit_calculator,
            evm,
            precompile_registry,
            message_call_processor,
            contract_creation_processor,
            transaction_validator,
            transaction_processor,
            private_transaction_processor: self.private_transaction_processor,
            block_header_validator,
            ommer_header_validator,
            block_body_validator,
            block_processor,
            block_validator,
            block_importer,
            block_header_functions,
            transaction_receipt_factory,
            difficulty_calculator,
            fee_market,
            block_reward,
            skip_zero_block_rewards,
            mining_beneficiary_calculator,
            withdrawals_validator: self.withdrawals_validator,
            withdrawals_processor: self.withdrawals_processor,
            deposits_validator: self.deposits_validator,
            is_proof_of_stake: self.is_proof_of_stake,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpecBuildError;

    #[test]
    fn empty_builder_names_the_first_missing_field() {
        let err = ProtocolSpecBuilder::default().build().unwrap_err();
        assert_eq!(err, SpecBuildError::IncompleteSpec { field: "gas_calculator" });
    }

    #[test]
    fn missing_fields_are_reported_in_dependency_order() {
        let err = ProtocolSpecBuilder::default()
            .gas_calculator(GasSchedule::Frontier)
            .build()
            .unwrap_err();
        assert_eq!(err, SpecBuildError::IncompleteSpec { field: "evm" });
    }
}
