//! The fork delta registry.
//!
//! One definition per fork, in delta-chain order. Each definition starts from the
//! builder of its immediate predecessor and overrides only what the fork changed;
//! everything else is inherited. This is the module that must reproduce every rule
//! set that ever governed mainnet, bit for bit, including the quirks that can never
//! be fixed retroactively.

use crate::{
    config::SpecConfig,
    error::ScheduleError,
    constants::{
        DEFAULT_MAX_STACK_SIZE, FRONTIER_BLOCK_REWARD, FRONTIER_CONTRACT_SIZE_LIMIT,
        BYZANTIUM_BLOCK_REWARD, CONSTANTINOPLE_BLOCK_REWARD,
        SHANGHAI_INIT_CODE_SIZE_LIMIT, SPURIOUS_DRAGON_CONTRACT_SIZE_LIMIT,
        SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES,
    },
    fee_market::{BaseFeeMarket, BlobFeeParams, FeeMarket},
    gas_limit::GasLimitCalculator,
    header_validation::{BlockBodyValidator, BlockHeaderValidator},
    processor::BlockProcessorBuilder,
    processors::{
        CodeValidationRule, CoinbaseFeePrice, ContractCreationProcessor, MessageCallProcessor,
        PrivateTransactionProcessor, TransactionProcessor,
    },
    receipts::TransactionReceiptFactory,
    rules::{
        BlockHeaderFunctions, BlockImporterKind, BlockValidatorKind, DifficultyCalculator,
        EvmSpec, EvmVariant, GasSchedule, MiningBeneficiaryCalculator, PowHasher, PrecompileSet,
    },
    spec::ProtocolSpecBuilder,
    transaction::TransactionValidator,
    withdrawals::{DepositsValidator, WithdrawalsProcessor, WithdrawalsValidator},
};
use alloy_primitives::U256;
use ethspec_hardforks::Hardfork;

use crate::primitives::TxType;

fn block_processor_builder(config: &SpecConfig) -> BlockProcessorBuilder {
    if config.quorum_compatibility_mode {
        BlockProcessorBuilder::Quorum
    } else {
        BlockProcessorBuilder::Mainnet
    }
}

fn block_validator_kind(config: &SpecConfig) -> BlockValidatorKind {
    if config.quorum_compatibility_mode {
        BlockValidatorKind::Quorum
    } else {
        BlockValidatorKind::Mainnet
    }
}

/// The base-fee market selected by the configuration, anchored at the London
/// activation block.
fn london_fee_market(config: &SpecConfig, london_fork_block: u64) -> BaseFeeMarket {
    if config.zero_base_fee {
        BaseFeeMarket::zero_base_fee(london_fork_block)
    } else {
        BaseFeeMarket::london(london_fork_block, config.base_fee_per_gas)
    }
}

/// The launch rule set.
pub fn frontier_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let contract_size_limit =
        config.contract_code_size_limit.unwrap_or(FRONTIER_CONTRACT_SIZE_LIMIT);
    let stack_size_limit = config.stack_size_limit.unwrap_or(DEFAULT_MAX_STACK_SIZE);
    let pow_hasher = PowHasher::from(config.pow_algorithm);
    let gas_limit_calculator = GasLimitCalculator::frontier();
    let evm = EvmSpec::new(EvmVariant::Frontier, config.evm_configuration);

    ProtocolSpecBuilder::default()
        .gas_calculator(GasSchedule::Frontier)
        .gas_limit_calculator(gas_limit_calculator)
        .evm(evm.clone())
        .precompile_registry(PrecompileSet::Frontier)
        .message_call_processor(MessageCallProcessor::new(evm, PrecompileSet::Frontier))
        .contract_creation_processor(ContractCreationProcessor {
            require_code_deposit_to_succeed: false,
            code_rules: vec![CodeValidationRule::MaxCodeSize(contract_size_limit)],
            initial_contract_nonce: 0,
            force_delete_when_empty: Vec::new(),
        })
        .transaction_validator(TransactionValidator {
            accepted_types: vec![TxType::Legacy],
            chain_id: None,
            check_signature_malleability: false,
            replay_protection: false,
            max_init_code_size: usize::MAX,
            quorum_compatibility_mode: config.quorum_compatibility_mode,
        })
        .transaction_processor(TransactionProcessor {
            clear_empty_accounts: false,
            warm_coinbase: false,
            stack_size_limit,
            fee_market: FeeMarket::legacy(),
            coinbase_fee_price: CoinbaseFeePrice::Frontier,
        })
        .private_transaction_processor(PrivateTransactionProcessor {
            stack_size_limit,
            chain_id: None,
        })
        .difficulty_calculator(DifficultyCalculator::Frontier)
        .block_header_validator(BlockHeaderValidator::create(pow_hasher, gas_limit_calculator))
        .ommer_header_validator(BlockHeaderValidator::create_legacy_fee_market_ommer_validator(
            pow_hasher,
            gas_limit_calculator,
        ))
        .block_body_validator(BlockBodyValidator::Mainnet)
        .transaction_receipt_factory(TransactionReceiptFactory::Frontier)
        .block_reward(FRONTIER_BLOCK_REWARD)
        .skip_zero_block_rewards(false)
        .block_processor(block_processor_builder(config))
        .block_validator(block_validator_kind(config))
        .block_importer(BlockImporterKind::Mainnet)
        .block_header_functions(BlockHeaderFunctions::Mainnet)
        .mining_beneficiary_calculator(MiningBeneficiaryCalculator::Coinbase)
        .name("Frontier")
}

/// Homestead: DELEGATECALL, code-deposit failure, low-s signatures.
pub fn homestead_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let contract_size_limit =
        config.contract_code_size_limit.unwrap_or(FRONTIER_CONTRACT_SIZE_LIMIT);
    frontier_definition(config)
        .gas_calculator(GasSchedule::Homestead)
        .evm(EvmSpec::new(EvmVariant::Homestead, config.evm_configuration))
        .contract_creation_processor(ContractCreationProcessor {
            require_code_deposit_to_succeed: true,
            code_rules: vec![CodeValidationRule::MaxCodeSize(contract_size_limit)],
            initial_contract_nonce: 0,
            force_delete_when_empty: Vec::new(),
        })
        .transaction_validator(TransactionValidator {
            accepted_types: vec![TxType::Legacy],
            chain_id: None,
            check_signature_malleability: true,
            replay_protection: false,
            max_init_code_size: usize::MAX,
            quorum_compatibility_mode: config.quorum_compatibility_mode,
        })
        .difficulty_calculator(DifficultyCalculator::Homestead)
        .name("Homestead")
}

/// First block of the DAO recovery window: the header must carry the fork marker
/// and the balance migration runs before the block's transactions.
pub fn dao_recovery_init_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let pow_hasher = PowHasher::from(config.pow_algorithm);
    homestead_definition(config)
        .block_header_validator(BlockHeaderValidator::create_dao_validator(
            pow_hasher,
            GasLimitCalculator::frontier(),
        ))
        .block_processor(BlockProcessorBuilder::DaoRecovery(Box::new(
            BlockProcessorBuilder::Mainnet,
        )))
        .name("DaoRecoveryInit")
}

/// End of the DAO recovery window: the one-shot wrapper is removed.
pub fn dao_recovery_transition_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    dao_recovery_init_definition(config)
        .block_processor(BlockProcessorBuilder::Mainnet)
        .name("DaoRecoveryTransition")
}

/// Tangerine Whistle: EIP-150 gas repricing only.
pub fn tangerine_whistle_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    homestead_definition(config)
        .gas_calculator(GasSchedule::TangerineWhistle)
        .name("TangerineWhistle")
}

/// Spurious Dragon: replay protection, account clearing, the 24576-byte code limit
/// and the RIPEMD-160 force-delete quirk.
pub fn spurious_dragon_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let contract_size_limit =
        config.contract_code_size_limit.unwrap_or(SPURIOUS_DRAGON_CONTRACT_SIZE_LIMIT);
    let stack_size_limit = config.stack_size_limit.unwrap_or(DEFAULT_MAX_STACK_SIZE);
    let evm = EvmSpec::new(EvmVariant::Homestead, config.evm_configuration);

    tangerine_whistle_definition(config)
        .gas_calculator(GasSchedule::SpuriousDragon)
        .skip_zero_block_rewards(true)
        .message_call_processor(MessageCallProcessor::with_force_delete(
            evm,
            PrecompileSet::Frontier,
            SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        ))
        .contract_creation_processor(ContractCreationProcessor {
            require_code_deposit_to_succeed: true,
            code_rules: vec![CodeValidationRule::MaxCodeSize(contract_size_limit)],
            initial_contract_nonce: 1,
            force_delete_when_empty: SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        })
        .transaction_validator(TransactionValidator {
            accepted_types: vec![TxType::Legacy],
            chain_id: config.chain_id,
            check_signature_malleability: true,
            replay_protection: true,
            max_init_code_size: usize::MAX,
            quorum_compatibility_mode: config.quorum_compatibility_mode,
        })
        .transaction_processor(TransactionProcessor {
            clear_empty_accounts: true,
            warm_coinbase: false,
            stack_size_limit,
            fee_market: FeeMarket::legacy(),
            coinbase_fee_price: CoinbaseFeePrice::Frontier,
        })
        .name("SpuriousDragon")
}

/// Byzantium: new precompiles and opcodes, status receipts, 3 ETH reward.
pub fn byzantium_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let stack_size_limit = config.stack_size_limit.unwrap_or(DEFAULT_MAX_STACK_SIZE);
    let evm = EvmSpec::new(EvmVariant::Byzantium, config.evm_configuration);

    spurious_dragon_definition(config)
        .gas_calculator(GasSchedule::Byzantium)
        .evm(evm.clone())
        .precompile_registry(PrecompileSet::Byzantium)
        .message_call_processor(MessageCallProcessor::with_force_delete(
            evm,
            PrecompileSet::Byzantium,
            SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        ))
        .difficulty_calculator(DifficultyCalculator::Byzantium)
        .transaction_receipt_factory(TransactionReceiptFactory::Byzantium {
            with_revert_reason: config.enable_revert_reason,
        })
        .block_reward(BYZANTIUM_BLOCK_REWARD)
        .private_transaction_processor(PrivateTransactionProcessor {
            stack_size_limit,
            chain_id: config.chain_id,
        })
        .name("Byzantium")
}

/// Constantinople: CREATE2 and friends, 2 ETH reward.
pub fn constantinople_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    byzantium_definition(config)
        .difficulty_calculator(DifficultyCalculator::Constantinople)
        .gas_calculator(GasSchedule::Constantinople)
        .evm(EvmSpec::new(EvmVariant::Constantinople, config.evm_configuration))
        .block_reward(CONSTANTINOPLE_BLOCK_REWARD)
        .name("Constantinople")
}

/// Petersburg: Constantinople with EIP-1283 rolled back.
pub fn petersburg_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    constantinople_definition(config)
        .gas_calculator(GasSchedule::Petersburg)
        .name("Petersburg")
}

/// Istanbul: CHAINID and SELFBALANCE; the chain id becomes observable in the EVM.
pub fn istanbul_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let evm = EvmSpec::with_chain_id(
        EvmVariant::Istanbul,
        config.chain_id,
        config.evm_configuration,
    );
    petersburg_definition(config)
        .gas_calculator(GasSchedule::Istanbul)
        .evm(evm.clone())
        .precompile_registry(PrecompileSet::Istanbul)
        .message_call_processor(MessageCallProcessor::with_force_delete(
            evm,
            PrecompileSet::Istanbul,
            SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        ))
        .name("Istanbul")
}

/// Muir Glacier: bomb delay only.
pub fn muir_glacier_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    istanbul_definition(config)
        .difficulty_calculator(DifficultyCalculator::MuirGlacier)
        .name("MuirGlacier")
}

/// Berlin: access lists and typed receipts.
pub fn berlin_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    muir_glacier_definition(config)
        .gas_calculator(GasSchedule::Berlin)
        .transaction_validator(TransactionValidator {
            accepted_types: vec![TxType::Legacy, TxType::AccessList],
            chain_id: config.chain_id,
            check_signature_malleability: true,
            replay_protection: true,
            max_init_code_size: usize::MAX,
            quorum_compatibility_mode: config.quorum_compatibility_mode,
        })
        .transaction_receipt_factory(TransactionReceiptFactory::Berlin {
            with_revert_reason: config.enable_revert_reason,
        })
        .name("Berlin")
}

/// London: the base-fee market, EIP-1559 transactions and the 0xEF code rule.
pub fn london_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let contract_size_limit =
        config.contract_code_size_limit.unwrap_or(SPURIOUS_DRAGON_CONTRACT_SIZE_LIMIT);
    let stack_size_limit = config.stack_size_limit.unwrap_or(DEFAULT_MAX_STACK_SIZE);
    let pow_hasher = PowHasher::from(config.pow_algorithm);
    let london_fork_block = config.london_block_number.unwrap_or(u64::MAX);
    let fee_market = london_fee_market(config, london_fork_block);
    let gas_limit_calculator = GasLimitCalculator::london(london_fork_block);
    let evm =
        EvmSpec::with_chain_id(EvmVariant::London, config.chain_id, config.evm_configuration);

    berlin_definition(config)
        .gas_calculator(GasSchedule::London)
        .gas_limit_calculator(gas_limit_calculator)
        .transaction_validator(TransactionValidator {
            accepted_types: vec![TxType::Legacy, TxType::AccessList, TxType::Eip1559],
            chain_id: config.chain_id,
            check_signature_malleability: true,
            replay_protection: true,
            max_init_code_size: usize::MAX,
            quorum_compatibility_mode: config.quorum_compatibility_mode,
        })
        .transaction_processor(TransactionProcessor {
            clear_empty_accounts: true,
            warm_coinbase: false,
            stack_size_limit,
            fee_market: FeeMarket::London(fee_market),
            coinbase_fee_price: CoinbaseFeePrice::Eip1559,
        })
        .contract_creation_processor(ContractCreationProcessor {
            require_code_deposit_to_succeed: true,
            code_rules: vec![
                CodeValidationRule::MaxCodeSize(contract_size_limit),
                CodeValidationRule::RejectEfPrefix,
            ],
            initial_contract_nonce: 1,
            force_delete_when_empty: SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        })
        .message_call_processor(MessageCallProcessor::with_force_delete(
            evm.clone(),
            PrecompileSet::Istanbul,
            SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        ))
        .evm(evm)
        .fee_market(FeeMarket::London(fee_market))
        .difficulty_calculator(DifficultyCalculator::London)
        .block_header_validator(BlockHeaderValidator::create_base_fee_market_validator(
            pow_hasher,
            gas_limit_calculator,
            fee_market,
        ))
        .ommer_header_validator(BlockHeaderValidator::create_base_fee_market_ommer_validator(
            pow_hasher,
            gas_limit_calculator,
            fee_market,
        ))
        .block_body_validator(BlockBodyValidator::BaseFee)
        .name("London")
}

/// Arrow Glacier: bomb delay only.
pub fn arrow_glacier_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    london_definition(config)
        .difficulty_calculator(DifficultyCalculator::ArrowGlacier)
        .name("ArrowGlacier")
}

/// Gray Glacier: bomb delay only.
pub fn gray_glacier_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    arrow_glacier_definition(config)
        .difficulty_calculator(DifficultyCalculator::GrayGlacier)
        .name("GrayGlacier")
}

/// Paris: the merge. Difficulty is constant zero, the mix hash carries the RANDAO
/// reveal and the block reward disappears.
pub fn paris_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let london_fork_block = config.london_block_number.unwrap_or(u64::MAX);
    let fee_market = london_fee_market(config, london_fork_block);

    gray_glacier_definition(config)
        .evm(EvmSpec::with_chain_id(
            EvmVariant::Paris,
            config.chain_id,
            config.evm_configuration,
        ))
        .difficulty_calculator(DifficultyCalculator::ProofOfStake)
        .block_header_validator(BlockHeaderValidator::merge_block_header_validator(
            GasLimitCalculator::london(london_fork_block),
            fee_market,
        ))
        .block_reward(U256::ZERO)
        .name("Paris")
        .is_pos(true)
}

/// Shanghai: PUSH0, warm coinbase, the init-code bound and withdrawals.
pub fn shanghai_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let stack_size_limit = config.stack_size_limit.unwrap_or(DEFAULT_MAX_STACK_SIZE);
    let london_fork_block = config.london_block_number.unwrap_or(0);
    let fee_market = london_fee_market(config, london_fork_block);

    paris_definition(config)
        // the gas schedule picks up EIP-3860 init-code metering
        .gas_calculator(GasSchedule::Shanghai)
        // PUSH0 is the only opcode addition
        .evm(EvmSpec::with_chain_id(
            EvmVariant::Shanghai,
            config.chain_id,
            config.evm_configuration,
        ))
        // EIP-3651 flips the warm-coinbase flag
        .transaction_processor(TransactionProcessor {
            clear_empty_accounts: true,
            warm_coinbase: true,
            stack_size_limit,
            fee_market: FeeMarket::London(fee_market),
            coinbase_fee_price: CoinbaseFeePrice::Eip1559,
        })
        // EIP-3860 bounds the init code of creation transactions
        .transaction_validator(TransactionValidator {
            accepted_types: vec![TxType::Legacy, TxType::AccessList, TxType::Eip1559],
            chain_id: config.chain_id,
            check_signature_malleability: true,
            replay_protection: true,
            max_init_code_size: SHANGHAI_INIT_CODE_SIZE_LIMIT,
            quorum_compatibility_mode: config.quorum_compatibility_mode,
        })
        .withdrawals_processor(WithdrawalsProcessor)
        .withdrawals_validator(WithdrawalsValidator::AllowedWithdrawals)
        .name("Shanghai")
}

/// Cancun: blob transactions, transient storage and the EOF code rule.
pub fn cancun_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    let contract_size_limit =
        config.contract_code_size_limit.unwrap_or(SPURIOUS_DRAGON_CONTRACT_SIZE_LIMIT);
    let stack_size_limit = config.stack_size_limit.unwrap_or(DEFAULT_MAX_STACK_SIZE);
    let london_fork_block = config.london_block_number.unwrap_or(0);
    let base = london_fee_market(config, london_fork_block);
    let fee_market = FeeMarket::Cancun { base, blob: BlobFeeParams::cancun() };

    shanghai_definition(config)
        .fee_market(fee_market)
        // blob gas joins execution gas as a second dimension
        .gas_calculator(GasSchedule::Cancun)
        // and is capped per block
        .gas_limit_calculator(GasLimitCalculator::cancun(london_fork_block))
        .evm(EvmSpec::with_chain_id(
            EvmVariant::Cancun,
            config.chain_id,
            config.evm_configuration,
        ))
        // contract creation accepts EOF containers
        .contract_creation_processor(ContractCreationProcessor {
            require_code_deposit_to_succeed: true,
            code_rules: vec![
                CodeValidationRule::MaxCodeSize(contract_size_limit),
                CodeValidationRule::EofValidation { version: 1 },
            ],
            initial_contract_nonce: 1,
            force_delete_when_empty: SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES.to_vec(),
        })
        .transaction_processor(TransactionProcessor {
            clear_empty_accounts: true,
            warm_coinbase: true,
            stack_size_limit,
            fee_market,
            coinbase_fee_price: CoinbaseFeePrice::Eip1559,
        })
        .transaction_validator(TransactionValidator {
            accepted_types: vec![
                TxType::Legacy,
                TxType::AccessList,
                TxType::Eip1559,
                TxType::Blob,
            ],
            chain_id: config.chain_id,
            check_signature_malleability: true,
            replay_protection: true,
            max_init_code_size: SHANGHAI_INIT_CODE_SIZE_LIMIT,
            quorum_compatibility_mode: config.quorum_compatibility_mode,
        })
        .precompile_registry(PrecompileSet::Cancun)
        .name("Cancun")
}

/// Accepted-but-unscheduled EIPs; tracks ratification, content unstable.
pub fn future_eips_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    cancun_definition(config)
        .evm(EvmSpec::with_chain_id(
            EvmVariant::FutureEips,
            config.chain_id,
            config.evm_configuration,
        ))
        .name("FutureEips")
}

/// Proposed EIPs under evaluation; content unstable.
pub fn experimental_eips_definition(config: &SpecConfig) -> ProtocolSpecBuilder {
    future_eips_definition(config)
        .evm(EvmSpec::with_chain_id(
            EvmVariant::ExperimentalEips,
            config.chain_id,
            config.evm_configuration,
        ))
        .deposits_validator(DepositsValidator::AllowedDeposits)
        .name("ExperimentalEips")
}

/// Returns the definition of `fork`, pre-populated with the whole delta chain below
/// it.
///
/// Fails with [`ScheduleError::UnknownFork`] for forks outside the delta chain.
pub fn definition(
    fork: Hardfork,
    config: &SpecConfig,
) -> Result<ProtocolSpecBuilder, ScheduleError> {
    Ok(match fork {
        Hardfork::Frontier => frontier_definition(config),
        Hardfork::Homestead => homestead_definition(config),
        Hardfork::DaoRecoveryInit => dao_recovery_init_definition(config),
        Hardfork::DaoRecoveryTransition => dao_recovery_transition_definition(config),
        Hardfork::TangerineWhistle => tangerine_whistle_definition(config),
        Hardfork::SpuriousDragon => spurious_dragon_definition(config),
        Hardfork::Byzantium => byzantium_definition(config),
        Hardfork::Constantinople => constantinople_definition(config),
        Hardfork::Petersburg => petersburg_definition(config),
        Hardfork::Istanbul => istanbul_definition(config),
        Hardfork::MuirGlacier => muir_glacier_definition(config),
        Hardfork::Berlin => berlin_definition(config),
        Hardfork::London => london_definition(config),
        Hardfork::ArrowGlacier => arrow_glacier_definition(config),
        Hardfork::GrayGlacier => gray_glacier_definition(config),
        Hardfork::Paris => paris_definition(config),
        Hardfork::Shanghai => shanghai_definition(config),
        Hardfork::Cancun => cancun_definition(config),
        Hardfork::FutureEips => future_eips_definition(config),
        Hardfork::ExperimentalEips => experimental_eips_definition(config),
        other => return Err(ScheduleError::UnknownFork { name: other.name().to_string() }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::RIPEMD160_PRECOMPILE,
        receipts::TransactionReceiptFactory,
        spec::ProtocolSpec,
    };

    fn build(fork: Hardfork) -> ProtocolSpec {
        definition(fork, &SpecConfig::mainnet()).unwrap().build().unwrap()
    }

    const ALL_FORKS: [Hardfork; 20] = [
        Hardfork::Frontier,
        Hardfork::Homestead,
        Hardfork::DaoRecoveryInit,
        Hardfork::DaoRecoveryTransition,
        Hardfork::TangerineWhistle,
        Hardfork::SpuriousDragon,
        Hardfork::Byzantium,
        Hardfork::Constantinople,
        Hardfork::Petersburg,
        Hardfork::Istanbul,
        Hardfork::MuirGlacier,
        Hardfork::Berlin,
        Hardfork::London,
        Hardfork::ArrowGlacier,
        Hardfork::GrayGlacier,
        Hardfork::Paris,
        Hardfork::Shanghai,
        Hardfork::Cancun,
        Hardfork::FutureEips,
        Hardfork::ExperimentalEips,
    ];

    #[test]
    fn every_definition_builds_a_total_spec() {
        for fork in ALL_FORKS {
            let spec = build(fork);
            assert_eq!(spec.name, fork.name(), "spec name must match the fork name");
        }
    }

    #[test]
    fn frontier_baseline() {
        let spec = build(Hardfork::Frontier);
        assert_eq!(spec.block_reward, FRONTIER_BLOCK_REWARD);
        assert!(!spec.skip_zero_block_rewards);
        assert_eq!(
            spec.contract_creation_processor.code_rules,
            vec![CodeValidationRule::MaxCodeSize(FRONTIER_CONTRACT_SIZE_LIMIT)]
        );
        assert_eq!(spec.contract_creation_processor.initial_contract_nonce, 0);
        assert!(!spec.contract_creation_processor.require_code_deposit_to_succeed);
        assert!(!spec.transaction_validator.replay_protection);
        assert_eq!(spec.transaction_receipt_factory, TransactionReceiptFactory::Frontier);
        assert!(!spec.is_proof_of_stake);
    }

    #[test]
    fn homestead_enables_code_deposit_failure_and_low_s() {
        let spec = build(Hardfork::Homestead);
        assert!(spec.contract_creation_processor.require_code_deposit_to_succeed);
        assert!(spec.transaction_validator.check_signature_malleability);
        assert_eq!(spec.gas_calculator, GasSchedule::Homestead);
        // inherited unchanged
        assert_eq!(spec.block_reward, FRONTIER_BLOCK_REWARD);
    }

    #[test]
    fn dao_recovery_wraps_and_unwraps_the_processor() {
        let init = build(Hardfork::DaoRecoveryInit);
        let transition = build(Hardfork::DaoRecoveryTransition);

        assert!(format!("{:?}", init.block_processor).contains("DaoBlockProcessor"));
        assert!(!format!("{:?}", transition.block_processor).contains("DaoBlockProcessor"));
    }

    #[test]
    fn spurious_dragon_quirks() {
        let spec = build(Hardfork::SpuriousDragon);
        assert_eq!(
            spec.message_call_processor.force_delete_when_empty,
            vec![RIPEMD160_PRECOMPILE]
        );
        assert_eq!(spec.contract_creation_processor.initial_contract_nonce, 1);
        assert_eq!(
            spec.contract_creation_processor.code_rules,
            vec![CodeValidationRule::MaxCodeSize(SPURIOUS_DRAGON_CONTRACT_SIZE_LIMIT)]
        );
        assert!(spec.transaction_validator.replay_protection);
        assert_eq!(spec.transaction_validator.chain_id, Some(1));
        assert!(spec.skip_zero_block_rewards);
        assert!(spec.transaction_processor.clear_empty_accounts);
    }

    #[test]
    fn reward_era_changes() {
        assert_eq!(build(Hardfork::TangerineWhistle).block_reward, FRONTIER_BLOCK_REWARD);
        assert_eq!(build(Hardfork::Byzantium).block_reward, BYZANTIUM_BLOCK_REWARD);
        assert_eq!(build(Hardfork::Constantinople).block_reward, CONSTANTINOPLE_BLOCK_REWARD);
        assert_eq!(build(Hardfork::GrayGlacier).block_reward, CONSTANTINOPLE_BLOCK_REWARD);
        assert_eq!(build(Hardfork::Paris).block_reward, U256::ZERO);
    }

    #[test]
    fn petersburg_only_rolls_back_the_gas_schedule() {
        let constantinople = build(Hardfork::Constantinople);
        let petersburg = build(Hardfork::Petersburg);

        assert_eq!(constantinople.gas_calculator, GasSchedule::Constantinople);
        assert_eq!(petersburg.gas_calculator, GasSchedule::Petersburg);
        // everything else is inherited unchanged
        assert_eq!(petersburg.evm, constantinople.evm);
        assert_eq!(petersburg.block_reward, constantinople.block_reward);
        assert_eq!(petersburg.difficulty_calculator, constantinople.difficulty_calculator);
        assert_eq!(petersburg.transaction_validator, constantinople.transaction_validator);
    }

    #[test]
    fn glacier_forks_only_delay_the_bomb() {
        let london = build(Hardfork::London);
        let arrow = build(Hardfork::ArrowGlacier);
        let gray = build(Hardfork::GrayGlacier);

        assert_eq!(arrow.difficulty_calculator, DifficultyCalculator::ArrowGlacier);
        assert_eq!(gray.difficulty_calculator, DifficultyCalculator::GrayGlacier);
        for (next, base) in [(&arrow, &london), (&gray, &arrow)] {
            assert_eq!(next.gas_calculator, base.gas_calculator);
            assert_eq!(next.evm, base.evm);
            assert_eq!(next.fee_market, base.fee_market);
            assert_eq!(next.transaction_validator, base.transaction_validator);
            assert_eq!(next.block_reward, base.block_reward);
        }
    }

    #[test]
    fn berlin_accepts_access_lists_and_types_receipts() {
        let spec = build(Hardfork::Berlin);
        assert_eq!(
            spec.transaction_validator.accepted_types,
            vec![TxType::Legacy, TxType::AccessList]
        );
        assert_eq!(
            spec.transaction_receipt_factory,
            TransactionReceiptFactory::Berlin { with_revert_reason: false }
        );
    }

    #[test]
    fn london_fee_market_and_code_rule() {
        let spec = build(Hardfork::London);
        assert!(spec.fee_market.implements_base_fee());
        assert!(spec
            .contract_creation_processor
            .code_rules
            .contains(&CodeValidationRule::RejectEfPrefix));
        assert_eq!(
            spec.transaction_validator.accepted_types,
            vec![TxType::Legacy, TxType::AccessList, TxType::Eip1559]
        );
        assert_eq!(spec.transaction_processor.coinbase_fee_price, CoinbaseFeePrice::Eip1559);
        assert_eq!(spec.block_body_validator, BlockBodyValidator::BaseFee);
    }

    #[test]
    fn zero_base_fee_selects_the_pinned_market() {
        let config = SpecConfig {
            zero_base_fee: true,
            london_block_number: Some(0),
            ..SpecConfig::default()
        };
        let spec = london_definition(&config).build().unwrap();
        let market = spec.fee_market.base_fee_market().unwrap();
        assert!(market.zero_base_fee);
    }

    #[test]
    fn paris_is_proof_of_stake() {
        let spec = build(Hardfork::Paris);
        assert!(spec.is_proof_of_stake);
        assert_eq!(spec.block_reward, U256::ZERO);
        assert_eq!(spec.difficulty_calculator, DifficultyCalculator::ProofOfStake);
        assert_eq!(spec.evm.variant, EvmVariant::Paris);
    }

    #[test]
    fn shanghai_warm_coinbase_and_init_code_limit() {
        let spec = build(Hardfork::Shanghai);
        assert!(spec.transaction_processor.warm_coinbase);
        assert_eq!(
            spec.transaction_validator.max_init_code_size,
            SHANGHAI_INIT_CODE_SIZE_LIMIT
        );
        assert_eq!(spec.withdrawals_validator, Some(WithdrawalsValidator::AllowedWithdrawals));
        assert!(spec.withdrawals_processor.is_some());
        assert_eq!(spec.gas_calculator, GasSchedule::Shanghai);
    }

    #[test]
    fn cancun_blob_rules() {
        let spec = build(Hardfork::Cancun);
        assert!(matches!(spec.fee_market, FeeMarket::Cancun { .. }));
        assert!(spec.transaction_validator.accepted_types.contains(&TxType::Blob));
        assert_eq!(spec.precompile_registry, PrecompileSet::Cancun);
        assert!(spec
            .contract_creation_processor
            .code_rules
            .contains(&CodeValidationRule::EofValidation { version: 1 }));
        assert!(spec.gas_limit_calculator.max_blob_gas_per_block().is_some());
    }

    #[test]
    fn experimental_enables_deposits() {
        let future = build(Hardfork::FutureEips);
        let experimental = build(Hardfork::ExperimentalEips);
        assert_eq!(future.evm.variant, EvmVariant::FutureEips);
        assert_eq!(future.deposits_validator, None);
        assert_eq!(experimental.evm.variant, EvmVariant::ExperimentalEips);
        assert_eq!(experimental.deposits_validator, Some(DepositsValidator::AllowedDeposits));
    }

    #[test]
    fn quorum_mode_selects_quorum_variants() {
        let config = SpecConfig { quorum_compatibility_mode: true, ..SpecConfig::mainnet() };
        let spec = frontier_definition(&config).build().unwrap();
        assert_eq!(spec.block_validator, BlockValidatorKind::Quorum);
        assert!(format!("{:?}", spec.block_processor).contains("QuorumBlockProcessor"));
    }
}
