//! End-to-end scenarios against the assembled schedule.

use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use ethspec_hardforks::{ChainHardforks, ForkCondition, Hardfork, Head, MAINNET_TERMINAL_TOTAL_DIFFICULTY};
use ethspec_mainnet::{
    constants::{FRONTIER_BLOCK_REWARD, FRONTIER_CONTRACT_SIZE_LIMIT},
    dao::{dao_hardfork_accounts, DAO_REFUND_CONTRACT},
    primitives::{Transaction, TransactionProcessingResult, TxType},
    processor::MutableWorldState,
    processors::CodeValidationRule,
    receipts::{TransactionOutcome, TransactionReceiptFactory},
    transaction::InvalidTransaction,
    ProtocolSchedule, SpecConfig,
};
use std::collections::HashMap;

fn head(number: u64, timestamp: u64, total_difficulty: U256) -> Head {
    Head { number, timestamp, total_difficulty, ..Default::default() }
}

/// A plain in-memory world state for exercising irregular state transitions.
#[derive(Default)]
struct TestWorldState {
    balances: HashMap<Address, U256>,
}

impl TestWorldState {
    fn with_balance(mut self, address: Address, balance: U256) -> Self {
        self.balances.insert(address, balance);
        self
    }
}

impl MutableWorldState for TestWorldState {
    fn balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        self.balances.insert(address, balance);
    }

    fn commit(&mut self) {}
}

#[test]
fn frontier_spec_at_genesis() {
    let schedule = ProtocolSchedule::from_fork_names(
        [("frontier", ForkCondition::Block(0))],
        &SpecConfig::default(),
    )
    .unwrap();

    let spec = schedule.by_head(&head(0, 0, U256::ZERO)).unwrap();
    assert_eq!(spec.name, "Frontier");
    assert_eq!(spec.block_reward, FRONTIER_BLOCK_REWARD);
    assert_eq!(
        spec.contract_creation_processor.code_rules,
        vec![CodeValidationRule::MaxCodeSize(FRONTIER_CONTRACT_SIZE_LIMIT)]
    );
    assert_eq!(spec.transaction_receipt_factory, TransactionReceiptFactory::Frontier);

    // The Frontier receipt form commits the post-transaction state root.
    let root = B256::repeat_byte(0x42);
    let receipt = spec.transaction_receipt_factory.create(
        TxType::Legacy,
        &TransactionProcessingResult::successful(vec![]),
        root,
        21_000,
    );
    assert_eq!(receipt.outcome, TransactionOutcome::StateRoot(root));
}

#[test]
fn dao_block_performs_the_balance_migration() {
    let schedule = ProtocolSchedule::new(&ChainHardforks::mainnet(), &SpecConfig::mainnet()).unwrap();

    let drained_account = dao_hardfork_accounts().unwrap()[0];
    let mut state = TestWorldState::default()
        .with_balance(drained_account, U256::from(100u64));

    // The spec governing the fork block carries the wrapped processor.
    let spec = schedule
        .by_head(&head(1_920_000, 1_469_020_840, U256::from(1_920_000u64)))
        .unwrap();
    assert_eq!(spec.name, "DaoRecoveryInit");
    spec.block_processor.apply_pre_execution_changes(&mut state).unwrap();

    assert_eq!(state.balance(drained_account), U256::ZERO);
    assert_eq!(state.balance(DAO_REFUND_CONTRACT), U256::from(100u64));

    // Ten blocks later processing is back to normal: no further migration.
    let spec = schedule
        .by_head(&head(1_920_010, 1_469_021_000, U256::from(1_920_010u64)))
        .unwrap();
    assert_eq!(spec.name, "DaoRecoveryTransition");
    state.set_balance(drained_account, U256::from(5u64));
    spec.block_processor.apply_pre_execution_changes(&mut state).unwrap();
    assert_eq!(state.balance(drained_account), U256::from(5u64));
    assert_eq!(state.balance(DAO_REFUND_CONTRACT), U256::from(100u64));
}

#[test]
fn berlin_receipt_for_access_list_transaction() {
    let schedule = ProtocolSchedule::mainnet().unwrap();
    let spec = schedule
        .by_head(&head(12_244_000, 1_618_481_223, U256::from(12_244_000u64)))
        .unwrap();
    assert_eq!(spec.name, "Berlin");

    let receipt = spec.transaction_receipt_factory.create(
        TxType::AccessList,
        &TransactionProcessingResult::successful(vec![]),
        B256::ZERO,
        21_000,
    );
    assert_eq!(receipt.tx_type, TxType::AccessList);
    assert_eq!(receipt.outcome, TransactionOutcome::Status(true));
    assert_eq!(receipt.cumulative_gas_used, 21_000);
    assert_eq!(receipt.revert_reason, None);
}

#[test]
fn london_gas_limit_doubles_across_activation() {
    let schedule = ProtocolSchedule::mainnet().unwrap();
    let spec = schedule
        .by_head(&head(12_965_000, 1_628_166_822, U256::from(12_965_000u64)))
        .unwrap();
    assert_eq!(spec.name, "London");

    // The activation block targets twice the parent limit, per the fee-market
    // elasticity.
    let calc = &spec.gas_limit_calculator;
    assert_eq!(calc.next_gas_limit(30_000_000, None, 12_965_000), 60_000_000);
    // After activation the limit drifts toward the target within the usual bound.
    assert_eq!(calc.next_gas_limit(60_000_000, None, 12_965_001), 60_000_000);
    assert_eq!(
        calc.next_gas_limit(60_000_000, Some(59_000_000), 12_965_001),
        60_000_000 - (60_000_000 / 1024 - 1)
    );
}

#[test]
fn paris_activates_at_terminal_total_difficulty() {
    let schedule = ProtocolSchedule::mainnet().unwrap();

    let parent_difficulty = MAINNET_TERMINAL_TOTAL_DIFFICULTY - U256::from(1_000_000u64);
    let pre = schedule.by_head(&head(15_537_393, 1_663_224_150, parent_difficulty)).unwrap();
    assert!(!pre.is_proof_of_stake);

    // The block whose cumulative difficulty reaches the threshold is post-merge.
    let post = schedule
        .by_head(&head(15_537_394, 1_663_224_162, MAINNET_TERMINAL_TOTAL_DIFFICULTY))
        .unwrap();
    assert!(post.is_proof_of_stake);
    assert_eq!(post.block_reward, U256::ZERO);
    assert_eq!(
        post.difficulty_calculator.fixed_difficulty(),
        Some(U256::ZERO)
    );
}

#[test]
fn shanghai_rejects_oversized_init_code() {
    let schedule = ProtocolSchedule::mainnet().unwrap();
    let spec = schedule
        .by_head(&head(17_034_870, 1_681_338_455, MAINNET_TERMINAL_TOTAL_DIFFICULTY))
        .unwrap();
    assert_eq!(spec.name, "Shanghai");

    let creation = Transaction {
        tx_type: TxType::Eip1559,
        chain_id: Some(1),
        kind: TxKind::Create,
        input: Bytes::from(vec![0u8; 49_153]),
        gas_limit: 10_000_000,
    };
    assert_eq!(
        spec.transaction_validator.validate(&creation),
        Err(InvalidTransaction::InitCodeTooLarge { size: 49_153, limit: 49_152 })
    );

    let creation = Transaction { input: Bytes::from(vec![0u8; 49_152]), ..creation };
    spec.transaction_validator.validate(&creation).unwrap();
}

#[test]
fn fork_names_resolve_case_insensitively() {
    let schedule = ProtocolSchedule::from_fork_names(
        [
            ("Frontier", ForkCondition::Block(0)),
            ("HOMESTEAD", ForkCondition::Block(10)),
            ("tangerinewhistle", ForkCondition::Block(20)),
        ],
        &SpecConfig::default(),
    )
    .unwrap();
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule.by_head(&head(15, 0, U256::ZERO)).unwrap().name, "Homestead");
}

#[test]
fn specs_are_shared_not_rebuilt() {
    let schedule = ProtocolSchedule::mainnet().unwrap();
    // Two lookups inside the same fork window return the same shared spec.
    let a = schedule.by_head(&head(4_370_000, 1_508_131_331, U256::from(4_370_000u64))).unwrap();
    let b = schedule.by_head(&head(5_000_000, 1_510_000_000, U256::from(5_000_000u64))).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(a.name, "Byzantium");
}

#[test]
fn quorum_mode_changes_no_fork_delta() {
    let quorum = SpecConfig { quorum_compatibility_mode: true, ..SpecConfig::mainnet() };
    let schedule = ProtocolSchedule::new(&ChainHardforks::mainnet(), &quorum).unwrap();
    let spec = schedule
        .by_head(&head(12_965_000, 1_628_166_822, U256::from(12_965_000u64)))
        .unwrap();
    // The quorum flag swaps the validator/processor variants and nothing else.
    assert_eq!(spec.name, "London");
    assert!(spec.fee_market.implements_base_fee());
    assert_eq!(Hardfork::London.mainnet_activation_block(), Some(12_965_000));
}
