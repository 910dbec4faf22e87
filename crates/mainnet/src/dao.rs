//! The DAO irregular state transition.
//!
//! At the first block of the recovery window the balances of a fixed list of
//! accounts are moved into a refund contract before any transaction executes. The
//! account list is a bundled asset, loaded once and cached for the lifetime of the
//! process.

use crate::{
    error::StateRewriteError,
    primitives::{BlockHeader, Withdrawal},
    processor::{BlockProcessor, MutableWorldState},
};
use alloy_primitives::{address, Address, U256};
use once_cell::sync::Lazy;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// The contract the drained balances are refunded to.
pub const DAO_REFUND_CONTRACT: Address = address!("bf4ed7b27f1d666546e30d74d50d173d20bca754");

/// The extra-data marker fork blocks must carry: `dao-hard-fork`.
pub const DAO_EXTRA_DATA: &[u8] = b"dao-hard-fork";

static DAO_HARDFORK_ACCOUNTS: Lazy<Result<Vec<Address>, StateRewriteError>> =
    Lazy::new(|| parse_dao_accounts(include_str!("../res/dao_addresses.json")));

fn parse_dao_accounts(raw: &str) -> Result<Vec<Address>, StateRewriteError> {
    let entries: Vec<String> = serde_json::from_str(raw)
        .map_err(|err| StateRewriteError { reason: err.to_string() })?;
    entries
        .iter()
        .map(|entry| {
            entry.parse::<Address>().map_err(|err| StateRewriteError {
                reason: format!("malformed address `{entry}`: {err}"),
            })
        })
        .collect()
}

/// The bundled list of drained accounts, in processing order.
pub fn dao_hardfork_accounts() -> Result<&'static [Address], StateRewriteError> {
    match &*DAO_HARDFORK_ACCOUNTS {
        Ok(accounts) => Ok(accounts),
        Err(err) => Err(err.clone()),
    }
}

/// A block processor that performs the one-shot DAO balance migration before
/// delegating to the wrapped processor.
///
/// The schedule binds this wrapper only for the spec governing the recovery window;
/// surrounding heights use the unwrapped processor, so no per-block branching is
/// needed.
#[derive(Debug, Clone)]
pub struct DaoBlockProcessor {
    wrapped: Arc<dyn BlockProcessor>,
}

impl DaoBlockProcessor {
    /// Wraps the given processor.
    pub fn new(wrapped: Arc<dyn BlockProcessor>) -> Self {
        Self { wrapped }
    }
}

impl BlockProcessor for DaoBlockProcessor {
    fn apply_pre_execution_changes(
        &self,
        state: &mut dyn MutableWorldState,
    ) -> Result<(), StateRewriteError> {
        let accounts = dao_hardfork_accounts()?;

        // drain all listed accounts, in asset order
        let mut drained = U256::ZERO;
        for address in accounts {
            let balance = state.balance(*address);
            state.set_balance(*address, U256::ZERO);
            drained += balance;
        }

        // add the drained ether to the refund contract
        let refund_balance = state.balance(DAO_REFUND_CONTRACT);
        state.set_balance(DAO_REFUND_CONTRACT, refund_balance + drained);

        // the rewrite is committed before any transaction of the block executes
        state.commit();
        debug!(target: "mainnet::dao", accounts = accounts.len(), %drained, "applied DAO balance migration");

        self.wrapped.apply_pre_execution_changes(state)
    }

    fn post_block_balance_increments(
        &self,
        header: &BlockHeader,
        ommers: &[BlockHeader],
        withdrawals: Option<&[Withdrawal]>,
    ) -> HashMap<Address, U256> {
        self.wrapped.post_block_balance_increments(header, ommers, withdrawals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{processor::MainnetBlockProcessor, rules::MiningBeneficiaryCalculator};

    /// An in-memory world state that records every balance-lowering write, so a
    /// double application of the migration is observable.
    #[derive(Default)]
    struct RecordingWorldState {
        balances: HashMap<Address, U256>,
        debits: usize,
        commits: usize,
    }

    impl MutableWorldState for RecordingWorldState {
        fn balance(&self, address: Address) -> U256 {
            self.balances.get(&address).copied().unwrap_or_default()
        }

        fn set_balance(&mut self, address: Address, balance: U256) {
            if balance < self.balance(address) {
                self.debits += 1;
            }
            self.balances.insert(address, balance);
        }

        fn commit(&mut self) {
            self.commits += 1;
        }
    }

    fn dao_processor() -> DaoBlockProcessor {
        DaoBlockProcessor::new(Arc::new(MainnetBlockProcessor::new(
            crate::constants::FRONTIER_BLOCK_REWARD,
            false,
            MiningBeneficiaryCalculator::Coinbase,
        )))
    }

    #[test]
    fn bundled_account_list_parses() {
        let accounts = dao_hardfork_accounts().unwrap();
        assert_eq!(accounts.len(), 116);
        // The refund contract itself is not drained.
        assert!(!accounts.contains(&DAO_REFUND_CONTRACT));
        // The main DAO contract is.
        assert!(accounts.contains(&address!("bb9bc244d798123fde783fcc1c72d3bb8c189413")));
    }

    #[test]
    fn malformed_asset_is_a_state_rewrite_error() {
        assert!(parse_dao_accounts("[\"not an address\"]").is_err());
        assert!(parse_dao_accounts("{").is_err());
    }

    #[test]
    fn migrates_balances_to_refund_contract() {
        let accounts = dao_hardfork_accounts().unwrap();
        let mut state = RecordingWorldState::default();
        state.balances.insert(accounts[0], U256::from(100u64));
        state.balances.insert(accounts[1], U256::from(250u64));
        state.balances.insert(DAO_REFUND_CONTRACT, U256::from(7u64));

        dao_processor().apply_pre_execution_changes(&mut state).unwrap();

        assert_eq!(state.balance(accounts[0]), U256::ZERO);
        assert_eq!(state.balance(accounts[1]), U256::ZERO);
        assert_eq!(state.balance(DAO_REFUND_CONTRACT), U256::from(357u64));
        assert_eq!(state.commits, 1);
    }

    #[test]
    fn reapplication_moves_nothing() {
        let accounts = dao_hardfork_accounts().unwrap();
        let mut state = RecordingWorldState::default();
        state.balances.insert(accounts[0], U256::from(100u64));

        let processor = dao_processor();
        processor.apply_pre_execution_changes(&mut state).unwrap();
        let debits_after_first = state.debits;
        let refund_balance = state.balance(DAO_REFUND_CONTRACT);

        // The schedule applies the wrapper exactly once per block; a second run
        // would find the accounts already drained and must not move anything.
        processor.apply_pre_execution_changes(&mut state).unwrap();
        assert_eq!(state.debits, debits_after_first);
        assert_eq!(state.balance(DAO_REFUND_CONTRACT), refund_balance);
    }
}
