//! Withdrawal and deposit handling, Shanghai on.

use crate::primitives::{Deposit, Withdrawal};
use alloy_primitives::{Address, U256};
use std::collections::HashMap;

/// Rejections of a block's withdrawal list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WithdrawalsValidationError {
    /// Withdrawals are required but the block carries none.
    #[error("block is missing its withdrawals list")]
    MissingWithdrawals,
    /// Withdrawals are not activated but the block carries some.
    #[error("withdrawals are not enabled at this fork")]
    UnexpectedWithdrawals,
}

/// Whether a block must, or must not, carry withdrawals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WithdrawalsValidator {
    /// Shanghai on: every block carries a (possibly empty) withdrawals list.
    AllowedWithdrawals,
    /// Pre-Shanghai: a block with withdrawals is invalid.
    ProhibitedWithdrawals,
}

impl WithdrawalsValidator {
    /// Validates the presence of the withdrawals list.
    pub fn validate(
        &self,
        withdrawals: Option<&[Withdrawal]>,
    ) -> Result<(), WithdrawalsValidationError> {
        match self {
            Self::AllowedWithdrawals if withdrawals.is_none() => {
                Err(WithdrawalsValidationError::MissingWithdrawals)
            }
            Self::ProhibitedWithdrawals if withdrawals.is_some() => {
                Err(WithdrawalsValidationError::UnexpectedWithdrawals)
            }
            _ => Ok(()),
        }
    }
}

/// Applies withdrawal amounts to the touched accounts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct WithdrawalsProcessor;

impl WithdrawalsProcessor {
    /// Returns a map of addresses to their withdrawal balance increments.
    ///
    /// Withdrawal amounts are counted in gwei on the consensus layer and credited in
    /// wei here.
    pub fn balance_increments(&self, withdrawals: &[Withdrawal]) -> HashMap<Address, U256> {
        let mut balance_increments = HashMap::with_capacity(withdrawals.len());
        for withdrawal in withdrawals {
            *balance_increments.entry(withdrawal.address).or_default() += withdrawal.amount_wei();
        }
        balance_increments
    }
}

/// Whether a block must, or must not, carry consensus-layer deposits
/// ([EIP-6110](https://eips.ethereum.org/EIPS/eip-6110)).
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DepositsValidator {
    /// Deposits are expected in the block body.
    AllowedDeposits,
    /// A block carrying deposits is invalid.
    ProhibitedDeposits,
}

/// Rejections of a block's deposit list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepositsValidationError {
    /// Deposits are required but the block carries none.
    #[error("block is missing its deposits list")]
    MissingDeposits,
    /// Deposits are not activated but the block carries some.
    #[error("deposits are not enabled at this fork")]
    UnexpectedDeposits,
}

impl DepositsValidator {
    /// Validates the presence of the deposits list.
    pub fn validate(&self, deposits: Option<&[Deposit]>) -> Result<(), DepositsValidationError> {
        match self {
            Self::AllowedDeposits if deposits.is_none() => {
                Err(DepositsValidationError::MissingDeposits)
            }
            Self::ProhibitedDeposits if deposits.is_some() => {
                Err(DepositsValidationError::UnexpectedDeposits)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn withdrawal_presence_rules() {
        let withdrawals = [Withdrawal::default()];
        assert!(WithdrawalsValidator::AllowedWithdrawals.validate(Some(&withdrawals)).is_ok());
        assert!(WithdrawalsValidator::AllowedWithdrawals.validate(None).is_err());
        assert!(WithdrawalsValidator::ProhibitedWithdrawals.validate(None).is_ok());
        assert!(WithdrawalsValidator::ProhibitedWithdrawals.validate(Some(&withdrawals)).is_err());
    }

    #[test]
    fn withdrawal_increments_accumulate_per_address() {
        let target = address!("4838b106fce9647bdf1e7877bf73ce8b0bad5f97");
        let withdrawals = [
            Withdrawal { index: 0, validator_index: 7, address: target, amount: 1 },
            Withdrawal { index: 1, validator_index: 8, address: target, amount: 2 },
        ];
        let increments = WithdrawalsProcessor.balance_increments(&withdrawals);
        assert_eq!(increments.len(), 1);
        assert_eq!(increments[&target], U256::from(3_000_000_000u64));
    }
}
