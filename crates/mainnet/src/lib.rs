//! Hard-fork-aware protocol rules and schedule for the mainnet rule family.
//!
//! Every block is governed by an immutable [`ProtocolSpec`]: the gas schedule, EVM
//! variant, validators, processors, fee market, difficulty rule and receipt form in
//! force at that height. Forks are deltas: each fork definition starts from its
//! predecessor and overrides only what changed, all the way from Frontier to the
//! experimental rule sets. The [`ProtocolSchedule`] folds the deltas once at
//! startup and answers "which rules govern this block" by block number, timestamp
//! or total difficulty.
//!
//! Execution itself (the EVM interpreter, precompiles, block import orchestration)
//! lives with external collaborators; this crate defines the interfaces it
//! consumes from them and the values that parameterize them.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod config;
pub mod constants;
pub mod dao;
pub mod error;
pub mod fee_market;
pub mod forks;
pub mod gas_limit;
pub mod header_validation;
pub mod primitives;
pub mod processor;
pub mod processors;
pub mod receipts;
pub mod rules;
pub mod schedule;
pub mod spec;
pub mod transaction;
pub mod withdrawals;

pub use config::{EvmConfiguration, PowAlgorithm, SpecConfig};
pub use error::{ScheduleError, SpecBuildError, StateRewriteError};
pub use schedule::{ProtocolSchedule, ScheduleKey};
pub use spec::{ProtocolSpec, ProtocolSpecBuilder};
