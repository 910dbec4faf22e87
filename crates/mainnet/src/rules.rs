//! The catalog of named, swappable rule families.
//!
//! Each family whose implementation lives outside this crate (the EVM interpreter,
//! precompiles, gas metering, difficulty functions) is identified here by a pure
//! name. The external collaborators resolve the names to concrete implementations;
//! the names themselves are plain values, so a bound rule bundle stays immutable
//! and freely shareable.

use crate::config::{EvmConfiguration, PowAlgorithm};
use alloy_primitives::{Address, U256};

/// The gas schedule in force, named after the fork that introduced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum GasSchedule {
    /// The launch schedule.
    Frontier,
    /// Homestead call/create repricing.
    Homestead,
    /// [EIP-150](https://eips.ethereum.org/EIPS/eip-150) IO-heavy opcode repricing.
    TangerineWhistle,
    /// [EIP-160](https://eips.ethereum.org/EIPS/eip-160) EXP repricing.
    SpuriousDragon,
    /// Byzantium additions (REVERT, STATICCALL, RETURNDATACOPY).
    Byzantium,
    /// [EIP-1283](https://eips.ethereum.org/EIPS/eip-1283) net SSTORE metering.
    Constantinople,
    /// EIP-1283 rolled back.
    Petersburg,
    /// [EIP-2200](https://eips.ethereum.org/EIPS/eip-2200) SSTORE metering and
    /// [EIP-1884](https://eips.ethereum.org/EIPS/eip-1884) trie-dependent repricing.
    Istanbul,
    /// [EIP-2929](https://eips.ethereum.org/EIPS/eip-2929) warm/cold access accounting.
    Berlin,
    /// [EIP-3529](https://eips.ethereum.org/EIPS/eip-3529) refund reduction.
    London,
    /// [EIP-3860](https://eips.ethereum.org/EIPS/eip-3860) init-code metering.
    Shanghai,
    /// [EIP-4844](https://eips.ethereum.org/EIPS/eip-4844) blob-gas accounting.
    Cancun,
}

/// The EVM opcode set in force, named after the fork that introduced it.
///
/// Forks that changed no opcodes (e.g. Petersburg, the glacier bomb delays) share
/// the variant of their predecessor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum EvmVariant {
    /// The launch opcode set.
    Frontier,
    /// + DELEGATECALL.
    Homestead,
    /// + REVERT, RETURNDATACOPY, STATICCALL.
    Byzantium,
    /// + CREATE2, EXTCODEHASH, SHL/SHR/SAR.
    Constantinople,
    /// + CHAINID, SELFBALANCE.
    Istanbul,
    /// + BASEFEE, 0xEF code prefix rejected.
    London,
    /// DIFFICULTY becomes PREVRANDAO.
    Paris,
    /// + PUSH0.
    Shanghai,
    /// + TSTORE/TLOAD, MCOPY, BLOBHASH, BLOBBASEFEE.
    Cancun,
    /// Accepted-but-unscheduled EIPs; unstable.
    FutureEips,
    /// Proposed EIPs under evaluation; unstable.
    ExperimentalEips,
}

/// A fully parameterized request for an external EVM interpreter.
///
/// The chain id is only bound from Istanbul on, when the CHAINID opcode made it
/// observable inside the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmSpec {
    /// The opcode set to instantiate.
    pub variant: EvmVariant,
    /// The chain id exposed by CHAINID, when bound.
    pub chain_id: Option<u64>,
    /// Interpreter tuning knobs.
    pub configuration: EvmConfiguration,
}

impl EvmSpec {
    /// An interpreter request without a bound chain id.
    pub fn new(variant: EvmVariant, configuration: EvmConfiguration) -> Self {
        Self { variant, chain_id: None, configuration }
    }

    /// An interpreter request with the chain id bound.
    pub fn with_chain_id(
        variant: EvmVariant,
        chain_id: Option<u64>,
        configuration: EvmConfiguration,
    ) -> Self {
        Self { variant, chain_id, configuration }
    }
}

/// The precompiled contract registry in force, named after the fork that extended it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum PrecompileSet {
    /// ecrecover, sha256, ripemd160, identity.
    Frontier,
    /// + bn256Add, bn256ScalarMul, bn256Pairing, modexp.
    Byzantium,
    /// + blake2f.
    Istanbul,
    /// + KZG point evaluation.
    Cancun,
}

/// The difficulty function in force, named after the fork that (re)defined it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DifficultyCalculator {
    /// The launch adjustment rule.
    Frontier,
    /// Homestead adjustment rule.
    Homestead,
    /// [EIP-100](https://eips.ethereum.org/EIPS/eip-100) uncle-aware target plus the
    /// first bomb delay.
    Byzantium,
    /// Bomb delayed further.
    Constantinople,
    /// Bomb delayed further.
    MuirGlacier,
    /// Bomb delayed further.
    London,
    /// Bomb delayed further.
    ArrowGlacier,
    /// Bomb delayed further.
    GrayGlacier,
    /// Difficulty is constant zero under proof of stake.
    ProofOfStake,
}

impl DifficultyCalculator {
    /// The difficulty-bomb delay applied by this rule, if the rule carries one.
    pub const fn bomb_delay(&self) -> Option<u64> {
        match self {
            Self::Frontier | Self::Homestead | Self::ProofOfStake => None,
            Self::Byzantium => Some(3_000_000),
            Self::Constantinople => Some(5_000_000),
            Self::MuirGlacier => Some(9_000_000),
            Self::London => Some(9_700_000),
            Self::ArrowGlacier => Some(10_700_000),
            Self::GrayGlacier => Some(11_400_000),
        }
    }

    /// The constant difficulty produced by this rule, if it is constant.
    pub const fn fixed_difficulty(&self) -> Option<U256> {
        match self {
            Self::ProofOfStake => Some(U256::ZERO),
            _ => None,
        }
    }
}

/// The hash implementation validating proof-of-work seals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PowHasher {
    /// Light-verification ethash.
    EthashLight,
    /// Keccak-256 sealing.
    Keccak256,
    /// No seal verification available; seals never validate.
    Unsupported,
}

impl From<PowAlgorithm> for PowHasher {
    fn from(algorithm: PowAlgorithm) -> Self {
        match algorithm {
            PowAlgorithm::Ethash => Self::EthashLight,
            PowAlgorithm::Keccak256 => Self::Keccak256,
            PowAlgorithm::Unsupported => Self::Unsupported,
        }
    }
}

/// The header hashing and sealing helpers of the chain.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlockHeaderFunctions {
    /// Keccak-256 over the RLP encoded header.
    #[default]
    Mainnet,
}

/// The block importer wiring requested by the rule bundle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlockImporterKind {
    /// Persist and extend the canonical chain after full validation.
    #[default]
    Mainnet,
}

/// The block validator variant coordinating header, body and processing checks.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlockValidatorKind {
    /// The mainnet coordinator.
    #[default]
    Mainnet,
    /// GoQuorum-compatible coordinator; the additional private-state checks are
    /// implemented by the external private-transaction subsystem.
    Quorum,
}

/// How the beneficiary of block rewards and fees is determined.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MiningBeneficiaryCalculator {
    /// Rewards go to the header's coinbase address.
    #[default]
    Coinbase,
}

impl MiningBeneficiaryCalculator {
    /// Resolves the beneficiary for a header.
    pub fn beneficiary(&self, header: &crate::primitives::BlockHeader) -> Address {
        match self {
            Self::Coinbase => header.beneficiary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bomb_delays_are_monotone() {
        let delays = [
            DifficultyCalculator::Byzantium,
            DifficultyCalculator::Constantinople,
            DifficultyCalculator::MuirGlacier,
            DifficultyCalculator::London,
            DifficultyCalculator::ArrowGlacier,
            DifficultyCalculator::GrayGlacier,
        ];
        let mut last = 0;
        for rule in delays {
            let delay = rule.bomb_delay().unwrap();
            assert!(delay > last);
            last = delay;
        }
    }

    #[test]
    fn proof_of_stake_difficulty_is_zero() {
        assert_eq!(DifficultyCalculator::ProofOfStake.fixed_difficulty(), Some(U256::ZERO));
        assert_eq!(DifficultyCalculator::GrayGlacier.fixed_difficulty(), None);
    }
}
