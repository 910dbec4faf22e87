use core::{
    fmt,
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Represents the consensus type of a blockchain fork.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConsensusType {
    /// Indicates a proof-of-work consensus mechanism.
    ProofOfWork,
    /// Indicates a proof-of-stake consensus mechanism.
    ProofOfStake,
}

/// The kind of activation key a fork is gated on.
///
/// Pre-merge forks activate by block number, the merge itself activates by total
/// difficulty, and every fork from Shanghai on activates by timestamp. The kind is
/// declared per fork rather than inferred from the genesis schema.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ActivationKind {
    /// Activated once the block number reaches the key.
    Block,
    /// Activated once the block timestamp reaches the key.
    Timestamp,
    /// Activated once the cumulative chain difficulty reaches the key.
    TotalDifficulty,
}

/// The name of a fork in the mainnet delta chain.
///
/// Forks are declared in a total order; the rules of each fork are a delta over the
/// rules of [`Hardfork::base`], its immediate predecessor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Hardfork {
    /// Frontier: <https://blog.ethereum.org/2015/03/03/ethereum-launch-process>.
    Frontier,
    /// Homestead: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/homestead.md>.
    Homestead,
    /// First block of the DAO recovery window: the irregular balance rewrite runs and
    /// the `dao-hard-fork` extra-data marker is required.
    DaoRecoveryInit,
    /// End of the DAO recovery window; normal block processing resumes.
    DaoRecoveryTransition,
    /// Tangerine Whistle: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/tangerine-whistle.md>.
    TangerineWhistle,
    /// Spurious Dragon: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/spurious-dragon.md>.
    SpuriousDragon,
    /// Byzantium: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/byzantium.md>.
    Byzantium,
    /// Constantinople: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/constantinople.md>.
    Constantinople,
    /// Petersburg: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/petersburg.md>.
    Petersburg,
    /// Istanbul: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/istanbul.md>.
    Istanbul,
    /// Muir Glacier: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/muir-glacier.md>.
    MuirGlacier,
    /// Berlin: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/berlin.md>.
    Berlin,
    /// London: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/london.md>.
    London,
    /// Arrow Glacier: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/arrow-glacier.md>.
    ArrowGlacier,
    /// Gray Glacier: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/gray-glacier.md>.
    GrayGlacier,
    /// Paris: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/paris.md>.
    Paris,
    /// Shanghai: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/shanghai.md>.
    Shanghai,
    /// Cancun: <https://github.com/ethereum/execution-specs/blob/master/network-upgrades/mainnet-upgrades/cancun.md>.
    Cancun,
    /// Accepted-but-unscheduled EIPs; content tracks ratification and is unstable.
    FutureEips,
    /// Proposed EIPs under evaluation; content is unstable.
    ExperimentalEips,
}

impl Hardfork {
    /// The fork this fork's rules are a delta over, `None` for [`Self::Frontier`].
    pub const fn base(&self) -> Option<Self> {
        Some(match self {
            Self::Frontier => return None,
            Self::Homestead => Self::Frontier,
            Self::DaoRecoveryInit => Self::Homestead,
            Self::DaoRecoveryTransition => Self::DaoRecoveryInit,
            // Tangerine Whistle deltas over Homestead: the DAO recovery forks only
            // toggle the one-shot processor and leave no trace in later rules.
            Self::TangerineWhistle => Self::Homestead,
            Self::SpuriousDragon => Self::TangerineWhistle,
            Self::Byzantium => Self::SpuriousDragon,
            Self::Constantinople => Self::Byzantium,
            Self::Petersburg => Self::Constantinople,
            Self::Istanbul => Self::Petersburg,
            Self::MuirGlacier => Self::Istanbul,
            Self::Berlin => Self::MuirGlacier,
            Self::London => Self::Berlin,
            Self::ArrowGlacier => Self::London,
            Self::GrayGlacier => Self::ArrowGlacier,
            Self::Paris => Self::GrayGlacier,
            Self::Shanghai => Self::Paris,
            Self::Cancun => Self::Shanghai,
            Self::FutureEips => Self::Cancun,
            Self::ExperimentalEips => Self::FutureEips,
        })
    }

    /// Returns the stable name of the fork, e.g. `SpuriousDragon`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Frontier => "Frontier",
            Self::Homestead => "Homestead",
            Self::DaoRecoveryInit => "DaoRecoveryInit",
            Self::DaoRecoveryTransition => "DaoRecoveryTransition",
            Self::TangerineWhistle => "TangerineWhistle",
            Self::SpuriousDragon => "SpuriousDragon",
            Self::Byzantium => "Byzantium",
            Self::Constantinople => "Constantinople",
            Self::Petersburg => "Petersburg",
            Self::Istanbul => "Istanbul",
            Self::MuirGlacier => "MuirGlacier",
            Self::Berlin => "Berlin",
            Self::London => "London",
            Self::ArrowGlacier => "ArrowGlacier",
            Self::GrayGlacier => "GrayGlacier",
            Self::Paris => "Paris",
            Self::Shanghai => "Shanghai",
            Self::Cancun => "Cancun",
            Self::FutureEips => "FutureEips",
            Self::ExperimentalEips => "ExperimentalEips",
        }
    }

    /// Retrieves the consensus type for the specified hardfork.
    pub fn consensus_type(&self) -> ConsensusType {
        if *self >= Self::Paris {
            ConsensusType::ProofOfStake
        } else {
            ConsensusType::ProofOfWork
        }
    }

    /// Checks if the hardfork uses Proof of Stake consensus.
    pub fn is_proof_of_stake(&self) -> bool {
        matches!(self.consensus_type(), ConsensusType::ProofOfStake)
    }

    /// Checks if the hardfork uses Proof of Work consensus.
    pub fn is_proof_of_work(&self) -> bool {
        matches!(self.consensus_type(), ConsensusType::ProofOfWork)
    }

    /// The kind of activation key this fork is gated on.
    pub const fn activation_kind(&self) -> ActivationKind {
        match self {
            Self::Paris => ActivationKind::TotalDifficulty,
            Self::Shanghai | Self::Cancun | Self::FutureEips | Self::ExperimentalEips => {
                ActivationKind::Timestamp
            }
            _ => ActivationKind::Block,
        }
    }

    /// Retrieves the activation block for the specified hardfork on the Ethereum mainnet.
    pub const fn mainnet_activation_block(&self) -> Option<u64> {
        match self {
            Self::Frontier => Some(0),
            Self::Homestead => Some(1_150_000),
            Self::DaoRecoveryInit => Some(1_920_000),
            Self::DaoRecoveryTransition => Some(1_920_010),
            Self::TangerineWhistle => Some(2_463_000),
            Self::SpuriousDragon => Some(2_675_000),
            Self::Byzantium => Some(4_370_000),
            Self::Constantinople | Self::Petersburg => Some(7_280_000),
            Self::Istanbul => Some(9_069_000),
            Self::MuirGlacier => Some(9_200_000),
            Self::Berlin => Some(12_244_000),
            Self::London => Some(12_965_000),
            Self::ArrowGlacier => Some(13_773_000),
            Self::GrayGlacier => Some(15_050_000),
            Self::Paris => Some(15_537_394),
            Self::Shanghai => Some(17_034_870),
            Self::Cancun => Some(19_426_587),
            _ => None,
        }
    }

    /// Retrieves the activation timestamp for the specified hardfork on the Ethereum mainnet.
    pub const fn mainnet_activation_timestamp(&self) -> Option<u64> {
        match self {
            Self::Paris => Some(1_663_224_162),
            Self::Shanghai => Some(1_681_338_455),
            Self::Cancun => Some(1_710_338_135),
            _ => None,
        }
    }
}

/// Error returned by [`Hardfork::from_str`] for a name outside the delta chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHardfork(pub String);

impl Display for UnknownHardfork {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hardfork: {}", self.0)
    }
}

impl std::error::Error for UnknownHardfork {}

impl FromStr for Hardfork {
    type Err = UnknownHardfork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "frontier" => Self::Frontier,
            "homestead" => Self::Homestead,
            "daorecoveryinit" => Self::DaoRecoveryInit,
            "daorecoverytransition" => Self::DaoRecoveryTransition,
            "tangerinewhistle" => Self::TangerineWhistle,
            "spuriousdragon" => Self::SpuriousDragon,
            "byzantium" => Self::Byzantium,
            "constantinople" => Self::Constantinople,
            "petersburg" => Self::Petersburg,
            "istanbul" => Self::Istanbul,
            "muirglacier" => Self::MuirGlacier,
            "berlin" => Self::Berlin,
            "london" => Self::London,
            "arrowglacier" => Self::ArrowGlacier,
            "grayglacier" => Self::GrayGlacier,
            "paris" => Self::Paris,
            "shanghai" => Self::Shanghai,
            "cancun" => Self::Cancun,
            "futureeips" => Self::FutureEips,
            "experimentaleips" => Self::ExperimentalEips,
            _ => return Err(UnknownHardfork(s.to_string())),
        })
    }
}

impl Display for Hardfork {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_hardfork_from_str() {
        let hardfork_str = [
            "frOntier",
            "homEstead",
            "daoRecoveryInit",
            "daoRecoveryTransition",
            "tAngerInewhistle",
            "spurIousdrAgon",
            "byzAntium",
            "constantinople",
            "petersburg",
            "istanbul",
            "muirglacier",
            "bErlin",
            "lonDon",
            "arrowglacier",
            "grayglacier",
            "PARIS",
            "ShAnGhAI",
            "CaNcUn",
            "FutureEips",
            "experimentaleips",
        ];
        let expected_hardforks = [
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

        let hardforks: Vec<Hardfork> =
            hardfork_str.iter().map(|h| Hardfork::from_str(h).unwrap()).collect();

        assert_eq!(hardforks, expected_hardforks);
    }

    #[test]
    fn check_nonexistent_hardfork_from_str() {
        assert!(Hardfork::from_str("not a hardfork").is_err());
    }

    #[test]
    fn base_chain_reaches_frontier() {
        // Every fork folds down to Frontier in finitely many steps.
        for mut fork in [Hardfork::ExperimentalEips, Hardfork::DaoRecoveryTransition, Hardfork::Cancun] {
            let mut steps = 0;
            while let Some(base) = fork.base() {
                assert!(base < fork, "delta chain must be strictly decreasing");
                fork = base;
                steps += 1;
                assert!(steps <= 32);
            }
            assert_eq!(fork, Hardfork::Frontier);
        }
    }

    #[test]
    fn check_consensus_type() {
        let pow_hardforks = [
            Hardfork::Frontier,
            Hardfork::Homestead,
            Hardfork::DaoRecoveryInit,
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
        ];

        let pos_hardforks = [Hardfork::Paris, Hardfork::Shanghai, Hardfork::Cancun];

        for hardfork in &pow_hardforks {
            assert_eq!(hardfork.consensus_type(), ConsensusType::ProofOfWork);
            assert!(!hardfork.is_proof_of_stake());
            assert!(hardfork.is_proof_of_work());
        }

        for hardfork in &pos_hardforks {
            assert_eq!(hardfork.consensus_type(), ConsensusType::ProofOfStake);
            assert!(hardfork.is_proof_of_stake());
            assert!(!hardfork.is_proof_of_work());
        }
    }

    #[test]
    fn activation_kinds() {
        assert_eq!(Hardfork::Frontier.activation_kind(), ActivationKind::Block);
        assert_eq!(Hardfork::GrayGlacier.activation_kind(), ActivationKind::Block);
        assert_eq!(Hardfork::Paris.activation_kind(), ActivationKind::TotalDifficulty);
        assert_eq!(Hardfork::Shanghai.activation_kind(), ActivationKind::Timestamp);
        assert_eq!(Hardfork::ExperimentalEips.activation_kind(), ActivationKind::Timestamp);
    }
}
