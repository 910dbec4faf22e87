use crate::{DisplayHardforks, ForkCondition, Hardfork, Head};
use alloy_primitives::{uint, U256};
use once_cell::sync::Lazy;

/// Mainnet terminal total difficulty: the cumulative proof-of-work difficulty at
/// which the chain transitioned to proof of stake.
pub const MAINNET_TERMINAL_TOTAL_DIFFICULTY: U256 = uint!(58_750_000_000_000_000_000_000_U256);

/// Ethereum mainnet hardforks.
pub static MAINNET_HARDFORKS: Lazy<ChainHardforks> = Lazy::new(ChainHardforks::mainnet);

/// An ordered list of hardforks with their activation conditions.
///
/// The list is kept in delta-chain order: a fork later in the list never activates
/// before a fork earlier in the list. Lookups are linear; the list is tiny and is
/// built once at startup.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ChainHardforks(Vec<(Hardfork, ForkCondition)>);

impl ChainHardforks {
    /// Creates a new list from the given forks.
    pub fn new(forks: Vec<(Hardfork, ForkCondition)>) -> Self {
        Self(forks)
    }

    /// Retrieves the [`ForkCondition`] for `fork`, [`ForkCondition::Never`] if absent.
    pub fn fork(&self, fork: Hardfork) -> ForkCondition {
        self.get(fork).unwrap_or(ForkCondition::Never)
    }

    /// Retrieves the [`ForkCondition`] for `fork` if it is present.
    pub fn get(&self, fork: Hardfork) -> Option<ForkCondition> {
        self.0.iter().find(|(f, _)| *f == fork).map(|(_, condition)| *condition)
    }

    /// Inserts `fork` with the given condition, replacing any existing entry.
    pub fn insert(&mut self, fork: Hardfork, condition: ForkCondition) {
        match self.0.iter_mut().find(|(f, _)| *f == fork) {
            Some((_, existing)) => *existing = condition,
            None => self.0.push((fork, condition)),
        }
    }

    /// Removes `fork` from the list.
    pub fn remove(&mut self, fork: Hardfork) {
        self.0.retain(|(f, _)| *f != fork);
    }

    /// Get an iterator of all hardforks with their respective activation conditions.
    pub fn forks_iter(&self) -> impl Iterator<Item = (Hardfork, ForkCondition)> + '_ {
        self.0.iter().map(|(f, c)| (*f, *c))
    }

    /// Returns the number of declared forks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no fork is declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convenience method to check if a fork is active at a given block number.
    pub fn is_fork_active_at_block(&self, fork: Hardfork, block_number: u64) -> bool {
        self.fork(fork).active_at_block(block_number)
    }

    /// Convenience method to check if a fork is active at a given timestamp.
    pub fn is_fork_active_at_timestamp(&self, fork: Hardfork, timestamp: u64) -> bool {
        self.fork(fork).active_at_timestamp(timestamp)
    }

    /// Convenience method to check if a fork is active at the given head.
    pub fn is_fork_active_at_head(&self, fork: Hardfork, head: &Head) -> bool {
        self.fork(fork).active_at_head(head)
    }

    /// Convenience method to check if [`Hardfork::SpuriousDragon`] is active at a given
    /// block number.
    pub fn is_spurious_dragon_active_at_block(&self, block_number: u64) -> bool {
        self.is_fork_active_at_block(Hardfork::SpuriousDragon, block_number)
    }

    /// Convenience method to check if [`Hardfork::Byzantium`] is active at a given block
    /// number.
    pub fn is_byzantium_active_at_block(&self, block_number: u64) -> bool {
        self.is_fork_active_at_block(Hardfork::Byzantium, block_number)
    }

    /// Convenience method to check if [`Hardfork::Shanghai`] is active at a given
    /// timestamp.
    pub fn is_shanghai_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.is_fork_active_at_timestamp(Hardfork::Shanghai, timestamp)
    }

    /// Convenience method to check if [`Hardfork::Cancun`] is active at a given
    /// timestamp.
    pub fn is_cancun_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.is_fork_active_at_timestamp(Hardfork::Cancun, timestamp)
    }

    /// The Paris hardfork (merge) is activated by total difficulty. If the terminal
    /// block is known, this returns whether the given block is post-merge.
    pub fn is_paris_active_at_block(&self, block_number: u64) -> Option<bool> {
        match self.fork(Hardfork::Paris) {
            ForkCondition::TTD { fork_block, .. } => {
                fork_block.map(|paris_block| block_number >= paris_block)
            }
            ForkCondition::Block(paris_block) => Some(block_number >= paris_block),
            _ => None,
        }
    }

    /// A container for pretty-printing this fork list.
    pub fn display(&self) -> DisplayHardforks {
        DisplayHardforks::new(self)
    }

    /// Ethereum mainnet list of hardforks.
    pub fn mainnet() -> Self {
        Self(vec![
            (Hardfork::Frontier, ForkCondition::Block(0)),
            (Hardfork::Homestead, ForkCondition::Block(1_150_000)),
            (Hardfork::DaoRecoveryInit, ForkCondition::Block(1_920_000)),
            (Hardfork::DaoRecoveryTransition, ForkCondition::Block(1_920_010)),
            (Hardfork::TangerineWhistle, ForkCondition::Block(2_463_000)),
            (Hardfork::SpuriousDragon, ForkCondition::Block(2_675_000)),
            (Hardfork::Byzantium, ForkCondition::Block(4_370_000)),
            (Hardfork::Constantinople, ForkCondition::Block(7_280_000)),
            (Hardfork::Petersburg, ForkCondition::Block(7_280_000)),
            (Hardfork::Istanbul, ForkCondition::Block(9_069_000)),
            (Hardfork::MuirGlacier, ForkCondition::Block(9_200_000)),
            (Hardfork::Berlin, ForkCondition::Block(12_244_000)),
            (Hardfork::London, ForkCondition::Block(12_965_000)),
            (Hardfork::ArrowGlacier, ForkCondition::Block(13_773_000)),
            (Hardfork::GrayGlacier, ForkCondition::Block(15_050_000)),
            (
                Hardfork::Paris,
                ForkCondition::TTD {
                    fork_block: Some(15_537_394),
                    total_difficulty: MAINNET_TERMINAL_TOTAL_DIFFICULTY,
                },
            ),
            (Hardfork::Shanghai, ForkCondition::Timestamp(1_681_338_455)),
            (Hardfork::Cancun, ForkCondition::Timestamp(1_710_338_135)),
        ])
    }
}

impl core::fmt::Debug for ChainHardforks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainHardforks")
            .field("forks", &self.0.iter().map(|(f, c)| (f.name(), c)).collect::<Vec<_>>())
            .finish()
    }
}

impl FromIterator<(Hardfork, ForkCondition)> for ChainHardforks {
    fn from_iter<T: IntoIterator<Item = (Hardfork, ForkCondition)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
