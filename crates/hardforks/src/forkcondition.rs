use crate::Head;
use alloy_primitives::U256;

/// The condition at which a fork is activated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ForkCondition {
    /// The fork is activated after a certain block.
    Block(u64),
    /// The fork is activated after a total difficulty has been reached.
    TTD {
        /// The block number at which TTD is reached, if it is known.
        ///
        /// This is only set for chains whose merge has already happened, so the
        /// terminal block is observable.
        fork_block: Option<u64>,
        /// The total difficulty after which the fork is activated.
        total_difficulty: U256,
    },
    /// The fork is activated after a specific timestamp.
    Timestamp(u64),
    /// The fork is never activated.
    #[default]
    Never,
}

impl ForkCondition {
    /// Returns true if the fork condition is timestamp based.
    pub const fn is_timestamp(&self) -> bool {
        matches!(self, Self::Timestamp(_))
    }

    /// Checks whether the fork condition is satisfied at the given block.
    ///
    /// This will return true if the block number is equal or greater than the
    /// activation block of:
    /// - [`ForkCondition::Block`]
    /// - [`ForkCondition::TTD`] with a known fork block
    pub const fn active_at_block(&self, current_block: u64) -> bool {
        match self {
            Self::Block(block) | Self::TTD { fork_block: Some(block), .. } => {
                current_block >= *block
            }
            _ => false,
        }
    }

    /// Checks if the given block is the first block that satisfies the fork condition.
    pub const fn transitions_at_block(&self, current_block: u64) -> bool {
        match self {
            Self::Block(block) => current_block == *block,
            _ => false,
        }
    }

    /// Checks whether the fork condition is satisfied at the given total difficulty.
    ///
    /// The fork activates on the first block whose cumulative difficulty reaches the
    /// threshold; the transition is monotone and never reverts to proof of work.
    pub fn active_at_ttd(&self, ttd: U256) -> bool {
        matches!(self, Self::TTD { total_difficulty, .. } if ttd >= *total_difficulty)
    }

    /// Checks whether the fork condition is satisfied at the given timestamp.
    pub const fn active_at_timestamp(&self, timestamp: u64) -> bool {
        matches!(self, Self::Timestamp(time) if timestamp >= *time)
    }

    /// Checks whether the fork condition is satisfied at the given head block.
    ///
    /// This will return true if:
    ///
    /// - The condition is satisfied by the block number;
    /// - The condition is satisfied by the timestamp;
    /// - or the condition is satisfied by the total difficulty.
    pub fn active_at_head(&self, head: &Head) -> bool {
        self.active_at_block(head.number) ||
            self.active_at_timestamp(head.timestamp) ||
            self.active_at_ttd(head.total_difficulty)
    }

    /// Returns the activation block number if the condition is block based.
    pub const fn as_block_number(&self) -> Option<u64> {
        match self {
            Self::Block(block) => Some(*block),
            _ => None,
        }
    }

    /// Returns the activation timestamp if the condition is timestamp based.
    pub const fn as_timestamp(&self) -> Option<u64> {
        match self {
            Self::Timestamp(timestamp) => Some(*timestamp),
            _ => None,
        }
    }
}
