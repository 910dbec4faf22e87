use alloy_primitives::{BlockNumber, B256, U256};

/// Describes the current head block.
///
/// The head block is the highest fully synced block.
///
/// Note: This is a slimmed down version of a block header, primarily for use as the
/// lookup key when selecting the protocol rules that govern a block.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Head {
    /// The number of the head block.
    pub number: BlockNumber,
    /// The hash of the head block.
    pub hash: B256,
    /// The difficulty of the head block.
    pub difficulty: U256,
    /// The total difficulty at the head block.
    pub total_difficulty: U256,
    /// The timestamp of the head block.
    pub timestamp: u64,
}

impl Head {
    /// Creates a new [`Head`] instance.
    pub const fn new(
        number: BlockNumber,
        hash: B256,
        difficulty: U256,
        total_difficulty: U256,
        timestamp: u64,
    ) -> Self {
        Self { number, hash, difficulty, total_difficulty, timestamp }
    }
}
