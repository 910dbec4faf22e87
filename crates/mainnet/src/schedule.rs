//! The protocol schedule: one immutable spec per activated fork, selectable by
//! block height, timestamp or total difficulty.

use crate::{
    config::SpecConfig, error::ScheduleError, forks, primitives::BlockHeader, spec::ProtocolSpec,
};
use alloy_primitives::U256;
use ethspec_hardforks::{ChainHardforks, ForkCondition, Hardfork, Head};
use std::{str::FromStr, sync::Arc};
use tracing::{debug, trace};

/// The activation key of a scheduled spec.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScheduleKey {
    /// Activated at a block number.
    Block(u64),
    /// Activated at a timestamp.
    Timestamp(u64),
    /// Activated when the cumulative difficulty reaches the value.
    TotalDifficulty(U256),
}

/// An assembled, immutable fork schedule.
///
/// Built once at startup; lookups are read-only and safe under any amount of
/// concurrency. Entries are held sorted by activation key, so a lookup returns the
/// entry with the greatest key at or below the queried value.
///
/// The Paris transition follows its own key: pre-merge blocks select by number,
/// the first block whose cumulative difficulty reaches the terminal total
/// difficulty selects the merge spec, and all later selection is by timestamp. The
/// transition is monotone; a schedule never falls back to proof of work.
#[derive(Debug, Clone)]
pub struct ProtocolSchedule {
    /// Pre-merge entries, sorted by activation block.
    by_block: Vec<(u64, Arc<ProtocolSpec>)>,
    /// The merge entry, when the chain schedules one.
    merge: Option<(U256, Arc<ProtocolSpec>)>,
    /// Post-merge entries, sorted by activation timestamp.
    by_timestamp: Vec<(u64, Arc<ProtocolSpec>)>,
    /// The chain id the schedule was assembled for.
    chain_id: Option<u64>,
}

impl ProtocolSchedule {
    /// Assembles the schedule for the given fork list and options.
    ///
    /// Every activated fork is folded through the delta chain into one immutable
    /// spec. Construction is single-threaded and happens once during startup.
    pub fn new(hardforks: &ChainHardforks, config: &SpecConfig) -> Result<Self, ScheduleError> {
        config.validate(hardforks)?;

        let mut by_block = Vec::new();
        let mut merge = None;
        let mut by_timestamp = Vec::new();

        for (fork, condition) in hardforks.forks_iter() {
            if condition == ForkCondition::Never {
                continue
            }
            let spec = Arc::new(forks::definition(fork, config)?.build()?);
            trace!(target: "mainnet::schedule", fork = %fork, ?condition, "assembled protocol spec");
            match condition {
                ForkCondition::Block(number) => by_block.push((number, spec)),
                ForkCondition::Timestamp(timestamp) => by_timestamp.push((timestamp, spec)),
                ForkCondition::TTD { total_difficulty, .. } => {
                    merge = Some((total_difficulty, spec))
                }
                ForkCondition::Never => unreachable!(),
            }
        }

        // Stable sorts: forks sharing an activation key keep declaration order, and
        // the last declared wins the lookup.
        by_block.sort_by_key(|(number, _)| *number);
        by_timestamp.sort_by_key(|(timestamp, _)| *timestamp);

        debug!(
            target: "mainnet::schedule",
            block_forks = by_block.len(),
            merge_fork = merge.is_some(),
            timestamp_forks = by_timestamp.len(),
            "assembled protocol schedule"
        );

        Ok(Self { by_block, merge, by_timestamp, chain_id: config.chain_id })
    }

    /// Assembles a schedule from `(fork name, activation)` pairs.
    ///
    /// Unresolvable names fail with [`ScheduleError::UnknownFork`].
    pub fn from_fork_names<'a>(
        forks: impl IntoIterator<Item = (&'a str, ForkCondition)>,
        config: &SpecConfig,
    ) -> Result<Self, ScheduleError> {
        let hardforks = forks
            .into_iter()
            .map(|(name, condition)| {
                Hardfork::from_str(name)
                    .map(|fork| (fork, condition))
                    .map_err(|_| ScheduleError::UnknownFork { name: name.to_string() })
            })
            .collect::<Result<ChainHardforks, _>>()?;
        Self::new(&hardforks, config)
    }

    /// The schedule of the Ethereum mainnet.
    pub fn mainnet() -> Result<Self, ScheduleError> {
        Self::new(&ChainHardforks::mainnet(), &SpecConfig::mainnet())
    }

    /// The chain id the schedule was assembled for.
    pub const fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// The number of scheduled specs.
    pub fn len(&self) -> usize {
        self.by_block.len() + usize::from(self.merge.is_some()) + self.by_timestamp.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the scheduled specs with their activation keys, in activation order.
    pub fn entries(&self) -> impl Iterator<Item = (ScheduleKey, &ProtocolSpec)> + '_ {
        self.by_block
            .iter()
            .map(|(number, spec)| (ScheduleKey::Block(*number), &**spec))
            .chain(
                self.merge
                    .iter()
                    .map(|(ttd, spec)| (ScheduleKey::TotalDifficulty(*ttd), &**spec)),
            )
            .chain(
                self.by_timestamp
                    .iter()
                    .map(|(timestamp, spec)| (ScheduleKey::Timestamp(*timestamp), &**spec)),
            )
    }

    /// Returns the spec governing the given head.
    pub fn by_head(&self, head: &Head) -> Result<Arc<ProtocolSpec>, ScheduleError> {
        if let Some((terminal_total_difficulty, merge_spec)) = &self.merge {
            if head.total_difficulty >= *terminal_total_difficulty {
                // Post-merge: timestamp forks supersede the merge spec.
                if let Some(spec) = lookup(&self.by_timestamp, head.timestamp) {
                    return Ok(spec.clone())
                }
                return Ok(merge_spec.clone())
            }
        } else if let Some(spec) = lookup(&self.by_timestamp, head.timestamp) {
            // Chains without a scheduled merge select timestamp forks directly.
            return Ok(spec.clone())
        }

        lookup(&self.by_block, head.number).cloned().ok_or(ScheduleError::NoSpecAtHeight {
            number: head.number,
            timestamp: head.timestamp,
        })
    }

    /// Returns the spec governing the given block header.
    ///
    /// The total difficulty is the cumulative chain difficulty including the
    /// header's own; it drives the Paris transition.
    pub fn by_block_header(
        &self,
        header: &BlockHeader,
        total_difficulty: U256,
    ) -> Result<Arc<ProtocolSpec>, ScheduleError> {
        self.by_head(&Head {
            number: header.number,
            difficulty: header.difficulty,
            total_difficulty,
            timestamp: header.timestamp,
            ..Default::default()
        })
    }
}

/// The entry with the greatest key at or below `key`.
fn lookup(entries: &[(u64, Arc<ProtocolSpec>)], key: u64) -> Option<&Arc<ProtocolSpec>> {
    entries.iter().rev().find(|(at, _)| *at <= key).map(|(_, spec)| spec)
}
