//! Fork names, ordering and activation conditions for the mainnet rule family.
//!
//! Every consensus rule bundle is selected by a [`Hardfork`] together with the
//! [`ForkCondition`] that activates it. A chain declares its upgrade history as a
//! [`ChainHardforks`] list; lookups against that list answer "which fork governs
//! this block" for block-number, timestamp and total-difficulty activated forks
//! alike.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod forkcondition;
pub use forkcondition::ForkCondition;

mod hardfork;
pub use hardfork::{ActivationKind, ConsensusType, Hardfork, UnknownHardfork};

mod hardforks;
pub use hardforks::{ChainHardforks, MAINNET_HARDFORKS, MAINNET_TERMINAL_TOTAL_DIFFICULTY};

mod head;
pub use head::Head;

mod display;
pub use display::DisplayHardforks;
