//! Errors raised while assembling the protocol schedule.
//!
//! All of these surface at construction time (or at the single DAO block); none are
//! retried, they indicate misconfiguration or missing assets.

/// Error emitted by [`ProtocolSpecBuilder::build`](crate::ProtocolSpecBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecBuildError {
    /// A required field of the protocol spec has no binding.
    #[error("protocol spec field `{field}` has no binding")]
    IncompleteSpec {
        /// Name of the unbound field.
        field: &'static str,
    },
    /// The supplied configuration is contradictory or out of range.
    #[error("invalid protocol configuration: {reason}")]
    InvalidConfig {
        /// Human readable description of the conflict.
        reason: String,
    },
}

/// Error emitted while assembling or querying a [`ProtocolSchedule`](crate::ProtocolSchedule).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Building the spec of one of the scheduled forks failed.
    #[error(transparent)]
    Build(#[from] SpecBuildError),
    /// The fork schedule references a fork that is not part of the delta chain.
    #[error("fork `{name}` is not part of the known delta chain")]
    UnknownFork {
        /// The unresolved fork name.
        name: String,
    },
    /// No scheduled spec is active at the queried height.
    ///
    /// Only possible on a mis-configured schedule with no genesis-active fork.
    #[error("no protocol spec active at block {number} (timestamp {timestamp})")]
    NoSpecAtHeight {
        /// The queried block number.
        number: u64,
        /// The queried block timestamp.
        timestamp: u64,
    },
}

/// The bundled DAO account list could not be loaded; fatal to processing the DAO
/// fork block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("DAO account list unavailable: {reason}")]
pub struct StateRewriteError {
    /// Parse or decode failure description.
    pub reason: String,
}
