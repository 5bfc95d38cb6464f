//! Violation models

use crate::features::criterion::domain::Criterion;
use crate::features::lattice::{Level, LevelComparison};
use crate::shared::models::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a (source, sink) pair was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Source level does not flow to the sink level
    IllegalFlow,
    /// The lattice does not order the two levels
    IncomparableLevels,
    /// Scheduling order of synchronization events alone may leak
    OrderConflict,
}

impl ViolationKind {
    /// Verdict for a failed lattice comparison; `None` when the flow is allowed
    pub fn from_comparison(comparison: LevelComparison) -> Option<Self> {
        match comparison {
            LevelComparison::Flows => None,
            LevelComparison::Violates => Some(ViolationKind::IllegalFlow),
            LevelComparison::Incomparable => Some(ViolationKind::IncomparableLevels),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::IllegalFlow => "illegal_flow",
            ViolationKind::IncomparableLevels => "incomparable_levels",
            ViolationKind::OrderConflict => "order_conflict",
        }
    }
}

/// Two accesses whose parallel execution witnesses a concurrent leak
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccessPair {
    pub first: NodeId,
    pub second: NodeId,
}

impl AccessPair {
    pub fn new(first: NodeId, second: NodeId) -> Self {
        AccessPair { first, second }
    }
}

/// One reported flow. Value object: a run yields a set of these, at most one
/// per (source, sink) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub source: NodeId,
    pub sink: NodeId,
    pub source_level: Level,
    pub sink_level: Level,
    pub criterion: Criterion,
    pub kind: ViolationKind,
    /// Access pair used for the MHP test (concurrency-only flows)
    pub witness: Option<AccessPair>,
    /// Dependence path from source to sink; empty unless witness paths are on
    pub path: Vec<NodeId>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) -> {} ({}) [{}]",
            self.kind.as_str(),
            self.source,
            self.source_level,
            self.sink,
            self.sink_level,
            self.criterion
        )?;
        if let Some(w) = &self.witness {
            write!(f, " via {} || {}", w.first, w.second)?;
        }
        Ok(())
    }
}
