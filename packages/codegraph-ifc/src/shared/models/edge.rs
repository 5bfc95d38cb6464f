//! Dependence graph edges
//!
//! The edge kind decides two things: how the slicer treats the edge when it
//! matches calls with returns, and whether a checking criterion may traverse
//! it at all (see [`EdgeKindSet`]).

use super::ids::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dependence graph edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Statement executes only depending on the outcome of the source
    ControlDependence,
    /// Successor in the control-flow graph (never a dependence)
    ControlFlow,
    /// Def-use of a local variable
    DataDependence,
    /// Def-use through a heap location
    HeapDataDependence,
    /// Call site → callee entry
    Call,
    /// Actual-in → formal-in
    ParameterIn,
    /// Formal-out → actual-out
    ParameterOut,
    /// Actual-in → actual-out shortcut through a callee
    Summary,
    /// Heap data dependence that only holds across threads
    ThreadInterference,
    /// Thread spawn → thread entry
    Fork,
    /// Thread exit → join point
    Join,
    /// Ordering or mutual exclusion between synchronization points
    SynchronizationDependence,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 12] = [
        EdgeKind::ControlDependence,
        EdgeKind::ControlFlow,
        EdgeKind::DataDependence,
        EdgeKind::HeapDataDependence,
        EdgeKind::Call,
        EdgeKind::ParameterIn,
        EdgeKind::ParameterOut,
        EdgeKind::Summary,
        EdgeKind::ThreadInterference,
        EdgeKind::Fork,
        EdgeKind::Join,
        EdgeKind::SynchronizationDependence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::ControlDependence => "CD",
            EdgeKind::ControlFlow => "CF",
            EdgeKind::DataDependence => "DD",
            EdgeKind::HeapDataDependence => "DH",
            EdgeKind::Call => "CL",
            EdgeKind::ParameterIn => "PI",
            EdgeKind::ParameterOut => "PO",
            EdgeKind::Summary => "SU",
            EdgeKind::ThreadInterference => "ID",
            EdgeKind::Fork => "FORK",
            EdgeKind::Join => "JOIN",
            EdgeKind::SynchronizationDependence => "SD",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of edge kinds, stored as a bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeKindSet(u16);

impl EdgeKindSet {
    pub const fn empty() -> Self {
        EdgeKindSet(0)
    }

    pub fn all() -> Self {
        EdgeKind::ALL.iter().copied().collect()
    }

    pub fn of(kinds: &[EdgeKind]) -> Self {
        kinds.iter().copied().collect()
    }

    /// Edges that carry information between program points in a single
    /// thread: control/data/heap dependence, call and parameter passing,
    /// summaries, fork and join.
    pub fn dependence() -> Self {
        Self::of(&[
            EdgeKind::ControlDependence,
            EdgeKind::DataDependence,
            EdgeKind::HeapDataDependence,
            EdgeKind::Call,
            EdgeKind::ParameterIn,
            EdgeKind::ParameterOut,
            EdgeKind::Summary,
            EdgeKind::Fork,
            EdgeKind::Join,
        ])
    }

    /// Edges traversed by the sequential non-interference check.
    pub fn sequential() -> Self {
        Self::dependence()
    }

    /// Edges traversed by the concurrency-aware checks.
    pub fn concurrent() -> Self {
        Self::dependence().with(EdgeKind::ThreadInterference)
    }

    /// Edges along which a thread's execution extends.
    pub fn control_flow_bearing() -> Self {
        Self::of(&[
            EdgeKind::ControlFlow,
            EdgeKind::ControlDependence,
            EdgeKind::Call,
        ])
    }

    pub fn with(mut self, kind: EdgeKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn without(mut self, kind: EdgeKind) -> Self {
        self.remove(kind);
        self
    }

    pub fn insert(&mut self, kind: EdgeKind) {
        self.0 |= kind.bit();
    }

    pub fn remove(&mut self, kind: EdgeKind) {
        self.0 &= !kind.bit();
    }

    pub fn contains(&self, kind: EdgeKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = EdgeKind> {
        EdgeKind::ALL
            .into_iter()
            .filter(move |k| self.contains(*k))
    }
}

impl FromIterator<EdgeKind> for EdgeKindSet {
    fn from_iter<I: IntoIterator<Item = EdgeKind>>(iter: I) -> Self {
        let mut set = EdgeKindSet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl fmt::Debug for EdgeKindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Directed, kinded edge. The graph is a multigraph: several kinds may
/// connect the same ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Edge {
            source,
            target,
            kind,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.kind, self.target)
    }
}
