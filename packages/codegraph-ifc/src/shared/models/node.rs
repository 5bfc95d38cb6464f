//! Dependence graph nodes

use super::ids::{NodeId, ProcId, ThreadRegionId};
use serde::{Deserialize, Serialize};

/// Kind of program point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Ordinary statement
    Normal,
    /// Call site; owns the actual-in/actual-out nodes of the call
    CallSite,
    /// Procedure entry
    Entry,
    /// Procedure exit
    Exit,
    /// Argument passed at a call site
    ActualIn,
    /// Value returned to a call site
    ActualOut,
    /// Parameter received by a procedure
    FormalIn,
    /// Value returned by a procedure
    FormalOut,
    /// Expression
    Expression,
    /// Branch predicate
    Predicate,
    /// Monitor enter/exit, wait/notify and similar synchronization points
    SyncPoint,
    /// Folded node standing for a collapsed recursive cycle
    Folded,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Normal => "normal",
            NodeKind::CallSite => "call_site",
            NodeKind::Entry => "entry",
            NodeKind::Exit => "exit",
            NodeKind::ActualIn => "actual_in",
            NodeKind::ActualOut => "actual_out",
            NodeKind::FormalIn => "formal_in",
            NodeKind::FormalOut => "formal_out",
            NodeKind::Expression => "expression",
            NodeKind::Predicate => "predicate",
            NodeKind::SyncPoint => "sync_point",
            NodeKind::Folded => "folded",
        }
    }

    /// Actual parameter nodes belong to exactly one call site.
    pub fn is_actual_parameter(&self) -> bool {
        matches!(self, NodeKind::ActualIn | NodeKind::ActualOut)
    }
}

/// Program point. Immutable once the graph is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub proc: ProcId,
    /// Front-end name of the program part this node stands for
    /// (e.g. `"Clock.max"`), used to resolve annotations.
    #[serde(default)]
    pub label: String,
    /// Thread-region tag as delivered by the front end, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<ThreadRegionId>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, proc: ProcId) -> Self {
        Node {
            id,
            kind,
            proc,
            label: String::new(),
            region: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_region(mut self, region: ThreadRegionId) -> Self {
        self.region = Some(region);
        self
    }
}

/// Procedure (method) descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: ProcId,
    pub name: String,
}

impl Procedure {
    pub fn new(id: ProcId, name: impl Into<String>) -> Self {
        Procedure {
            id,
            name: name.into(),
        }
    }
}
