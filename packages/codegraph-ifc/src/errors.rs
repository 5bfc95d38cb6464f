//! Error types for codegraph-ifc
//!
//! Construction errors are fatal and reported once while the graph, thread
//! model or lattice is built. Everything else is recoverable and surfaces per
//! request.

use crate::config::ConfigError;
use crate::features::criterion::domain::Criterion;
use crate::shared::models::{EdgeKind, NodeId, ProcId, ThreadId};
use thiserror::Error;

/// Malformed input detected while building the immutable analysis snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("Node {node} belongs to unknown procedure {proc}")]
    UnknownProcedure { node: NodeId, proc: ProcId },

    #[error("Edge {from} -{kind}-> {to} references an unknown node")]
    DanglingEdge {
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
    },

    #[error("Actual parameter node {node} has no owning call site")]
    MissingCallSite { node: NodeId },

    #[error("Unbalanced call structure at {from} -{kind}-> {to}: {reason}")]
    UnbalancedCall {
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
        reason: String,
    },

    #[error("Fork edge leaves {node}, which is not registered as the fork of any thread")]
    UnregisteredFork { node: NodeId },

    #[error("Thread {thread} is forked at {fork}, but no fork edge leaves that node")]
    ForkWithoutEdge { thread: ThreadId, fork: NodeId },

    #[error("Duplicate thread id {0}")]
    DuplicateThread(ThreadId),

    #[error("Fork node {fork} is registered for more than one thread")]
    ForkSharedByThreads { fork: NodeId },

    #[error("Thread {thread} references unknown node {node}")]
    UnknownThreadNode { thread: ThreadId, node: NodeId },

    #[error("Fork/join node {node} of thread {thread} lies in more than one thread region")]
    AmbiguousThreadNode { thread: ThreadId, node: NodeId },

    #[error("Unknown security level '{0}'")]
    UnknownLevel(String),

    #[error("Lattice is empty")]
    EmptyLattice,

    #[error("Lattice ordering is cyclic: '{a}' and '{b}' flow into each other")]
    CyclicLattice { a: String, b: String },

    #[error("Not a lattice: '{a}' and '{b}' have no unique {op}")]
    NotALattice { a: String, b: String, op: &'static str },

    #[error("Cannot parse lattice line {line}: '{text}'")]
    LatticeParse { line: usize, text: String },
}

/// Main error type for codegraph-ifc operations
#[derive(Debug, Error)]
pub enum IfcError {
    /// Malformed graph, thread registry or lattice (fatal)
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// Annotation target resolved to zero nodes; the annotation was not applied
    #[error("Program part '{part}' does not resolve to any graph node")]
    Resolution { part: String },

    /// Run cancelled by the caller
    #[error("Analysis aborted")]
    Aborted,

    /// Concurrency-aware criterion invoked without an MHP precision
    #[error("Criterion {criterion} requires an MHP precision")]
    MissingPrecision { criterion: Criterion },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Interchange format error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IfcError {
    pub fn resolution(part: impl ToString) -> Self {
        IfcError::Resolution {
            part: part.to_string(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, IfcError::Aborted)
    }
}

/// Result type alias for codegraph-ifc operations
pub type Result<T> = std::result::Result<T, IfcError>;
