//! Integer identifiers for arena-stored graph entities.
//!
//! Every cross-reference in the dependence graph is one of these ids, never an
//! owned pointer, so cyclic call and fork structures need no special handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a program point in the dependence graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Identifier of a procedure (method) owning a set of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcId(pub u32);

/// Identifier of a static thread instance. `ThreadId::MAIN` is the implicit
/// thread that runs the program entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub u32);

impl ThreadId {
    pub const MAIN: ThreadId = ThreadId(0);

    pub fn is_main(&self) -> bool {
        *self == Self::MAIN
    }
}

/// Identifier of a thread region. There is exactly one region per thread
/// instance, and the region id equals the thread id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadRegionId(pub u32);

impl From<ThreadId> for ThreadRegionId {
    fn from(thread: ThreadId) -> Self {
        ThreadRegionId(thread.0)
    }
}

impl From<ThreadRegionId> for ThreadId {
    fn from(region: ThreadRegionId) -> Self {
        ThreadId(region.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for ProcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for ThreadRegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
