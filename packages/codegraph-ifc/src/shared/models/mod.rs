//! Core graph vocabulary (nodes, edges, identifiers)

pub mod edge;
pub mod ids;
pub mod node;

pub use edge::{Edge, EdgeKind, EdgeKindSet};
pub use ids::{NodeId, ProcId, ThreadId, ThreadRegionId};
pub use node::{Node, NodeKind, Procedure};
