//! Slicing domain models
//!
//! Traversal is one function parameterized by an edge classification, so the
//! direction decides which interprocedural edges enter a callee (descending)
//! and which leave it for a caller (ascending).

use crate::shared::models::EdgeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceDirection {
    /// Nodes that can influence the seeds
    Backward,
    /// Nodes the seeds can influence
    Forward,
}

impl SliceDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SliceDirection::Backward => "backward",
            SliceDirection::Forward => "forward",
        }
    }
}

impl fmt::Display for SliceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceMode {
    /// Full call-string matching
    ContextSensitive,
    /// Two-phase traversal over summary edges
    #[default]
    Summary,
    /// Ignore call-site matching
    ContextInsensitive,
}

impl SliceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SliceMode::ContextSensitive => "context_sensitive",
            SliceMode::Summary => "summary",
            SliceMode::ContextInsensitive => "context_insensitive",
        }
    }
}

impl fmt::Display for SliceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of an edge during one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// Stays within the current context (includes summary edges)
    Intra,
    /// Leaves a callee for one of its callers
    Ascending,
    /// Enters a callee from a call site
    Descending,
    /// Crosses into another thread (fork, join, interference); context is
    /// reset
    ThreadBoundary,
}

/// Classify `kind` for a traversal in `direction`
pub fn classify(kind: EdgeKind, direction: SliceDirection) -> EdgeClass {
    use EdgeKind::*;
    match (kind, direction) {
        (Fork | Join | ThreadInterference, _) => EdgeClass::ThreadBoundary,
        (Call | ParameterIn, SliceDirection::Backward) => EdgeClass::Ascending,
        (ParameterOut, SliceDirection::Backward) => EdgeClass::Descending,
        (ParameterOut, SliceDirection::Forward) => EdgeClass::Ascending,
        (Call | ParameterIn, SliceDirection::Forward) => EdgeClass::Descending,
        _ => EdgeClass::Intra,
    }
}
