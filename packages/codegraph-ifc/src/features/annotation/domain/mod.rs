//! Annotation domain models

use crate::features::lattice::Level;
use crate::shared::models::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Caller-level reference to one or more graph nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramPart {
    /// Procedure, resolved to its entry node
    Method(String),
    /// Zero-based formal parameter of a procedure
    Parameter { method: String, index: usize },
    /// Field access nodes carrying this label
    Field(String),
    /// Statement nodes carrying this label
    Statement(String),
    /// Raw graph node
    Node(NodeId),
}

impl fmt::Display for ProgramPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramPart::Method(name) => write!(f, "method {}", name),
            ProgramPart::Parameter { method, index } => {
                write!(f, "parameter #{} of {}", index, method)
            }
            ProgramPart::Field(name) => write!(f, "field {}", name),
            ProgramPart::Statement(label) => write!(f, "statement {}", label),
            ProgramPart::Node(id) => write!(f, "node {}", id),
        }
    }
}

/// Role an annotated node plays in a flow check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationRole {
    /// Confidential input; the level bounds what it may influence
    Source,
    /// Observable output; the level bounds what may influence it
    Sink,
}

/// Read-only view of the annotations for one checking run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSnapshot {
    pub sources: BTreeMap<NodeId, Level>,
    pub sinks: BTreeMap<NodeId, Level>,
}

impl AnnotationSnapshot {
    pub fn source_level(&self, n: NodeId) -> Option<&Level> {
        self.sources.get(&n)
    }

    pub fn sink_level(&self, n: NodeId) -> Option<&Level> {
        self.sinks.get(&n)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.sinks.is_empty()
    }

    /// Every (source, sink) pair, ordered
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.sources
            .keys()
            .flat_map(move |&s| self.sinks.keys().map(move |&t| (s, t)))
    }
}
