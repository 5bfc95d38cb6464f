//! Annotation Ports

use crate::features::annotation::domain::ProgramPart;
use crate::shared::models::NodeId;

/// Resolves caller-level program parts to graph nodes.
///
/// The front end that built the graph usually knows best; [`LabelResolver`]
/// covers graphs whose nodes carry front-end labels.
///
/// [`LabelResolver`]: crate::features::annotation::LabelResolver
pub trait ProgramPartResolver {
    /// Nodes the part stands for, ordered; empty if it is unknown
    fn resolve(&self, part: &ProgramPart) -> Vec<NodeId>;
}
