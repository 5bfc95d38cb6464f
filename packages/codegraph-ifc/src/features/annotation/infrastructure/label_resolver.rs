//! Program-part resolution over node labels

use crate::features::annotation::domain::ProgramPart;
use crate::features::annotation::ports::ProgramPartResolver;
use crate::features::sdg::SystemDependenceGraph;
use crate::shared::models::NodeId;

/// Resolver backed by procedure names and node labels
#[derive(Debug, Clone, Copy)]
pub struct LabelResolver<'g> {
    graph: &'g SystemDependenceGraph,
}

impl<'g> LabelResolver<'g> {
    pub fn new(graph: &'g SystemDependenceGraph) -> Self {
        LabelResolver { graph }
    }

    fn labelled(&self, label: &str) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|n| n.label == label)
            .map(|n| n.id)
            .collect();
        nodes.sort();
        nodes
    }
}

impl ProgramPartResolver for LabelResolver<'_> {
    fn resolve(&self, part: &ProgramPart) -> Vec<NodeId> {
        match part {
            ProgramPart::Method(name) => self
                .graph
                .procedure_by_name(name)
                .and_then(|p| self.graph.entry_of(p.id))
                .into_iter()
                .collect(),
            ProgramPart::Parameter { method, index } => self
                .graph
                .procedure_by_name(method)
                .and_then(|p| self.graph.formal_ins_of(p.id).get(*index).copied())
                .into_iter()
                .collect(),
            ProgramPart::Field(label) | ProgramPart::Statement(label) => self.labelled(label),
            ProgramPart::Node(id) if self.graph.contains(*id) => vec![*id],
            ProgramPart::Node(_) => Vec::new(),
        }
    }
}
