//! Caller-facing annotation set
//!
//! Annotations resolve immediately; a failed request leaves the set as it
//! was. Repeated annotations of one node combine conservatively: source levels
//! are joined, sink levels are met. Re-annotating a node in the other role
//! replaces the earlier role, so no node is ever both source and sink.

use crate::errors::{ConstructionError, IfcError, Result};
use crate::features::annotation::domain::{AnnotationRole, AnnotationSnapshot, ProgramPart};
use crate::features::annotation::ports::ProgramPartResolver;
use crate::features::lattice::{Level, SecurityLattice};
use crate::shared::models::NodeId;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    sources: BTreeMap<NodeId, Level>,
    sinks: BTreeMap<NodeId, Level>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `part` as a source at `level`; returns the annotated nodes
    pub fn add_source<R: ProgramPartResolver + ?Sized>(
        &mut self,
        resolver: &R,
        lattice: &SecurityLattice,
        part: &ProgramPart,
        level: &str,
    ) -> Result<Vec<NodeId>> {
        self.add(resolver, lattice, part, level, AnnotationRole::Source)
    }

    /// Mark `part` as a sink at `level`; returns the annotated nodes
    pub fn add_sink<R: ProgramPartResolver + ?Sized>(
        &mut self,
        resolver: &R,
        lattice: &SecurityLattice,
        part: &ProgramPart,
        level: &str,
    ) -> Result<Vec<NodeId>> {
        self.add(resolver, lattice, part, level, AnnotationRole::Sink)
    }

    pub fn clear(&mut self) {
        self.sources.clear();
        self.sinks.clear();
    }

    pub fn sources(&self) -> &BTreeMap<NodeId, Level> {
        &self.sources
    }

    pub fn sinks(&self) -> &BTreeMap<NodeId, Level> {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.sinks.is_empty()
    }

    /// Freeze the current annotations for one run
    pub fn snapshot(&self) -> AnnotationSnapshot {
        AnnotationSnapshot {
            sources: self.sources.clone(),
            sinks: self.sinks.clone(),
        }
    }

    fn add<R: ProgramPartResolver + ?Sized>(
        &mut self,
        resolver: &R,
        lattice: &SecurityLattice,
        part: &ProgramPart,
        level: &str,
        role: AnnotationRole,
    ) -> Result<Vec<NodeId>> {
        let level = lattice
            .level(level)
            .ok_or_else(|| ConstructionError::UnknownLevel(level.to_string()))?;
        let nodes = resolver.resolve(part);
        if nodes.is_empty() {
            return Err(IfcError::resolution(part));
        }

        let (own, other) = match role {
            AnnotationRole::Source => (&mut self.sources, &mut self.sinks),
            AnnotationRole::Sink => (&mut self.sinks, &mut self.sources),
        };
        for &node in &nodes {
            other.remove(&node);
            let combined = match (own.get(&node), role) {
                (Some(prev), AnnotationRole::Source) => lattice.join(prev, &level),
                (Some(prev), AnnotationRole::Sink) => lattice.meet(prev, &level),
                (None, _) => None,
            };
            own.insert(node, combined.unwrap_or_else(|| level.clone()));
        }

        debug!(part = %part, level = %level, role = ?role, nodes = nodes.len(), "Annotation added");
        Ok(nodes)
    }
}
