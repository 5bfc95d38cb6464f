//! Information-Flow Certification Use Case
//!
//! Caller-facing entry point: owns the immutable snapshot (graph, thread
//! model, lattice), the configuration and the mutable annotation set.
//!
//! ## Workflow
//! 1. Build the graph and thread model (`SdgBuilder::build`)
//! 2. Annotate sources and sinks by program part
//! 3. `check(criterion, precision)` for a violation set
//!
//! Annotations must not change while a check runs; each run works on a
//! snapshot taken at its start.

use crate::config::IfcConfig;
use crate::errors::Result;
use crate::features::annotation::{AnnotationSet, LabelResolver, ProgramPart, ProgramPartResolver};
use crate::features::chopping::{Chopper, Violation, ViolationEngine};
use crate::features::concurrency::{MhpPrecision, ThreadModel};
use crate::features::criterion::domain::Criterion;
use crate::features::criterion::infrastructure::CriterionEngine;
use crate::features::lattice::SecurityLattice;
use crate::features::sdg::{SdgBuilder, SdgDto, SystemDependenceGraph};
use crate::features::slicing::ContextSlicer;
use crate::shared::models::NodeId;
use crate::shared::CancellationToken;
use std::collections::BTreeSet;

/// Non-interference checking over one dependence graph
#[derive(Debug)]
pub struct IfcAnalysis {
    graph: SystemDependenceGraph,
    threads: ThreadModel,
    lattice: SecurityLattice,
    config: IfcConfig,
    annotations: AnnotationSet,
}

impl IfcAnalysis {
    pub fn new(graph: SystemDependenceGraph, threads: ThreadModel, lattice: SecurityLattice) -> Self {
        IfcAnalysis {
            graph,
            threads,
            lattice,
            config: IfcConfig::default(),
            annotations: AnnotationSet::new(),
        }
    }

    /// Build from staged graph input
    pub fn from_builder(builder: SdgBuilder, lattice: SecurityLattice) -> Result<Self> {
        let (graph, threads) = builder.build()?;
        Ok(Self::new(graph, threads, lattice))
    }

    /// Build from the JSON interchange form
    pub fn from_json(json: &str, lattice: SecurityLattice) -> Result<Self> {
        Self::from_builder(SdgBuilder::from_dto(SdgDto::from_json(json)?), lattice)
    }

    /// Replace the configuration; rejected if invalid
    pub fn with_config(mut self, config: IfcConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn graph(&self) -> &SystemDependenceGraph {
        &self.graph
    }

    pub fn threads(&self) -> &ThreadModel {
        &self.threads
    }

    pub fn lattice(&self) -> &SecurityLattice {
        &self.lattice
    }

    pub fn config(&self) -> &IfcConfig {
        &self.config
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    /// Mark `part` as a confidential source at `level`.
    ///
    /// Fails with `Resolution` if the part names no node; the annotation set
    /// is then left unchanged.
    pub fn add_source_annotation(&mut self, part: &ProgramPart, level: &str) -> Result<Vec<NodeId>> {
        let resolver = LabelResolver::new(&self.graph);
        self.annotations
            .add_source(&resolver, &self.lattice, part, level)
    }

    /// Mark `part` as an observable sink at `level`
    pub fn add_sink_annotation(&mut self, part: &ProgramPart, level: &str) -> Result<Vec<NodeId>> {
        let resolver = LabelResolver::new(&self.graph);
        self.annotations.add_sink(&resolver, &self.lattice, part, level)
    }

    /// Like [`Self::add_source_annotation`], resolving through a front-end
    /// supplied resolver
    pub fn add_source_annotation_with(
        &mut self,
        resolver: &dyn ProgramPartResolver,
        part: &ProgramPart,
        level: &str,
    ) -> Result<Vec<NodeId>> {
        self.annotations
            .add_source(resolver, &self.lattice, part, level)
    }

    pub fn add_sink_annotation_with(
        &mut self,
        resolver: &dyn ProgramPartResolver,
        part: &ProgramPart,
        level: &str,
    ) -> Result<Vec<NodeId>> {
        self.annotations.add_sink(resolver, &self.lattice, part, level)
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }

    /// Run `criterion`. Concurrency-aware criteria require `precision`.
    pub fn check(&self, criterion: Criterion, precision: Option<MhpPrecision>) -> Result<BTreeSet<Violation>> {
        self.check_cancellable(criterion, precision, &CancellationToken::new())
    }

    /// Run `criterion` with the configured default MHP precision
    pub fn check_with_default(&self, criterion: Criterion) -> Result<BTreeSet<Violation>> {
        self.check(criterion, Some(self.config.mhp.default_precision))
    }

    /// Run `criterion`, aborting with `IfcError::Aborted` once `cancel` fires
    pub fn check_cancellable(
        &self,
        criterion: Criterion,
        precision: Option<MhpPrecision>,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<Violation>> {
        let snapshot = self.annotations.snapshot();
        CriterionEngine::new(&self.graph, &self.threads, &self.lattice, &self.config)
            .run(criterion, precision, &snapshot, cancel)
    }

    /// Nodes on dependence paths from `sources` to `sinks` over the edges
    /// `criterion` traverses
    pub fn chop(&self, sources: &[NodeId], sinks: &[NodeId], criterion: Criterion) -> BTreeSet<NodeId> {
        let slicer = self.slicer(criterion);
        Chopper::new(&slicer).chop(sources, sinks)
    }

    /// Whether the annotated `source` may illegally flow to the annotated
    /// `sink` through sequential dependences. Unannotated nodes never do.
    pub fn is_illegal_flow(&self, source: NodeId, sink: NodeId) -> bool {
        let (Some(source_level), Some(sink_level)) = (
            self.annotations.sources().get(&source),
            self.annotations.sinks().get(&sink),
        ) else {
            return false;
        };
        let slicer = self.slicer(Criterion::SequentialNi);
        ViolationEngine::new(Chopper::new(&slicer), &self.lattice)
            .is_illegal_flow(source, source_level, sink, sink_level)
    }

    fn slicer(&self, criterion: Criterion) -> ContextSlicer<'_> {
        ContextSlicer::new(
            &self.graph,
            criterion.edges(),
            self.config.slicing.mode,
            self.config.slicing.max_context_depth,
        )
    }
}
