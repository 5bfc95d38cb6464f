/*
 * Criterion Engine
 *
 * One checking run over an immutable snapshot (graph, MHP model, lattice)
 * and a frozen annotation set:
 *
 * 1. Slice forward from every source and backward from every sink, once per
 *    edge selection (sequential, and concurrent for the LSOD family).
 * 2. Decide every (source, sink) pair independently:
 *    - permitted by the lattice: never reported
 *    - non-empty sequential chop: reported under every criterion
 *    - otherwise the flow needs thread interference: reported if an
 *      interference access in the concurrent chop may happen in parallel
 *      with the sink
 *    - timing-sensitive only: synchronization edges whose ends sit on the
 *      source's forward and the sink's backward slice in different threads
 * 3. Union the per-pair results.
 *
 * Slices and pair decisions run on rayon when parallelism is enabled; the
 * result is the same set either way.
 */

use crate::config::IfcConfig;
use crate::errors::{IfcError, Result};
use crate::features::annotation::AnnotationSnapshot;
use crate::features::chopping::infrastructure::chopper::intersect;
use crate::features::chopping::{shortest_path, AccessPair, Violation, ViolationKind};
use crate::features::concurrency::{MhpPort, MhpPrecision};
use crate::features::criterion::domain::Criterion;
use crate::features::lattice::SecurityLattice;
use crate::features::sdg::SystemDependenceGraph;
use crate::features::slicing::{ContextSlicer, SliceDirection, SlicerPort};
use crate::shared::models::{EdgeKind, EdgeKindSet, NodeId};
use crate::shared::CancellationToken;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::{debug, info, trace, warn};

/// Forward slices per source and backward slices per sink
#[derive(Debug, Default)]
struct RunSlices {
    forward: FxHashMap<NodeId, BTreeSet<NodeId>>,
    backward: FxHashMap<NodeId, BTreeSet<NodeId>>,
}

impl RunSlices {
    fn chop(&self, source: NodeId, sink: NodeId) -> BTreeSet<NodeId> {
        match (self.forward.get(&source), self.backward.get(&sink)) {
            (Some(f), Some(b)) => intersect(f, b),
            _ => BTreeSet::new(),
        }
    }
}

/// Everything one pair decision reads
struct PairRun<'r> {
    criterion: Criterion,
    precision: MhpPrecision,
    snapshot: &'r AnnotationSnapshot,
    sequential: RunSlices,
    concurrent: Option<RunSlices>,
    cancel: &'r CancellationToken,
}

pub struct CriterionEngine<'a> {
    graph: &'a SystemDependenceGraph,
    mhp: &'a dyn MhpPort,
    lattice: &'a SecurityLattice,
    config: &'a IfcConfig,
}

impl<'a> CriterionEngine<'a> {
    pub fn new(
        graph: &'a SystemDependenceGraph,
        mhp: &'a dyn MhpPort,
        lattice: &'a SecurityLattice,
        config: &'a IfcConfig,
    ) -> Self {
        CriterionEngine {
            graph,
            mhp,
            lattice,
            config,
        }
    }

    /// MHP precision a criterion actually applies
    pub fn effective_precision(criterion: Criterion, precision: MhpPrecision) -> MhpPrecision {
        match criterion {
            Criterion::SequentialNi => MhpPrecision::None,
            Criterion::LsodBasic => precision,
            Criterion::LsodRefined | Criterion::LsodTimingSensitive => match precision {
                MhpPrecision::None => MhpPrecision::None,
                _ => MhpPrecision::Precise,
            },
        }
    }

    /// Run `criterion` over every annotated (source, sink) pair.
    ///
    /// Concurrency-aware criteria fail with `MissingPrecision` when no
    /// precision is given; a cancelled run fails with `Aborted`.
    pub fn run(
        &self,
        criterion: Criterion,
        precision: Option<MhpPrecision>,
        snapshot: &AnnotationSnapshot,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<Violation>> {
        let precision = match (criterion.is_concurrent(), precision) {
            (false, _) => MhpPrecision::None,
            (true, Some(p)) => Self::effective_precision(criterion, p),
            (true, None) => return Err(IfcError::MissingPrecision { criterion }),
        };

        info!(
            criterion = %criterion,
            precision = %precision,
            sources = snapshot.sources.len(),
            sinks = snapshot.sinks.len(),
            mode = %self.config.slicing.mode,
            "Checking run started"
        );

        let result = match self.dedicated_pool() {
            Some(pool) => pool.install(|| self.run_pairs(criterion, precision, snapshot, cancel)),
            None => self.run_pairs(criterion, precision, snapshot, cancel),
        };

        match &result {
            Ok(violations) => info!(
                criterion = %criterion,
                violations = violations.len(),
                "Checking run finished"
            ),
            Err(IfcError::Aborted) => warn!(criterion = %criterion, "Checking run aborted"),
            Err(e) => warn!(criterion = %criterion, error = %e, "Checking run failed"),
        }
        result
    }

    fn run_pairs(
        &self,
        criterion: Criterion,
        precision: MhpPrecision,
        snapshot: &AnnotationSnapshot,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<Violation>> {
        let sources: Vec<NodeId> = snapshot.sources.keys().copied().collect();
        let sinks: Vec<NodeId> = snapshot.sinks.keys().copied().collect();
        if sources.is_empty() || sinks.is_empty() {
            return Ok(BTreeSet::new());
        }

        let sequential = self.slices(EdgeKindSet::sequential(), &sources, &sinks, cancel)?;
        let concurrent = if criterion.is_concurrent() {
            Some(self.slices(EdgeKindSet::concurrent(), &sources, &sinks, cancel)?)
        } else {
            None
        };

        let run = PairRun {
            criterion,
            precision,
            snapshot,
            sequential,
            concurrent,
            cancel,
        };
        let pairs: Vec<(NodeId, NodeId)> = snapshot.pairs().collect();
        let decided = self.map_all(&pairs, |&(source, sink)| self.check_pair(&run, source, sink))?;

        Ok(decided.into_iter().flatten().collect())
    }

    fn slices(
        &self,
        edges: EdgeKindSet,
        sources: &[NodeId],
        sinks: &[NodeId],
        cancel: &CancellationToken,
    ) -> Result<RunSlices> {
        let slicer = ContextSlicer::new(
            self.graph,
            edges,
            self.config.slicing.mode,
            self.config.slicing.max_context_depth,
        );
        let slice = |seed: NodeId, direction| {
            slicer
                .slice_cancellable(&[seed], direction, cancel)
                .map(|s| (seed, s))
        };

        let forward = self.map_all(sources, |&s| slice(s, SliceDirection::Forward))?;
        let backward = self.map_all(sinks, |&t| slice(t, SliceDirection::Backward))?;
        debug!(
            edges = ?edges,
            forward = forward.len(),
            backward = backward.len(),
            "Run slices computed"
        );

        Ok(RunSlices {
            forward: forward.into_iter().collect(),
            backward: backward.into_iter().collect(),
        })
    }

    fn check_pair(&self, run: &PairRun<'_>, source: NodeId, sink: NodeId) -> Result<Option<Violation>> {
        if run.cancel.is_cancelled() {
            return Err(IfcError::Aborted);
        }
        let (Some(source_level), Some(sink_level)) = (
            run.snapshot.source_level(source),
            run.snapshot.sink_level(sink),
        ) else {
            return Ok(None);
        };
        let Some(kind) = ViolationKind::from_comparison(self.lattice.compare(source_level, sink_level))
        else {
            trace!(source = %source, sink = %sink, "Flow permitted by lattice");
            return Ok(None);
        };

        let violation = |kind: ViolationKind, witness: Option<AccessPair>, path: Vec<NodeId>| Violation {
            source,
            sink,
            source_level: source_level.clone(),
            sink_level: sink_level.clone(),
            criterion: run.criterion,
            kind,
            witness,
            path,
        };

        let chop = run.sequential.chop(source, sink);
        if !chop.is_empty() {
            let path = self.path(EdgeKindSet::sequential(), &chop, source, sink);
            return Ok(Some(violation(kind, None, path)));
        }

        let Some(concurrent) = &run.concurrent else {
            return Ok(None);
        };

        let chop = concurrent.chop(source, sink);
        if !chop.is_empty() {
            let mut accesses: Vec<NodeId> = self
                .graph
                .edges_of_kind(EdgeKindSet::of(&[EdgeKind::ThreadInterference]))
                .filter(|e| chop.contains(&e.source) && chop.contains(&e.target))
                .map(|e| e.source)
                .collect();
            accesses.sort();
            accesses.dedup();

            for access in accesses {
                if self.mhp.may_happen_in_parallel(access, sink, run.precision) {
                    let path = self.path(EdgeKindSet::concurrent(), &chop, source, sink);
                    return Ok(Some(violation(kind, Some(AccessPair::new(access, sink)), path)));
                }
                trace!(source = %source, sink = %sink, access = %access, "Access pair cannot interleave");
            }
        }

        if run.criterion == Criterion::LsodTimingSensitive && run.precision != MhpPrecision::None {
            if let Some((first, second)) = self.order_conflict(concurrent, source, sink) {
                let path = match (concurrent.forward.get(&source), concurrent.backward.get(&sink)) {
                    (Some(fwd), Some(bwd)) if self.config.report.witness_paths => {
                        let mut path = shortest_path(self.graph, EdgeKindSet::concurrent(), fwd, source, first);
                        path.extend(shortest_path(self.graph, EdgeKindSet::concurrent(), bwd, second, sink));
                        path
                    }
                    _ => Vec::new(),
                };
                return Ok(Some(violation(
                    ViolationKind::OrderConflict,
                    Some(AccessPair::new(first, second)),
                    path,
                )));
            }
        }

        Ok(None)
    }

    /// Lowest synchronization edge (either orientation) from the source's
    /// forward slice to the sink's backward slice, across threads that may
    /// run in parallel
    fn order_conflict(&self, slices: &RunSlices, source: NodeId, sink: NodeId) -> Option<(NodeId, NodeId)> {
        let forward = slices.forward.get(&source)?;
        let backward = slices.backward.get(&sink)?;

        self.graph
            .edges_of_kind(EdgeKindSet::of(&[EdgeKind::SynchronizationDependence]))
            .flat_map(|e| [(e.source, e.target), (e.target, e.source)])
            .filter(|&(c, d)| forward.contains(&c) && (d == sink || backward.contains(&d)))
            .filter(|&(c, d)| {
                !self.mhp.share_region(c, d)
                    && self.mhp.may_happen_in_parallel(c, d, MhpPrecision::Simple)
            })
            .min()
    }

    fn path(&self, edges: EdgeKindSet, chop: &BTreeSet<NodeId>, source: NodeId, sink: NodeId) -> Vec<NodeId> {
        if self.config.report.witness_paths {
            shortest_path(self.graph, edges, chop, source, sink)
        } else {
            Vec::new()
        }
    }

    fn map_all<T, R, F>(&self, items: &[T], f: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync + Send,
    {
        if self.config.parallel.enabled {
            items.par_iter().map(f).collect()
        } else {
            items.iter().map(f).collect()
        }
    }

    fn dedicated_pool(&self) -> Option<rayon::ThreadPool> {
        let parallel = &self.config.parallel;
        if !parallel.enabled || parallel.num_threads == 0 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(parallel.num_threads)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, "Falling back to the global rayon pool");
                None
            }
        }
    }
}
