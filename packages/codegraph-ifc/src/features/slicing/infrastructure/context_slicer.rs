/*
 * Context Slicer
 *
 * Worklist slicing over the system dependence graph.
 *
 * Call/return matching (backward direction; forward mirrors it):
 * - descending edge (parameter-out): enter the callee, push the call site
 * - ascending edge (call, parameter-in): return to a caller; with a non-empty
 *   call string only the call site on top is allowed, and it is popped
 * - empty call string: the slice started inside the callee, so every caller
 *   is realizable
 * - fork/join/interference: thread boundary, call string cleared
 *
 * Call strings are k-limited; dropping the oldest entry only widens the
 * slice. Each (node, call string) pair is visited once.
 */

use crate::errors::{IfcError, Result};
use crate::features::sdg::SystemDependenceGraph;
use crate::features::slicing::domain::{classify, EdgeClass, SliceDirection, SliceMode};
use crate::features::slicing::ports::SlicerPort;
use crate::shared::models::{Edge, EdgeKind, EdgeKindSet, NodeId};
use crate::shared::CancellationToken;
use petgraph::Direction;
use rustc_hash::FxHashSet;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

type CallString = Vec<NodeId>;

/// Slicer bound to one graph and one edge-kind selection
#[derive(Debug, Clone, Copy)]
pub struct ContextSlicer<'g> {
    graph: &'g SystemDependenceGraph,
    edges: EdgeKindSet,
    mode: SliceMode,
    max_context_depth: usize,
}

impl<'g> ContextSlicer<'g> {
    pub fn new(
        graph: &'g SystemDependenceGraph,
        edges: EdgeKindSet,
        mode: SliceMode,
        max_context_depth: usize,
    ) -> Self {
        ContextSlicer {
            graph,
            edges,
            mode,
            max_context_depth: max_context_depth.max(1),
        }
    }

    pub fn mode(&self) -> SliceMode {
        self.mode
    }

    pub fn graph(&self) -> &'g SystemDependenceGraph {
        self.graph
    }

    fn traversal(direction: SliceDirection) -> Direction {
        match direction {
            SliceDirection::Backward => Direction::Incoming,
            SliceDirection::Forward => Direction::Outgoing,
        }
    }

    fn step(edge: &Edge, direction: SliceDirection) -> NodeId {
        match direction {
            SliceDirection::Backward => edge.source,
            SliceDirection::Forward => edge.target,
        }
    }

    /// Call site of the caller-side endpoint of an interprocedural edge
    fn call_site(&self, edge: &Edge) -> Option<NodeId> {
        let caller_side = match edge.kind {
            EdgeKind::ParameterOut => edge.target,
            _ => edge.source,
        };
        self.graph.call_site_of(caller_side)
    }

    fn context_sensitive(
        &self,
        seeds: &[NodeId],
        direction: SliceDirection,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<NodeId>> {
        let traversal = Self::traversal(direction);
        let mut visited: FxHashSet<(NodeId, CallString)> = FxHashSet::default();
        let mut worklist: VecDeque<(NodeId, CallString)> = VecDeque::new();
        let mut result = BTreeSet::new();

        for &seed in seeds {
            if self.graph.contains(seed) && visited.insert((seed, Vec::new())) {
                worklist.push_back((seed, Vec::new()));
            }
        }

        while let Some((current, context)) = worklist.pop_front() {
            if cancel.is_cancelled() {
                return Err(IfcError::Aborted);
            }
            result.insert(current);

            for edge in self.graph.edges_directed(current, traversal, self.edges) {
                let next = Self::step(&edge, direction);
                let next_context = match classify(edge.kind, direction) {
                    EdgeClass::Intra => context.clone(),
                    EdgeClass::ThreadBoundary => Vec::new(),
                    EdgeClass::Descending => {
                        let mut pushed = context.clone();
                        if let Some(site) = self.call_site(&edge) {
                            pushed.push(site);
                            if pushed.len() > self.max_context_depth {
                                pushed.remove(0);
                            }
                        }
                        pushed
                    }
                    EdgeClass::Ascending => match context.last() {
                        None => Vec::new(),
                        Some(&top) if self.call_site(&edge) == Some(top) => {
                            context[..context.len() - 1].to_vec()
                        }
                        Some(_) => continue,
                    },
                };

                if visited.insert((next, next_context.clone())) {
                    worklist.push_back((next, next_context));
                }
            }
        }

        Ok(result)
    }

    /// Phase 1 never descends; a descending edge moves to phase 2, which
    /// never ascends. Crossing a thread boundary restarts phase 1.
    fn two_phase(
        &self,
        seeds: &[NodeId],
        direction: SliceDirection,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<NodeId>> {
        let traversal = Self::traversal(direction);
        let mut visited: FxHashSet<(NodeId, bool)> = FxHashSet::default();
        let mut worklist: VecDeque<(NodeId, bool)> = VecDeque::new();
        let mut result = BTreeSet::new();

        for &seed in seeds {
            if self.graph.contains(seed) && visited.insert((seed, false)) {
                worklist.push_back((seed, false));
            }
        }

        while let Some((current, second_phase)) = worklist.pop_front() {
            if cancel.is_cancelled() {
                return Err(IfcError::Aborted);
            }
            result.insert(current);

            for edge in self.graph.edges_directed(current, traversal, self.edges) {
                let next_phase = match (classify(edge.kind, direction), second_phase) {
                    (EdgeClass::Intra, phase) => phase,
                    (EdgeClass::ThreadBoundary, _) => false,
                    (EdgeClass::Ascending, false) => false,
                    (EdgeClass::Ascending, true) => continue,
                    (EdgeClass::Descending, _) => true,
                };
                let next = Self::step(&edge, direction);
                if visited.insert((next, next_phase)) {
                    worklist.push_back((next, next_phase));
                }
            }
        }

        Ok(result)
    }

    fn insensitive(
        &self,
        seeds: &[NodeId],
        direction: SliceDirection,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<NodeId>> {
        let traversal = Self::traversal(direction);
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut worklist: VecDeque<NodeId> = VecDeque::new();

        for &seed in seeds {
            if self.graph.contains(seed) && visited.insert(seed) {
                worklist.push_back(seed);
            }
        }

        while let Some(current) = worklist.pop_front() {
            if cancel.is_cancelled() {
                return Err(IfcError::Aborted);
            }
            for edge in self.graph.edges_directed(current, traversal, self.edges) {
                let next = Self::step(&edge, direction);
                if visited.insert(next) {
                    worklist.push_back(next);
                }
            }
        }

        Ok(visited.into_iter().collect())
    }
}

impl SlicerPort for ContextSlicer<'_> {
    fn edges(&self) -> EdgeKindSet {
        self.edges
    }

    fn slice_cancellable(
        &self,
        seeds: &[NodeId],
        direction: SliceDirection,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<NodeId>> {
        let slice = match self.mode {
            SliceMode::ContextSensitive => self.context_sensitive(seeds, direction, cancel)?,
            SliceMode::Summary => self.two_phase(seeds, direction, cancel)?,
            SliceMode::ContextInsensitive => self.insensitive(seeds, direction, cancel)?,
        };

        debug!(
            direction = %direction,
            mode = %self.mode,
            seeds = seeds.len(),
            size = slice.len(),
            "Slice computed"
        );
        Ok(slice)
    }
}
