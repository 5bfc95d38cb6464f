/*
 * System Dependence Graph
 *
 * Whole-program dependence graph: control/data/heap dependence, call and
 * parameter passing, summaries and thread interaction edges.
 *
 * Storage:
 * - petgraph arena (`DiGraph`), nodes addressed by index, no owned pointers
 * - external `NodeId` -> arena index map
 * - per-kind edge index and call-site ownership of actual parameters
 *
 * All indices are built once by `SdgBuilder::build`; there is no mutation API.
 */

use crate::features::concurrency::ThreadModel;
use crate::features::sdg::domain::SdgDto;
use crate::shared::models::{Edge, EdgeKind, EdgeKindSet, Node, NodeId, NodeKind, ProcId, Procedure};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, VecDeque};

/// Immutable, indexed dependence graph
#[derive(Debug)]
pub struct SystemDependenceGraph {
    graph: DiGraph<Node, EdgeKind>,
    index: FxHashMap<NodeId, NodeIndex>,
    procedures: BTreeMap<ProcId, Procedure>,
    /// Edge indices grouped by kind
    by_kind: FxHashMap<EdgeKind, Vec<EdgeIndex>>,
    /// Actual parameter node -> owning call site
    call_sites: FxHashMap<NodeId, NodeId>,
}

impl SystemDependenceGraph {
    pub(crate) fn from_parts(
        graph: DiGraph<Node, EdgeKind>,
        index: FxHashMap<NodeId, NodeIndex>,
        procedures: BTreeMap<ProcId, Procedure>,
        call_sites: FxHashMap<NodeId, NodeId>,
    ) -> Self {
        let mut by_kind: FxHashMap<EdgeKind, Vec<EdgeIndex>> = FxHashMap::default();
        for edge in graph.edge_references() {
            by_kind.entry(*edge.weight()).or_default().push(edge.id());
        }

        SystemDependenceGraph {
            graph,
            index,
            procedures,
            by_kind,
            call_sites,
        }
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing edges of `n` (empty for unknown nodes)
    pub fn edges_from(&self, n: NodeId) -> impl Iterator<Item = Edge> + '_ {
        self.adjacent(n, Direction::Outgoing)
    }

    /// Incoming edges of `n` (empty for unknown nodes)
    pub fn edges_to(&self, n: NodeId) -> impl Iterator<Item = Edge> + '_ {
        self.adjacent(n, Direction::Incoming)
    }

    /// Every edge whose kind is in `kinds`
    pub fn edges_of_kind(&self, kinds: EdgeKindSet) -> impl Iterator<Item = Edge> + '_ {
        kinds
            .iter()
            .filter_map(move |kind| self.by_kind.get(&kind))
            .flatten()
            .filter_map(move |&e| self.edge_at(e))
    }

    /// Edges of `n` in the given direction, restricted to `kinds`
    pub fn edges_directed(
        &self,
        n: NodeId,
        direction: Direction,
        kinds: EdgeKindSet,
    ) -> impl Iterator<Item = Edge> + '_ {
        self.adjacent(n, direction)
            .filter(move |e| kinds.contains(e.kind))
    }

    pub fn procedure(&self, id: ProcId) -> Option<&Procedure> {
        self.procedures.get(&id)
    }

    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> + '_ {
        self.procedures.values()
    }

    pub fn procedure_by_name(&self, name: &str) -> Option<&Procedure> {
        self.procedures.values().find(|p| p.name == name)
    }

    /// Entry node of a procedure (lowest id if the front end emitted several)
    pub fn entry_of(&self, proc: ProcId) -> Option<NodeId> {
        self.nodes()
            .filter(|n| n.proc == proc && n.kind == NodeKind::Entry)
            .map(|n| n.id)
            .min()
    }

    /// Formal-in nodes of a procedure ordered by id
    pub fn formal_ins_of(&self, proc: ProcId) -> Vec<NodeId> {
        let mut formals: Vec<NodeId> = self
            .nodes()
            .filter(|n| n.proc == proc && n.kind == NodeKind::FormalIn)
            .map(|n| n.id)
            .collect();
        formals.sort();
        formals
    }

    /// Call site owning `n`: the node itself for call sites, the owning call
    /// site for actual-in/actual-out nodes, `None` otherwise.
    pub fn call_site_of(&self, n: NodeId) -> Option<NodeId> {
        match self.node(n)?.kind {
            NodeKind::CallSite => Some(n),
            _ => self.call_sites.get(&n).copied(),
        }
    }

    /// Interchange form of the graph plus its thread registry
    pub fn to_dto(&self, threads: &ThreadModel) -> SdgDto {
        SdgDto {
            procedures: self.procedures.values().cloned().collect(),
            nodes: self.nodes().cloned().collect(),
            edges: self
                .graph
                .edge_indices()
                .filter_map(|e| self.edge_at(e))
                .collect(),
            threads: threads.specs(),
        }
    }

    /// Nodes reachable from `seeds` (inclusive) along `kinds` edges
    pub fn reachable(
        &self,
        seeds: impl IntoIterator<Item = NodeId>,
        kinds: EdgeKindSet,
        direction: Direction,
    ) -> FxHashSet<NodeId> {
        let mut visited = FxHashSet::default();
        let mut worklist: VecDeque<NodeId> = VecDeque::new();
        for seed in seeds {
            if self.contains(seed) && visited.insert(seed) {
                worklist.push_back(seed);
            }
        }

        while let Some(current) = worklist.pop_front() {
            for edge in self.edges_directed(current, direction, kinds) {
                let next = match direction {
                    Direction::Outgoing => edge.target,
                    Direction::Incoming => edge.source,
                };
                if visited.insert(next) {
                    worklist.push_back(next);
                }
            }
        }

        visited
    }

    fn adjacent(&self, n: NodeId, direction: Direction) -> impl Iterator<Item = Edge> + '_ {
        self.index
            .get(&n)
            .into_iter()
            .flat_map(move |&idx| self.graph.edges_directed(idx, direction))
            .map(move |e| Edge {
                source: self.graph[e.source()].id,
                target: self.graph[e.target()].id,
                kind: *e.weight(),
            })
    }

    fn edge_at(&self, e: EdgeIndex) -> Option<Edge> {
        let (source, target) = self.graph.edge_endpoints(e)?;
        Some(Edge {
            source: self.graph[source].id,
            target: self.graph[target].id,
            kind: self.graph[e],
        })
    }
}
