//! SDG construction
//!
//! Collects procedures, nodes, edges and thread registrations, validates them
//! and freezes the result into a [`SystemDependenceGraph`] plus its
//! [`ThreadModel`]. Validation stops at the first malformed element.

use super::graph::SystemDependenceGraph;
use crate::errors::{ConstructionError, IfcError, Result};
use crate::features::concurrency::domain::ThreadSpec;
use crate::features::concurrency::ThreadModel;
use crate::features::sdg::domain::SdgDto;
use crate::shared::models::{Edge, EdgeKind, Node, NodeId, NodeKind, ProcId, Procedure};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Mutable staging area for one dependence graph
#[derive(Debug, Default)]
pub struct SdgBuilder {
    procedures: BTreeMap<ProcId, Procedure>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    threads: Vec<ThreadSpec>,
}

impl SdgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage everything contained in an interchange DTO
    pub fn from_dto(dto: SdgDto) -> Self {
        SdgBuilder {
            procedures: dto.procedures.into_iter().map(|p| (p.id, p)).collect(),
            nodes: dto.nodes,
            edges: dto.edges,
            threads: dto.threads,
        }
    }

    pub fn add_procedure(&mut self, id: ProcId, name: impl Into<String>) -> &mut Self {
        self.procedures.insert(id, Procedure::new(id, name));
        self
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId, kind: EdgeKind) -> &mut Self {
        self.edges.push(Edge::new(source, target, kind));
        self
    }

    pub fn add_thread(&mut self, spec: ThreadSpec) -> &mut Self {
        self.threads.push(spec);
        self
    }

    /// Validate and freeze the staged graph.
    ///
    /// Fails with a [`ConstructionError`] on duplicate or dangling ids, actual
    /// parameters without a call site, unbalanced parameter passing, or an
    /// inconsistent thread registry.
    pub fn build(self) -> Result<(SystemDependenceGraph, ThreadModel)> {
        let SdgBuilder {
            procedures,
            nodes,
            edges,
            threads,
        } = self;

        let mut graph: DiGraph<Node, EdgeKind> =
            DiGraph::with_capacity(nodes.len(), edges.len());
        let mut index: FxHashMap<NodeId, NodeIndex> = FxHashMap::default();

        for node in nodes {
            if index.contains_key(&node.id) {
                return Err(ConstructionError::DuplicateNode(node.id).into());
            }
            if !procedures.contains_key(&node.proc) {
                return Err(ConstructionError::UnknownProcedure {
                    node: node.id,
                    proc: node.proc,
                }
                .into());
            }
            let id = node.id;
            index.insert(id, graph.add_node(node));
        }

        for edge in &edges {
            match (index.get(&edge.source), index.get(&edge.target)) {
                (Some(&from), Some(&to)) => {
                    graph.add_edge(from, to, edge.kind);
                }
                _ => {
                    return Err(ConstructionError::DanglingEdge {
                        from: edge.source,
                        to: edge.target,
                        kind: edge.kind,
                    }
                    .into())
                }
            }
        }

        let call_sites = owning_call_sites(&graph, &index)?;
        check_call_structure(&graph, &index, &edges, &call_sites)?;

        let sdg = SystemDependenceGraph::from_parts(graph, index, procedures, call_sites);
        debug!(
            nodes = sdg.node_count(),
            edges = sdg.edge_count(),
            "Dependence graph indexed"
        );

        let model = ThreadModel::build(&sdg, threads)?;
        info!(
            nodes = sdg.node_count(),
            edges = sdg.edge_count(),
            procedures = sdg.procedures().count(),
            threads = model.threads().count(),
            "Dependence graph built"
        );

        Ok((sdg, model))
    }
}

/// Map every actual parameter node to the call site controlling it.
/// Several controlling call sites resolve to the lowest id.
fn owning_call_sites(
    graph: &DiGraph<Node, EdgeKind>,
    index: &FxHashMap<NodeId, NodeIndex>,
) -> Result<FxHashMap<NodeId, NodeId>> {
    let mut owners = FxHashMap::default();

    for node in graph.node_weights().filter(|n| n.kind.is_actual_parameter()) {
        let Some(&idx) = index.get(&node.id) else {
            continue;
        };
        let owner = graph
            .edges_directed(idx, Direction::Incoming)
            .filter(|e| *e.weight() == EdgeKind::ControlDependence)
            .map(|e| &graph[e.source()])
            .filter(|n| n.kind == NodeKind::CallSite)
            .map(|n| n.id)
            .min();

        match owner {
            Some(site) => {
                owners.insert(node.id, site);
            }
            None => return Err(ConstructionError::MissingCallSite { node: node.id }.into()),
        }
    }

    Ok(owners)
}

/// Every parameter edge must be backed by a call edge from its call site into
/// the procedure on the other side, and call edges must leave call sites.
fn check_call_structure(
    graph: &DiGraph<Node, EdgeKind>,
    index: &FxHashMap<NodeId, NodeIndex>,
    edges: &[Edge],
    call_sites: &FxHashMap<NodeId, NodeId>,
) -> Result<()> {
    let node = |id: NodeId| index.get(&id).map(|&idx| &graph[idx]);

    // call site -> procedures it calls
    let mut callees: FxHashMap<NodeId, FxHashSet<ProcId>> = FxHashMap::default();
    for edge in edges.iter().filter(|e| e.kind == EdgeKind::Call) {
        match node(edge.source) {
            Some(n) if n.kind == NodeKind::CallSite => {}
            _ => return Err(unbalanced(edge, "call edge does not leave a call site")),
        }
        if let Some(callee) = node(edge.target) {
            callees.entry(edge.source).or_default().insert(callee.proc);
        }
    }

    for edge in edges {
        let (caller_side, callee_side) = match edge.kind {
            EdgeKind::ParameterIn => (edge.source, edge.target),
            EdgeKind::ParameterOut => (edge.target, edge.source),
            _ => continue,
        };

        let site = match node(caller_side).map(|n| n.kind) {
            Some(NodeKind::CallSite) => Some(caller_side),
            _ => call_sites.get(&caller_side).copied(),
        };
        let Some(site) = site else {
            return Err(unbalanced(edge, "caller side is not owned by a call site"));
        };

        let Some(callee) = node(callee_side).map(|n| n.proc) else {
            continue;
        };
        let called = callees
            .get(&site)
            .is_some_and(|procs| procs.contains(&callee));
        if !called {
            return Err(unbalanced(
                edge,
                &format!("call site {} has no call edge into {}", site, callee),
            ));
        }
    }

    Ok(())
}

fn unbalanced(edge: &Edge, reason: &str) -> IfcError {
    ConstructionError::UnbalancedCall {
        from: edge.source,
        to: edge.target,
        kind: edge.kind,
        reason: reason.to_string(),
    }
    .into()
}
