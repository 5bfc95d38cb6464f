//! Thread Model
//!
//! Built once from the dependence graph and the thread registry:
//!
//! 1. **Regions**: a child thread's region is everything forward-reachable from
//!    its entries over control-flow-bearing edges (fork edges are never
//!    followed, so nested threads stay separate). The main region is what is
//!    reachable from every node outside the child regions.
//! 2. **Thread tree**: the parent of a thread is the lowest region holding its
//!    fork node.
//! 3. **Ordering facts** per child thread, over control-flow and call edges:
//!    nodes strictly before the fork, and nodes after the join. A fork on a
//!    control-flow cycle, or in a procedure entered through several call
//!    sites, spawns several instances and marks the thread dynamic.
//! 4. **Sync index**: synchronization-dependence closure plus, per node, the
//!    sync points it is control dependent on.

use crate::errors::{ConstructionError, Result};
use crate::features::concurrency::domain::{ThreadInstance, ThreadSpec};
use crate::features::sdg::SystemDependenceGraph;
use crate::shared::models::{
    EdgeKind, EdgeKindSet, NodeId, NodeKind, ProcId, ThreadId, ThreadRegionId,
};
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, trace};

/// Fork/join ordering of one child thread relative to its parent
#[derive(Debug, Default)]
pub(crate) struct OrderingFacts {
    /// Nodes that always execute before the fork
    pub(crate) before_fork: FxHashSet<NodeId>,
    /// Nodes that always execute after the join (empty for dynamic or
    /// unjoined threads)
    pub(crate) after_join: FxHashSet<NodeId>,
}

/// Synchronization structure used by precise MHP
#[derive(Debug, Default)]
pub(crate) struct SyncIndex {
    /// Node -> nodes reachable through one or more sync edges
    pub(crate) closure: FxHashMap<NodeId, FxHashSet<NodeId>>,
    /// Node -> sync points it is transitively control dependent on
    pub(crate) guards: FxHashMap<NodeId, Vec<NodeId>>,
}

/// Immutable thread registry, regions and ordering facts
#[derive(Debug)]
pub struct ThreadModel {
    pub(crate) threads: BTreeMap<ThreadId, ThreadInstance>,
    pub(crate) specs: Vec<ThreadSpec>,
    /// Node -> regions containing it, sorted
    pub(crate) regions: FxHashMap<NodeId, Vec<ThreadRegionId>>,
    pub(crate) parents: FxHashMap<ThreadId, ThreadId>,
    /// Own flag or inherited from a dynamic ancestor
    pub(crate) effectively_dynamic: FxHashMap<ThreadId, bool>,
    pub(crate) ordering: FxHashMap<ThreadId, OrderingFacts>,
    pub(crate) sync: SyncIndex,
}

impl ThreadModel {
    /// Validate the registry against `graph` and derive regions and
    /// ordering facts.
    pub fn build(graph: &SystemDependenceGraph, specs: Vec<ThreadSpec>) -> Result<Self> {
        let mut specs = specs;
        specs.sort_by_key(|s| s.id);
        validate_registry(graph, &specs)?;

        let mut threads = BTreeMap::new();
        threads.insert(ThreadId::MAIN, ThreadInstance::main());
        for spec in &specs {
            let entries = fork_entries(graph, spec.fork);
            if entries.is_empty() {
                return Err(ConstructionError::ForkWithoutEdge {
                    thread: spec.id,
                    fork: spec.fork,
                }
                .into());
            }
            threads.insert(
                spec.id,
                ThreadInstance {
                    id: spec.id,
                    fork: Some(spec.fork),
                    join: spec.join,
                    dynamic: spec.dynamic,
                    entries,
                },
            );
        }

        let regions = compute_regions(graph, &threads);
        check_unambiguous(&specs, &regions)?;

        let mut model = ThreadModel {
            threads,
            specs,
            regions,
            parents: FxHashMap::default(),
            effectively_dynamic: FxHashMap::default(),
            ordering: FxHashMap::default(),
            sync: build_sync_index(graph),
        };
        model.compute_tree();
        model.compute_ordering(graph);
        model.propagate_dynamic();

        debug!(
            threads = model.threads.len(),
            dynamic = model.effectively_dynamic.values().filter(|d| **d).count(),
            sync_sources = model.sync.closure.len(),
            "Thread model built"
        );
        Ok(model)
    }

    /// All thread instances, main first
    pub fn threads(&self) -> impl Iterator<Item = &ThreadInstance> + '_ {
        self.threads.values()
    }

    pub fn thread(&self, id: ThreadId) -> Option<&ThreadInstance> {
        self.threads.get(&id)
    }

    /// Registrations as delivered, ordered by thread id
    pub fn specs(&self) -> Vec<ThreadSpec> {
        self.specs.clone()
    }

    /// Lowest thread region containing `n`; `None` for unknown nodes
    pub fn thread_region_of(&self, n: NodeId) -> Option<ThreadRegionId> {
        self.regions.get(&n).and_then(|r| r.first().copied())
    }

    /// Every thread region containing `n`. A node in a procedure run by
    /// several threads belongs to each of their regions.
    pub fn thread_regions_of(&self, n: NodeId) -> &[ThreadRegionId] {
        self.regions.get(&n).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fork node of `t`; `None` for the main thread and unknown ids
    pub fn fork_of(&self, t: ThreadId) -> Option<NodeId> {
        self.threads.get(&t).and_then(|i| i.fork)
    }

    pub fn join_of(&self, t: ThreadId) -> Option<NodeId> {
        self.threads.get(&t).and_then(|i| i.join)
    }

    /// Thread whose region spawns `t`; `None` for main
    pub fn parent_of(&self, t: ThreadId) -> Option<ThreadId> {
        self.parents.get(&t).copied()
    }

    /// Whether `t` may run as several instances at once
    pub fn is_dynamic(&self, t: ThreadId) -> bool {
        self.effectively_dynamic.get(&t).copied().unwrap_or(false)
    }

    fn compute_tree(&mut self) {
        for (&id, instance) in &self.threads {
            let Some(fork) = instance.fork else {
                continue;
            };
            let parent = self
                .thread_regions_of(fork)
                .iter()
                .map(|&r| ThreadId::from(r))
                .find(|&r| r != id)
                .unwrap_or(ThreadId::MAIN);
            self.parents.insert(id, parent);
        }

        // A registry where threads spawn each other in a cycle has no tree;
        // hang such threads below main and treat them as dynamic.
        let ids: Vec<ThreadId> = self.threads.keys().copied().collect();
        for id in ids {
            let mut seen = FxHashSet::default();
            let mut current = id;
            while let Some(&parent) = self.parents.get(&current) {
                if !seen.insert(current) {
                    trace!(thread = %id, "Cyclic spawn structure");
                    self.parents.insert(id, ThreadId::MAIN);
                    if let Some(instance) = self.threads.get_mut(&id) {
                        instance.dynamic = true;
                    }
                    break;
                }
                current = parent;
            }
        }
    }

    fn compute_ordering(&mut self, graph: &SystemDependenceGraph) {
        let kinds = EdgeKindSet::of(&[EdgeKind::ControlFlow, EdgeKind::Call]);
        let call_sites = call_sites_by_callee(graph);

        for instance in self.threads.values_mut() {
            let Some(fork) = instance.fork else {
                continue;
            };
            let after_fork = graph.reachable([fork], kinds, Direction::Outgoing);
            let to_fork = graph.reachable([fork], kinds, Direction::Incoming);

            let on_cycle = graph
                .edges_directed(fork, Direction::Incoming, kinds)
                .any(|e| after_fork.contains(&e.source));
            if on_cycle {
                trace!(thread = %instance.id, fork = %fork, "Fork on a control-flow cycle");
                instance.dynamic = true;
            }
            if reached_repeatedly(graph, &call_sites, fork) {
                trace!(thread = %instance.id, fork = %fork, "Fork reached through several call sites");
                instance.dynamic = true;
            }

            let before_fork = to_fork
                .iter()
                .filter(|n| !after_fork.contains(*n))
                .copied()
                .collect();
            let after_join = match instance.join {
                Some(join) if !instance.dynamic => graph
                    .reachable([join], kinds, Direction::Outgoing)
                    .into_iter()
                    .filter(|n| !to_fork.contains(n))
                    .collect(),
                _ => FxHashSet::default(),
            };

            self.ordering.insert(
                instance.id,
                OrderingFacts {
                    before_fork,
                    after_join,
                },
            );
        }
    }

    fn propagate_dynamic(&mut self) {
        let ids: Vec<ThreadId> = self.threads.keys().copied().collect();
        for id in ids {
            let mut dynamic = false;
            let mut current = Some(id);
            let mut hops = 0;
            while let Some(t) = current {
                if self.threads.get(&t).is_some_and(|i| i.dynamic) {
                    dynamic = true;
                    break;
                }
                hops += 1;
                if hops > self.threads.len() {
                    break;
                }
                current = self.parents.get(&t).copied();
            }
            self.effectively_dynamic.insert(id, dynamic);
        }
    }
}

/// Callee procedure -> call sites with a call edge into it
fn call_sites_by_callee(graph: &SystemDependenceGraph) -> FxHashMap<ProcId, FxHashSet<NodeId>> {
    let mut sites: FxHashMap<ProcId, FxHashSet<NodeId>> = FxHashMap::default();
    for edge in graph.edges_of_kind(EdgeKindSet::of(&[EdgeKind::Call])) {
        if let Some(callee) = graph.node(edge.target) {
            sites.entry(callee.proc).or_default().insert(edge.source);
        }
    }
    sites
}

/// Whether `n` can execute more than once per run of the program entry:
/// some procedure on its caller chain has several call sites, or the chain
/// is recursive.
fn reached_repeatedly(
    graph: &SystemDependenceGraph,
    call_sites: &FxHashMap<ProcId, FxHashSet<NodeId>>,
    n: NodeId,
) -> bool {
    let Some(mut proc) = graph.node(n).map(|node| node.proc) else {
        return false;
    };
    let mut seen = FxHashSet::default();
    loop {
        if !seen.insert(proc) {
            return true;
        }
        let Some(sites) = call_sites.get(&proc) else {
            return false;
        };
        let mut callers = sites.iter().filter_map(|&site| graph.node(site));
        match (callers.next(), callers.next()) {
            (Some(caller), None) => proc = caller.proc,
            (None, _) => return false,
            (Some(_), Some(_)) => return true,
        }
    }
}

fn validate_registry(graph: &SystemDependenceGraph, specs: &[ThreadSpec]) -> Result<()> {
    let mut ids = FxHashSet::default();
    let mut forks = FxHashSet::default();

    for spec in specs {
        if spec.id.is_main() || !ids.insert(spec.id) {
            return Err(ConstructionError::DuplicateThread(spec.id).into());
        }
        for node in std::iter::once(spec.fork).chain(spec.join) {
            if !graph.contains(node) {
                return Err(ConstructionError::UnknownThreadNode {
                    thread: spec.id,
                    node,
                }
                .into());
            }
        }
        if !forks.insert(spec.fork) {
            return Err(ConstructionError::ForkSharedByThreads { fork: spec.fork }.into());
        }
    }

    let fork_edges = graph.edges_of_kind(EdgeKindSet::of(&[EdgeKind::Fork]));
    for edge in fork_edges {
        if !forks.contains(&edge.source) {
            return Err(ConstructionError::UnregisteredFork { node: edge.source }.into());
        }
    }

    Ok(())
}

fn fork_entries(graph: &SystemDependenceGraph, fork: NodeId) -> Vec<NodeId> {
    let mut entries: Vec<NodeId> = graph
        .edges_directed(fork, Direction::Outgoing, EdgeKindSet::of(&[EdgeKind::Fork]))
        .map(|e| e.target)
        .collect();
    entries.sort();
    entries.dedup();
    entries
}

fn compute_regions(
    graph: &SystemDependenceGraph,
    threads: &BTreeMap<ThreadId, ThreadInstance>,
) -> FxHashMap<NodeId, Vec<ThreadRegionId>> {
    let kinds = EdgeKindSet::control_flow_bearing();
    let mut regions: FxHashMap<NodeId, Vec<ThreadRegionId>> = FxHashMap::default();

    for instance in threads.values().filter(|i| !i.id.is_main()) {
        let region = ThreadRegionId::from(instance.id);
        for n in graph.reachable(instance.entries.iter().copied(), kinds, Direction::Outgoing) {
            regions.entry(n).or_default().push(region);
        }
    }

    let main_seeds: Vec<NodeId> = graph
        .nodes()
        .map(|n| n.id)
        .filter(|id| !regions.contains_key(id))
        .collect();
    let main = ThreadRegionId::from(ThreadId::MAIN);
    for n in graph.reachable(main_seeds, kinds, Direction::Outgoing) {
        regions.entry(n).or_default().push(main);
    }

    for list in regions.values_mut() {
        list.sort();
        list.dedup();
    }
    regions
}

fn check_unambiguous(
    specs: &[ThreadSpec],
    regions: &FxHashMap<NodeId, Vec<ThreadRegionId>>,
) -> Result<()> {
    for spec in specs {
        for node in std::iter::once(spec.fork).chain(spec.join) {
            if regions.get(&node).is_some_and(|r| r.len() > 1) {
                return Err(ConstructionError::AmbiguousThreadNode {
                    thread: spec.id,
                    node,
                }
                .into());
            }
        }
    }
    Ok(())
}

fn build_sync_index(graph: &SystemDependenceGraph) -> SyncIndex {
    let sync = EdgeKindSet::of(&[EdgeKind::SynchronizationDependence]);
    let mut index = SyncIndex::default();

    let sources: FxHashSet<NodeId> = graph.edges_of_kind(sync).map(|e| e.source).collect();
    for source in sources {
        let successors: Vec<NodeId> = graph
            .edges_directed(source, Direction::Outgoing, sync)
            .map(|e| e.target)
            .collect();
        let reach = graph.reachable(successors, sync, Direction::Outgoing);
        index.closure.insert(source, reach);
    }

    let control = EdgeKindSet::of(&[EdgeKind::ControlDependence]);
    for point in graph.nodes().filter(|n| n.kind == NodeKind::SyncPoint) {
        let mut visited = FxHashSet::default();
        let mut worklist = VecDeque::from([point.id]);
        while let Some(current) = worklist.pop_front() {
            for edge in graph.edges_directed(current, Direction::Outgoing, control) {
                let same_proc = graph
                    .node(edge.target)
                    .is_some_and(|t| t.proc == point.proc);
                if same_proc && edge.target != point.id && visited.insert(edge.target) {
                    worklist.push_back(edge.target);
                }
            }
        }
        for guarded in visited {
            index.guards.entry(guarded).or_default().push(point.id);
        }
    }

    index
}
