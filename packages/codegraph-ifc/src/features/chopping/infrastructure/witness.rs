//! Witness paths

use crate::features::sdg::SystemDependenceGraph;
use crate::shared::models::{EdgeKindSet, NodeId};
use petgraph::Direction;
use rustc_hash::FxHashMap;
use std::collections::{BTreeSet, VecDeque};

/// Shortest path `from -> to` over `edges`, staying inside `within`.
///
/// Neighbours are expanded in id order, so ties resolve to the lowest ids.
/// Empty when no such path exists.
pub fn shortest_path(
    graph: &SystemDependenceGraph,
    edges: EdgeKindSet,
    within: &BTreeSet<NodeId>,
    from: NodeId,
    to: NodeId,
) -> Vec<NodeId> {
    if !within.contains(&from) || !within.contains(&to) {
        return Vec::new();
    }

    let mut parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut worklist = VecDeque::from([from]);
    parent.insert(from, from);

    while let Some(current) = worklist.pop_front() {
        if current == to {
            let mut path = vec![to];
            let mut step = to;
            while let Some(&prev) = parent.get(&step) {
                if prev == step {
                    break;
                }
                path.push(prev);
                step = prev;
            }
            path.reverse();
            return path;
        }

        let mut next: Vec<NodeId> = graph
            .edges_directed(current, Direction::Outgoing, edges)
            .map(|e| e.target)
            .filter(|t| within.contains(t) && !parent.contains_key(t))
            .collect();
        next.sort();
        next.dedup();
        for n in next {
            parent.insert(n, current);
            worklist.push_back(n);
        }
    }

    Vec::new()
}
