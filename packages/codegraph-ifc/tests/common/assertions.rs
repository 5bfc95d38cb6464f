//! Custom assertions for violation sets

use codegraph_ifc::{NodeId, Violation};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

/// Assert the exact set of reported (source, sink) pairs
pub fn assert_violation_pairs(violations: &BTreeSet<Violation>, expected: &[(u32, u32)]) {
    let actual: BTreeSet<(NodeId, NodeId)> = violations.iter().map(|v| (v.source, v.sink)).collect();
    let expected: BTreeSet<(NodeId, NodeId)> = expected
        .iter()
        .map(|&(s, t)| (NodeId(s), NodeId(t)))
        .collect();
    assert_eq!(actual, expected, "violations: {violations:#?}");
}

pub fn ids(raw: &[u32]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId).collect()
}
