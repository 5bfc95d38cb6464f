//! Interprocedural slicing precision across slicing modes, including
//! context handling across thread interference

mod common;

use codegraph_ifc::{
    AccessPair, ContextSlicer, Criterion, EdgeKind, EdgeKindSet, IfcConfig, MhpPrecision, NodeId,
    NodeKind, ProgramPart, SecurityLattice, SliceDirection, SliceMode, SlicerPort,
};
use common::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const REALIZABLE_MODES: [SliceMode; 2] = [SliceMode::ContextSensitive, SliceMode::Summary];

fn set(raw: &[u32]) -> BTreeSet<NodeId> {
    ids(raw).into_iter().collect()
}

#[test]
fn test_backward_slice_stays_with_matching_caller() {
    let (graph, _) = two_call_sites().build();
    for mode in REALIZABLE_MODES {
        let slicer = ContextSlicer::new(&graph, EdgeKindSet::sequential(), mode, 8);
        let slice = slicer.slice(&[NodeId(14)], SliceDirection::Backward);
        assert_eq!(slice, set(&[10, 11, 12, 13, 14, 30, 31, 32]), "{mode}");
    }
}

#[test]
fn test_forward_slice_returns_to_matching_caller() {
    let (graph, _) = two_call_sites().build();
    for mode in REALIZABLE_MODES {
        let slicer = ContextSlicer::new(&graph, EdgeKindSet::sequential(), mode, 8);
        let slice = slicer.slice(&[NodeId(10)], SliceDirection::Forward);
        assert_eq!(slice, set(&[10, 12, 13, 14, 31, 32]), "{mode}");
    }
}

#[test]
fn test_insensitive_slice_mixes_callers() {
    let (graph, _) = two_call_sites().build();
    let slicer = ContextSlicer::new(
        &graph,
        EdgeKindSet::sequential(),
        SliceMode::ContextInsensitive,
        8,
    );
    let slice = slicer.slice(&[NodeId(14)], SliceDirection::Backward);
    assert_eq!(slice, set(&[10, 11, 12, 13, 14, 20, 21, 22, 30, 31, 32]));
}

#[test]
fn test_insensitive_mode_is_a_superset() {
    let (graph, _) = two_call_sites().build();
    let loose = ContextSlicer::new(&graph, EdgeKindSet::sequential(), SliceMode::ContextInsensitive, 8);
    for mode in REALIZABLE_MODES {
        let tight = ContextSlicer::new(&graph, EdgeKindSet::sequential(), mode, 8);
        for id in [10, 14, 24, 31, 32] {
            for direction in [SliceDirection::Forward, SliceDirection::Backward] {
                let precise = tight.slice(&[NodeId(id)], direction);
                let coarse = loose.slice(&[NodeId(id)], direction);
                assert!(precise.is_subset(&coarse), "{mode} {direction} n{id}");
            }
        }
    }
}

fn annotated(mode: SliceMode) -> codegraph_ifc::IfcAnalysis {
    let mut analysis = two_call_sites()
        .analysis(SecurityLattice::two_point())
        .with_config(IfcConfig::default().slicing(|s| s.mode(mode)))
        .unwrap();
    analysis
        .add_source_annotation(&ProgramPart::Field("secret".into()), "HIGH")
        .unwrap();
    for sink in ["print", "log"] {
        analysis
            .add_sink_annotation(&ProgramPart::Statement(sink.into()), "LOW")
            .unwrap();
    }
    analysis
}

#[test]
fn test_unrealizable_leak_not_reported() {
    for mode in REALIZABLE_MODES {
        let violations = annotated(mode).check(Criterion::SequentialNi, None).unwrap();
        assert_violation_pairs(&violations, &[(10, 14)]);
        assert_eq!(violations.iter().next().unwrap().path, ids(&[10, 12, 13, 14]));
    }
}

#[test]
fn test_insensitive_mode_reports_spurious_leak() {
    let violations = annotated(SliceMode::ContextInsensitive)
        .check(Criterion::SequentialNi, None)
        .unwrap();
    assert_violation_pairs(&violations, &[(10, 14), (10, 24)]);
}

/// `rec(x)` calls itself with its own parameter and returns its own result
fn recursive_program() -> GraphBuilder {
    GraphBuilder::new()
        .proc(0, "main")
        .proc(1, "rec")
        .labelled(10, NodeKind::Normal, 0, "secret")
        .node(11, NodeKind::CallSite, 0)
        .node(12, NodeKind::ActualIn, 0)
        .node(13, NodeKind::ActualOut, 0)
        .labelled(14, NodeKind::Normal, 0, "print")
        .node(30, NodeKind::Entry, 1)
        .node(31, NodeKind::FormalIn, 1)
        .node(32, NodeKind::FormalOut, 1)
        .node(33, NodeKind::CallSite, 1)
        .node(34, NodeKind::ActualIn, 1)
        .node(35, NodeKind::ActualOut, 1)
        .edge(11, 12, EdgeKind::ControlDependence)
        .edge(11, 13, EdgeKind::ControlDependence)
        .edge(33, 34, EdgeKind::ControlDependence)
        .edge(33, 35, EdgeKind::ControlDependence)
        .edge(11, 30, EdgeKind::Call)
        .edge(33, 30, EdgeKind::Call)
        .edge(12, 31, EdgeKind::ParameterIn)
        .edge(34, 31, EdgeKind::ParameterIn)
        .edge(32, 13, EdgeKind::ParameterOut)
        .edge(32, 35, EdgeKind::ParameterOut)
        .edge(12, 13, EdgeKind::Summary)
        .edge(34, 35, EdgeKind::Summary)
        .edge(30, 33, EdgeKind::ControlDependence)
        .edge(31, 34, EdgeKind::DataDependence)
        .edge(35, 32, EdgeKind::DataDependence)
        .edge(31, 32, EdgeKind::DataDependence)
        .edge(10, 12, EdgeKind::DataDependence)
        .edge(13, 14, EdgeKind::DataDependence)
}

#[test]
fn test_recursion_terminates_at_every_depth() {
    let (graph, _) = recursive_program().build();
    for depth in [1, 2, 8, 64] {
        for mode in [
            SliceMode::ContextSensitive,
            SliceMode::Summary,
            SliceMode::ContextInsensitive,
        ] {
            let slicer = ContextSlicer::new(&graph, EdgeKindSet::sequential(), mode, depth);
            let backward = slicer.slice(&[NodeId(14)], SliceDirection::Backward);
            assert!(backward.contains(&NodeId(10)), "{mode} depth {depth}");
            let forward = slicer.slice(&[NodeId(10)], SliceDirection::Forward);
            assert!(forward.contains(&NodeId(14)), "{mode} depth {depth}");
        }
    }
}

const ALL_MODES: [SliceMode; 3] = [
    SliceMode::ContextSensitive,
    SliceMode::Summary,
    SliceMode::ContextInsensitive,
];

#[test]
fn test_interference_hop_forgets_calling_context() {
    let (graph, _) = two_hop_interference().build();
    for mode in ALL_MODES {
        let slicer = ContextSlicer::new(&graph, EdgeKindSet::concurrent(), mode, 8);
        let forward = slicer.slice(&[NodeId(1)], SliceDirection::Forward);
        assert!(forward.is_superset(&set(&[12, 41, 32, 52, 21, 7, 8])), "{mode}");
        let backward = slicer.slice(&[NodeId(8)], SliceDirection::Backward);
        assert!(backward.is_superset(&set(&[1, 3, 12, 41, 34, 52, 21])), "{mode}");
    }
}

#[test]
fn test_two_hop_concurrent_leak_found_in_every_mode() {
    for mode in ALL_MODES {
        let mut analysis = two_hop_interference()
            .analysis(SecurityLattice::two_point())
            .with_config(IfcConfig::default().slicing(|s| s.mode(mode)))
            .unwrap();
        analysis
            .add_source_annotation(&ProgramPart::Statement("secret".into()), "HIGH")
            .unwrap();
        analysis
            .add_sink_annotation(&ProgramPart::Statement("print".into()), "LOW")
            .unwrap();

        assert!(!analysis.chop(&[NodeId(1)], &[NodeId(8)], Criterion::LsodBasic).is_empty(), "{mode}");
        assert!(analysis.check(Criterion::SequentialNi, None).unwrap().is_empty(), "{mode}");

        let violations = analysis
            .check(Criterion::LsodBasic, Some(MhpPrecision::Simple))
            .unwrap();
        assert_violation_pairs(&violations, &[(1, 8)]);
        let violation = violations.iter().next().unwrap();
        assert_eq!(violation.witness, Some(AccessPair::new(NodeId(52), NodeId(8))));
        assert_eq!(
            violation.path,
            ids(&[1, 3, 11, 12, 41, 42, 32, 34, 51, 52, 21, 22, 7, 8])
        );
    }
}
