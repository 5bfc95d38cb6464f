//! JSON interchange of graphs and violation reports

mod common;

use codegraph_ifc::{
    ConstructionError, Criterion, IfcAnalysis, IfcError, MhpPrecision, NodeId, ProgramPart,
    SdgDto, SecurityLattice, Violation,
};
use common::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const INTERFERENCE_JSON: &str = r#"{
  "procedures": [
    { "id": 0, "name": "main" },
    { "id": 1, "name": "Worker.run" }
  ],
  "nodes": [
    { "id": 1, "kind": "call_site", "proc": 0, "label": "spawn" },
    { "id": 2, "kind": "normal", "proc": 1, "label": "Worker.secret" },
    { "id": 3, "kind": "normal", "proc": 0, "label": "Main.shared" },
    { "id": 4, "kind": "normal", "proc": 0, "label": "Main.print" }
  ],
  "edges": [
    { "source": 1, "target": 2, "kind": "fork" },
    { "source": 2, "target": 3, "kind": "thread_interference" },
    { "source": 3, "target": 4, "kind": "data_dependence" }
  ],
  "threads": [
    { "id": 1, "fork": 1 }
  ]
}"#;

fn annotate(analysis: &mut IfcAnalysis) {
    analysis
        .add_source_annotation(&ProgramPart::Field("Worker.secret".into()), "HIGH")
        .unwrap();
    analysis
        .add_sink_annotation(&ProgramPart::Statement("Main.print".into()), "LOW")
        .unwrap();
}

#[test]
fn test_json_graph_matches_built_graph() {
    let mut from_json = IfcAnalysis::from_json(INTERFERENCE_JSON, SecurityLattice::two_point()).unwrap();
    annotate(&mut from_json);
    let built = interference_analysis(false);

    for criterion in Criterion::ALL {
        assert_eq!(
            from_json.check(criterion, Some(MhpPrecision::Simple)).unwrap(),
            built.check(criterion, Some(MhpPrecision::Simple)).unwrap(),
            "{criterion}"
        );
    }
}

#[test]
fn test_exported_graph_round_trips() {
    let analysis = interference_analysis(true);
    let dto = analysis.graph().to_dto(analysis.threads());
    let json = dto.to_json().unwrap();
    assert_eq!(SdgDto::from_json(&json).unwrap(), dto);

    let mut reloaded = IfcAnalysis::from_json(&json, SecurityLattice::two_point()).unwrap();
    annotate(&mut reloaded);
    assert_eq!(reloaded.graph().node_count(), analysis.graph().node_count());
    assert_eq!(reloaded.graph().edge_count(), analysis.graph().edge_count());
    assert_eq!(reloaded.threads().specs(), analysis.threads().specs());
    assert_eq!(
        reloaded
            .check(Criterion::LsodTimingSensitive, Some(MhpPrecision::Precise))
            .unwrap(),
        analysis
            .check(Criterion::LsodTimingSensitive, Some(MhpPrecision::Precise))
            .unwrap()
    );
}

#[test]
fn test_violation_report_serializes() {
    let analysis = interference_analysis(false);
    let violations = analysis
        .check(Criterion::LsodBasic, Some(MhpPrecision::Simple))
        .unwrap();
    let json = serde_json::to_string(&violations).unwrap();
    assert!(json.contains("\"LSOD_BASIC\""));
    assert!(json.contains("\"HIGH\""));

    let parsed: BTreeSet<Violation> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, violations);
}

#[test]
fn test_malformed_json_rejected() {
    let err = IfcAnalysis::from_json("{ \"nodes\": ", SecurityLattice::two_point()).unwrap_err();
    assert!(matches!(err, IfcError::Serialization(_)), "{err}");
}

#[test]
fn test_dangling_edge_rejected() {
    let json = INTERFERENCE_JSON.replace(
        r#"{ "source": 3, "target": 4, "kind": "data_dependence" }"#,
        r#"{ "source": 3, "target": 99, "kind": "data_dependence" }"#,
    );
    let err = IfcAnalysis::from_json(&json, SecurityLattice::two_point()).unwrap_err();
    assert!(
        matches!(
            err,
            IfcError::Construction(ConstructionError::DanglingEdge { to: NodeId(99), .. })
        ),
        "{err}"
    );
}

#[test]
fn test_unregistered_fork_rejected() {
    let json = INTERFERENCE_JSON.replace(r#"{ "id": 1, "fork": 1 }"#, "");
    let err = IfcAnalysis::from_json(&json, SecurityLattice::two_point()).unwrap_err();
    assert!(
        matches!(
            err,
            IfcError::Construction(ConstructionError::UnregisteredFork { node: NodeId(1) })
        ),
        "{err}"
    );
}
