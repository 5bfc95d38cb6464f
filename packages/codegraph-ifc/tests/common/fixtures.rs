//! Test fixtures
//!
//! Small dependence graphs with known answers.

use super::builders::GraphBuilder;
use codegraph_ifc::{EdgeKind, IfcAnalysis, NodeKind, ProgramPart, SecurityLattice};

pub const F: u32 = 1;
pub const A: u32 = 2;
pub const B: u32 = 3;
pub const C: u32 = 4;

/// F (main) forks a thread entering at A. A reaches B only through thread
/// interference, B reaches C through data dependence.
///
/// ```text
///   main:  F ──fork──▶ A (thread 1)
///          B ──DD──▶ C
///   A ──ID──▶ B
/// ```
pub fn interference_graph(synchronized: bool) -> GraphBuilder {
    let b = GraphBuilder::new()
        .proc(0, "main")
        .proc(1, "Worker.run")
        .labelled(F, NodeKind::CallSite, 0, "spawn")
        .labelled(A, NodeKind::Normal, 1, "Worker.secret")
        .labelled(B, NodeKind::Normal, 0, "Main.shared")
        .labelled(C, NodeKind::Normal, 0, "Main.print")
        .thread(1, F, A, None)
        .edge(A, B, EdgeKind::ThreadInterference)
        .edge(B, C, EdgeKind::DataDependence);
    if synchronized {
        b.edge(A, C, EdgeKind::SynchronizationDependence)
    } else {
        b
    }
}

/// Interference graph with A annotated HIGH source and C annotated LOW sink
pub fn interference_analysis(synchronized: bool) -> IfcAnalysis {
    let mut analysis = interference_graph(synchronized).analysis(SecurityLattice::two_point());
    analysis
        .add_source_annotation(&ProgramPart::Field("Worker.secret".into()), "HIGH")
        .expect("source resolves");
    analysis
        .add_sink_annotation(&ProgramPart::Statement("Main.print".into()), "LOW")
        .expect("sink resolves");
    analysis
}

/// Two call sites of `Util.id(x)` in main.
///
/// ```text
///   10 secret ─DD─▶ 12 ain1 ─PI─▶ 31 fin ─DD─▶ 32 fout ─PO─▶ 13 aout1 ─DD─▶ 14 print
///   20 public ─DD─▶ 22 ain2 ─PI─▶ 31                  32 ─PO─▶ 23 aout2 ─DD─▶ 24 log
/// ```
///
/// Call sites are 11 and 21, the callee entry is 30.
pub fn two_call_sites() -> GraphBuilder {
    GraphBuilder::new()
        .proc(0, "Main.main")
        .proc(1, "Util.id")
        .labelled(10, NodeKind::Normal, 0, "secret")
        .node(11, NodeKind::CallSite, 0)
        .node(12, NodeKind::ActualIn, 0)
        .node(13, NodeKind::ActualOut, 0)
        .labelled(14, NodeKind::Normal, 0, "print")
        .labelled(20, NodeKind::Normal, 0, "public")
        .node(21, NodeKind::CallSite, 0)
        .node(22, NodeKind::ActualIn, 0)
        .node(23, NodeKind::ActualOut, 0)
        .labelled(24, NodeKind::Normal, 0, "log")
        .node(30, NodeKind::Entry, 1)
        .node(31, NodeKind::FormalIn, 1)
        .node(32, NodeKind::FormalOut, 1)
        .edge(11, 12, EdgeKind::ControlDependence)
        .edge(11, 13, EdgeKind::ControlDependence)
        .edge(21, 22, EdgeKind::ControlDependence)
        .edge(21, 23, EdgeKind::ControlDependence)
        .edge(11, 30, EdgeKind::Call)
        .edge(21, 30, EdgeKind::Call)
        .edge(12, 31, EdgeKind::ParameterIn)
        .edge(22, 31, EdgeKind::ParameterIn)
        .edge(32, 13, EdgeKind::ParameterOut)
        .edge(32, 23, EdgeKind::ParameterOut)
        .edge(12, 13, EdgeKind::Summary)
        .edge(22, 23, EdgeKind::Summary)
        .edge(30, 31, EdgeKind::ControlDependence)
        .edge(30, 32, EdgeKind::ControlDependence)
        .edge(31, 32, EdgeKind::DataDependence)
        .edge(10, 12, EdgeKind::DataDependence)
        .edge(20, 22, EdgeKind::DataDependence)
        .edge(13, 14, EdgeKind::DataDependence)
        .edge(23, 24, EdgeKind::DataDependence)
}

/// A secret travels through two interference hops, each entered and left
/// through a different procedure than the one the previous hop ended in.
///
/// ```text
///   main:   1 secret ─DD─▶ 3 ain ─PI─▶ f: 11 fin ─DD─▶ 12 w1
///   worker: 41 r1 ─DD─▶ 42 fout ─PO─▶ run: 32 aout ─DD─▶ 34 ain ─PI─▶ k: 51 fin ─DD─▶ 52 w2
///   main:   21 r2 ─DD─▶ 22 fout ─PO─▶ 7 aout ─DD─▶ 8 print
///   12 ─ID─▶ 41, 52 ─ID─▶ 21
/// ```
///
/// Main calls `f` at 2 and `h` at 6 and forks the worker at 5. The worker
/// (`run`, entry 30) calls `g` at 31 and `k` at 33.
pub fn two_hop_interference() -> GraphBuilder {
    GraphBuilder::new()
        .proc(0, "Main.main")
        .proc(1, "Main.f")
        .proc(2, "Main.h")
        .proc(3, "Worker.run")
        .proc(4, "Worker.g")
        .proc(5, "Worker.k")
        // main
        .labelled(1, NodeKind::Normal, 0, "secret")
        .node(2, NodeKind::CallSite, 0)
        .node(3, NodeKind::ActualIn, 0)
        .labelled(5, NodeKind::Normal, 0, "spawn")
        .node(6, NodeKind::CallSite, 0)
        .node(7, NodeKind::ActualOut, 0)
        .labelled(8, NodeKind::Normal, 0, "print")
        .edge(2, 3, EdgeKind::ControlDependence)
        .edge(6, 7, EdgeKind::ControlDependence)
        .edge(1, 3, EdgeKind::DataDependence)
        .edge(7, 8, EdgeKind::DataDependence)
        .chain(&[1, 2, 5, 6, 8], EdgeKind::ControlFlow)
        // f(x) writes w1
        .node(10, NodeKind::Entry, 1)
        .node(11, NodeKind::FormalIn, 1)
        .labelled(12, NodeKind::Normal, 1, "w1")
        .edge(10, 11, EdgeKind::ControlDependence)
        .edge(10, 12, EdgeKind::ControlDependence)
        .edge(11, 12, EdgeKind::DataDependence)
        .edge(2, 10, EdgeKind::Call)
        .edge(3, 11, EdgeKind::ParameterIn)
        // h() returns r2
        .node(20, NodeKind::Entry, 2)
        .labelled(21, NodeKind::Normal, 2, "r2")
        .node(22, NodeKind::FormalOut, 2)
        .edge(20, 21, EdgeKind::ControlDependence)
        .edge(20, 22, EdgeKind::ControlDependence)
        .edge(21, 22, EdgeKind::DataDependence)
        .edge(6, 20, EdgeKind::Call)
        .edge(22, 7, EdgeKind::ParameterOut)
        // worker run: k(g())
        .node(30, NodeKind::Entry, 3)
        .node(31, NodeKind::CallSite, 3)
        .node(32, NodeKind::ActualOut, 3)
        .node(33, NodeKind::CallSite, 3)
        .node(34, NodeKind::ActualIn, 3)
        .edge(30, 31, EdgeKind::ControlDependence)
        .edge(30, 33, EdgeKind::ControlDependence)
        .edge(31, 32, EdgeKind::ControlDependence)
        .edge(33, 34, EdgeKind::ControlDependence)
        .edge(32, 34, EdgeKind::DataDependence)
        // g() returns r1
        .node(40, NodeKind::Entry, 4)
        .labelled(41, NodeKind::Normal, 4, "r1")
        .node(42, NodeKind::FormalOut, 4)
        .edge(40, 41, EdgeKind::ControlDependence)
        .edge(40, 42, EdgeKind::ControlDependence)
        .edge(41, 42, EdgeKind::DataDependence)
        .edge(31, 40, EdgeKind::Call)
        .edge(42, 32, EdgeKind::ParameterOut)
        // k(x) writes w2
        .node(50, NodeKind::Entry, 5)
        .node(51, NodeKind::FormalIn, 5)
        .labelled(52, NodeKind::Normal, 5, "w2")
        .edge(50, 51, EdgeKind::ControlDependence)
        .edge(50, 52, EdgeKind::ControlDependence)
        .edge(51, 52, EdgeKind::DataDependence)
        .edge(33, 50, EdgeKind::Call)
        .edge(34, 51, EdgeKind::ParameterIn)
        // threads
        .thread(1, 5, 30, None)
        .edge(12, 41, EdgeKind::ThreadInterference)
        .edge(52, 21, EdgeKind::ThreadInterference)
}

/// `start` forks the worker and is called twice from main, so the read at 3
/// sits between two spawns.
///
/// ```text
///   main:   1 ─▶ 2 call start ─▶ 3 print ─▶ 4 call start ─▶ 5
///   start:  10 ─▶ 11 spawn ──fork──▶ 20 secret
///   20 ─ID─▶ 3
/// ```
pub fn fork_in_shared_callee() -> GraphBuilder {
    GraphBuilder::new()
        .proc(0, "Main.main")
        .proc(1, "Main.start")
        .proc(2, "Worker.run")
        .node(1, NodeKind::Normal, 0)
        .node(2, NodeKind::CallSite, 0)
        .labelled(3, NodeKind::Normal, 0, "Main.print")
        .node(4, NodeKind::CallSite, 0)
        .node(5, NodeKind::Normal, 0)
        .chain(&[1, 2, 3, 4, 5], EdgeKind::ControlFlow)
        .node(10, NodeKind::Entry, 1)
        .labelled(11, NodeKind::Normal, 1, "spawn")
        .edge(10, 11, EdgeKind::ControlFlow)
        .edge(2, 10, EdgeKind::Call)
        .edge(4, 10, EdgeKind::Call)
        .labelled(20, NodeKind::Normal, 2, "Worker.secret")
        .thread(1, 11, 20, None)
        .edge(20, 3, EdgeKind::ThreadInterference)
}
