//! Test data builders

use codegraph_ifc::{
    EdgeKind, IfcAnalysis, Node, NodeId, NodeKind, ProcId, SdgBuilder, SecurityLattice,
    SystemDependenceGraph, ThreadId, ThreadModel, ThreadSpec,
};

/// Terse graph builder: plain `u32` ids, labels default to `n<id>`
#[derive(Debug, Default)]
pub struct GraphBuilder {
    inner: SdgBuilder,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proc(mut self, id: u32, name: &str) -> Self {
        self.inner.add_procedure(ProcId(id), name);
        self
    }

    pub fn node(mut self, id: u32, kind: NodeKind, proc: u32) -> Self {
        self.inner
            .add_node(Node::new(NodeId(id), kind, ProcId(proc)).with_label(format!("n{id}")));
        self
    }

    pub fn nodes(self, ids: &[u32], kind: NodeKind, proc: u32) -> Self {
        ids.iter().fold(self, |b, &id| b.node(id, kind, proc))
    }

    pub fn labelled(mut self, id: u32, kind: NodeKind, proc: u32, label: &str) -> Self {
        self.inner
            .add_node(Node::new(NodeId(id), kind, ProcId(proc)).with_label(label));
        self
    }

    pub fn edge(mut self, from: u32, to: u32, kind: EdgeKind) -> Self {
        self.inner.add_edge(NodeId(from), NodeId(to), kind);
        self
    }

    pub fn chain(self, ids: &[u32], kind: EdgeKind) -> Self {
        ids.windows(2)
            .fold(self, |b, w| b.edge(w[0], w[1], kind))
    }

    /// Thread `id` forked at `fork`, entering at `entry`
    pub fn thread(mut self, id: u32, fork: u32, entry: u32, join: Option<u32>) -> Self {
        self.inner.add_edge(NodeId(fork), NodeId(entry), EdgeKind::Fork);
        let spec = ThreadSpec::new(ThreadId(id), NodeId(fork));
        self.inner.add_thread(match join {
            Some(j) => spec.joined_at(NodeId(j)),
            None => spec,
        });
        self
    }

    pub fn dynamic_thread(mut self, id: u32, fork: u32, entry: u32) -> Self {
        self.inner.add_edge(NodeId(fork), NodeId(entry), EdgeKind::Fork);
        self.inner
            .add_thread(ThreadSpec::new(ThreadId(id), NodeId(fork)).as_dynamic());
        self
    }

    pub fn into_inner(self) -> SdgBuilder {
        self.inner
    }

    pub fn build(self) -> (SystemDependenceGraph, ThreadModel) {
        self.inner.build().expect("fixture graph must be well formed")
    }

    pub fn analysis(self, lattice: SecurityLattice) -> IfcAnalysis {
        IfcAnalysis::from_builder(self.inner, lattice).expect("fixture graph must be well formed")
    }
}
