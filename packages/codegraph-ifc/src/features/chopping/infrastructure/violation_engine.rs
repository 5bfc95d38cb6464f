//! Lattice verdicts on chops
//!
//! A pair with an empty chop is never a violation. A pair with a non-empty
//! chop is one unless the source level flows to the sink level; incomparable
//! levels are reported as their own kind.

use super::chopper::Chopper;
use crate::features::chopping::domain::ViolationKind;
use crate::features::lattice::{Level, SecurityLattice};
use crate::shared::models::NodeId;

#[derive(Clone, Copy)]
pub struct ViolationEngine<'a> {
    chopper: Chopper<'a>,
    lattice: &'a SecurityLattice,
}

impl<'a> ViolationEngine<'a> {
    pub fn new(chopper: Chopper<'a>, lattice: &'a SecurityLattice) -> Self {
        ViolationEngine { chopper, lattice }
    }

    /// Verdict on the levels alone; `None` when the flow is permitted
    pub fn evaluate(&self, source_level: &Level, sink_level: &Level) -> Option<ViolationKind> {
        ViolationKind::from_comparison(self.lattice.compare(source_level, sink_level))
    }

    /// Verdict on a (source, sink) pair: needs a dependence path and a
    /// failing level comparison
    pub fn check_pair(
        &self,
        source: NodeId,
        source_level: &Level,
        sink: NodeId,
        sink_level: &Level,
    ) -> Option<ViolationKind> {
        let kind = self.evaluate(source_level, sink_level)?;
        if self.chopper.chop(&[source], &[sink]).is_empty() {
            return None;
        }
        Some(kind)
    }

    pub fn is_illegal_flow(
        &self,
        source: NodeId,
        source_level: &Level,
        sink: NodeId,
        sink_level: &Level,
    ) -> bool {
        self.check_pair(source, source_level, sink, sink_level).is_some()
    }
}
