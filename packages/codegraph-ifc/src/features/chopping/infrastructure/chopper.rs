//! Chopping over a slicer

use crate::errors::Result;
use crate::features::slicing::{SliceDirection, SlicerPort};
use crate::shared::models::NodeId;
use crate::shared::CancellationToken;
use std::collections::BTreeSet;

#[derive(Clone, Copy)]
pub struct Chopper<'a> {
    slicer: &'a dyn SlicerPort,
}

impl<'a> Chopper<'a> {
    pub fn new(slicer: &'a dyn SlicerPort) -> Self {
        Chopper { slicer }
    }

    /// Nodes on some dependence path from `sources` to `sinks`
    pub fn chop(&self, sources: &[NodeId], sinks: &[NodeId]) -> BTreeSet<NodeId> {
        self.chop_cancellable(sources, sinks, &CancellationToken::new())
            .unwrap_or_default()
    }

    pub fn chop_cancellable(
        &self,
        sources: &[NodeId],
        sinks: &[NodeId],
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<NodeId>> {
        if sources.is_empty() || sinks.is_empty() {
            return Ok(BTreeSet::new());
        }
        let forward = self
            .slicer
            .slice_cancellable(sources, SliceDirection::Forward, cancel)?;
        let backward = self
            .slicer
            .slice_cancellable(sinks, SliceDirection::Backward, cancel)?;
        Ok(intersect(&forward, &backward))
    }
}

pub(crate) fn intersect(a: &BTreeSet<NodeId>, b: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|n| large.contains(n)).copied().collect()
}
