//! Slicing Ports

use crate::errors::Result;
use crate::features::slicing::domain::SliceDirection;
use crate::shared::models::{EdgeKindSet, NodeId};
use crate::shared::CancellationToken;
use std::collections::BTreeSet;

// ═══════════════════════════════════════════════════════════════════════════
// Slicer Port
// ═══════════════════════════════════════════════════════════════════════════

/// Slicer over an immutable graph. Each call keeps its own worklist, so one
/// slicer may serve several worker threads at once.
pub trait SlicerPort: Send + Sync {
    /// Edge kinds the slicer traverses
    fn edges(&self) -> EdgeKindSet;

    /// Slice from `seeds`, checking `cancel` once per worklist step.
    ///
    /// Fails only with `IfcError::Aborted`.
    fn slice_cancellable(
        &self,
        seeds: &[NodeId],
        direction: SliceDirection,
        cancel: &CancellationToken,
    ) -> Result<BTreeSet<NodeId>>;

    /// Slice from `seeds`. An empty seed set yields an empty slice.
    fn slice(&self, seeds: &[NodeId], direction: SliceDirection) -> BTreeSet<NodeId> {
        self.slice_cancellable(seeds, direction, &CancellationToken::new())
            .unwrap_or_default()
    }
}
