//! Concurrency ports

use super::domain::MhpPrecision;
use crate::shared::models::{NodeId, ThreadRegionId};

/// May-happen-in-parallel oracle.
///
/// Queries are pure functions of an immutable model and may be issued from
/// several worker threads at once.
pub trait MhpPort: Send + Sync {
    /// Whether `n1` and `n2` can execute concurrently at `precision`.
    fn may_happen_in_parallel(&self, n1: NodeId, n2: NodeId, precision: MhpPrecision) -> bool;

    /// Thread regions containing `n` (empty for unknown nodes)
    fn thread_regions_of(&self, n: NodeId) -> &[ThreadRegionId];

    /// Whether two nodes share at least one thread region
    fn share_region(&self, n1: NodeId, n2: NodeId) -> bool {
        let r2 = self.thread_regions_of(n2);
        self.thread_regions_of(n1).iter().any(|r| r2.contains(r))
    }
}
