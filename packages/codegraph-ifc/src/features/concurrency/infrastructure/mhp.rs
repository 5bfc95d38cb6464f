//! May-happen-in-parallel queries
//!
//! Two nodes may run in parallel if some pair of their thread regions is not
//! provably sequential. For regions `a` of `n1` and `b` of `n2`:
//!
//! - `a == b`: parallel only if the thread runs as several instances
//! - `a` ancestor of `b` (through child `c` of `a`): parallel when `a` or `c`
//!   runs as several instances; otherwise sequential when `n1` precedes the
//!   fork of `c`, or when `b == c` and `n1` follows its join
//! - siblings: sequential when one is forked after the other is joined
//! - anything else: parallel
//!
//! Precise MHP additionally drops pairs connected through synchronization
//! dependence, so it never answers `true` where simple answers `false`.

use super::thread_model::ThreadModel;
use crate::features::concurrency::domain::MhpPrecision;
use crate::features::concurrency::ports::MhpPort;
use crate::shared::models::{NodeId, ThreadId, ThreadRegionId};

impl ThreadModel {
    pub fn may_happen_in_parallel(&self, n1: NodeId, n2: NodeId, precision: MhpPrecision) -> bool {
        match precision {
            MhpPrecision::None => false,
            MhpPrecision::Simple => self.simple_mhp(n1, n2),
            MhpPrecision::Precise => self.simple_mhp(n1, n2) && !self.synchronized(n1, n2),
        }
    }

    /// Whether a chain of synchronization edges orders `n1` and `n2` (in
    /// either direction), directly or through the sync points guarding them.
    pub fn synchronized(&self, n1: NodeId, n2: NodeId) -> bool {
        let anchors1 = self.anchors(n1);
        let anchors2 = self.anchors(n2);
        anchors1.iter().any(|a| {
            anchors2
                .iter()
                .any(|b| self.sync_reaches(*a, *b) || self.sync_reaches(*b, *a))
        })
    }

    fn simple_mhp(&self, n1: NodeId, n2: NodeId) -> bool {
        let regions2 = self.thread_regions_of(n2);
        self.thread_regions_of(n1).iter().any(|&a| {
            regions2
                .iter()
                .any(|&b| self.regions_concurrent(a, n1, b, n2))
        })
    }

    fn regions_concurrent(
        &self,
        a: ThreadRegionId,
        n_a: NodeId,
        b: ThreadRegionId,
        n_b: NodeId,
    ) -> bool {
        let (a, b) = (ThreadId::from(a), ThreadId::from(b));

        if a == b {
            return self.is_dynamic(a);
        }
        if let Some(child) = self.child_towards(a, b) {
            return self.concurrent_with_descendant(a, n_a, b, child);
        }
        if let Some(child) = self.child_towards(b, a) {
            return self.concurrent_with_descendant(b, n_b, a, child);
        }
        match (self.parent_of(a), self.parent_of(b)) {
            (Some(pa), Some(pb)) if pa == pb && !self.is_dynamic(pa) => {
                !(self.forks_after_join(a, b) || self.forks_after_join(b, a))
            }
            _ => true,
        }
    }

    /// `n` runs in `ancestor`; `child` is the thread forked by `ancestor` on
    /// the way down to `descendant`.
    fn concurrent_with_descendant(
        &self,
        ancestor: ThreadId,
        n: NodeId,
        descendant: ThreadId,
        child: ThreadId,
    ) -> bool {
        if self.is_dynamic(ancestor) || self.is_dynamic(child) {
            return true;
        }
        let Some(facts) = self.ordering.get(&child) else {
            return true;
        };
        let before_fork = facts.before_fork.contains(&n);
        let after_join = descendant == child && facts.after_join.contains(&n);
        !(before_fork || after_join)
    }

    /// Whether `later` is forked after `earlier` has been joined
    fn forks_after_join(&self, earlier: ThreadId, later: ThreadId) -> bool {
        match (self.ordering.get(&earlier), self.fork_of(later)) {
            (Some(facts), Some(fork)) => facts.after_join.contains(&fork),
            _ => false,
        }
    }

    /// Child of `ancestor` on the parent chain of `descendant`
    fn child_towards(&self, ancestor: ThreadId, descendant: ThreadId) -> Option<ThreadId> {
        let mut current = descendant;
        for _ in 0..self.threads.len() {
            let parent = self.parent_of(current)?;
            if parent == ancestor {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    fn anchors(&self, n: NodeId) -> Vec<NodeId> {
        let mut anchors = vec![n];
        if let Some(guards) = self.sync.guards.get(&n) {
            anchors.extend(guards.iter().copied());
        }
        anchors
    }

    fn sync_reaches(&self, from: NodeId, to: NodeId) -> bool {
        self.sync
            .closure
            .get(&from)
            .is_some_and(|reach| reach.contains(&to))
    }
}

impl MhpPort for ThreadModel {
    fn may_happen_in_parallel(&self, n1: NodeId, n2: NodeId, precision: MhpPrecision) -> bool {
        ThreadModel::may_happen_in_parallel(self, n1, n2, precision)
    }

    fn thread_regions_of(&self, n: NodeId) -> &[ThreadRegionId] {
        ThreadModel::thread_regions_of(self, n)
    }
}
