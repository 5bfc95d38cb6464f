//! Concurrency domain models

use crate::shared::models::{NodeId, ThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thread registration delivered by the front end.
///
/// The main thread is implicit and never registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSpec {
    pub id: ThreadId,
    /// Node that spawns the thread; `Fork` edges leave it
    pub fork: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<NodeId>,
    /// Spawned possibly many times (e.g. inside a loop)
    #[serde(default)]
    pub dynamic: bool,
}

impl ThreadSpec {
    pub fn new(id: ThreadId, fork: NodeId) -> Self {
        ThreadSpec {
            id,
            fork,
            join: None,
            dynamic: false,
        }
    }

    pub fn joined_at(mut self, join: NodeId) -> Self {
        self.join = Some(join);
        self
    }

    pub fn as_dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }
}

/// Static thread instance after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInstance {
    pub id: ThreadId,
    /// `None` only for the main thread
    pub fork: Option<NodeId>,
    pub join: Option<NodeId>,
    /// Registered dynamic, or forked on a control-flow cycle
    pub dynamic: bool,
    /// Targets of the fork edges leaving `fork`
    pub entries: Vec<NodeId>,
}

impl ThreadInstance {
    pub(crate) fn main() -> Self {
        ThreadInstance {
            id: ThreadId::MAIN,
            fork: None,
            join: None,
            dynamic: false,
            entries: Vec::new(),
        }
    }
}

/// May-happen-in-parallel precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MhpPrecision {
    /// Nothing runs in parallel
    None,
    /// Thread regions and fork/join ordering
    Simple,
    /// Simple, minus pairs ordered by synchronization
    Precise,
}

impl MhpPrecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            MhpPrecision::None => "none",
            MhpPrecision::Simple => "simple",
            MhpPrecision::Precise => "precise",
        }
    }
}

impl fmt::Display for MhpPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
