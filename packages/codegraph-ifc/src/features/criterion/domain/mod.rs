//! Checking criteria

use crate::shared::models::EdgeKindSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criterion {
    SequentialNi,
    LsodBasic,
    LsodRefined,
    LsodTimingSensitive,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::SequentialNi,
        Criterion::LsodBasic,
        Criterion::LsodRefined,
        Criterion::LsodTimingSensitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::SequentialNi => "SEQUENTIAL_NI",
            Criterion::LsodBasic => "LSOD_BASIC",
            Criterion::LsodRefined => "LSOD_REFINED",
            Criterion::LsodTimingSensitive => "LSOD_TIMING_SENSITIVE",
        }
    }

    /// Concurrency-aware criteria need an MHP precision
    pub fn is_concurrent(&self) -> bool {
        !matches!(self, Criterion::SequentialNi)
    }

    /// Edge kinds traversed when slicing for this criterion
    pub fn edges(&self) -> EdgeKindSet {
        if self.is_concurrent() {
            EdgeKindSet::concurrent()
        } else {
            EdgeKindSet::sequential()
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
