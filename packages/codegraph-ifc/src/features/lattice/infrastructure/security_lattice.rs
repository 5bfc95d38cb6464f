/*
 * Security Lattice
 *
 * Finite partial order over named security levels (Denning 1976).
 *
 * Construction:
 * - reflexive-transitive closure of the covering relation (Floyd-Warshall)
 * - antisymmetry check (no two distinct levels flow into each other)
 * - unique join and meet for every pair, tabulated once
 *
 * Queries are table lookups; the lattice is immutable and shared read-only
 * by every checking run.
 */

use crate::errors::{ConstructionError, Result};
use crate::features::lattice::domain::{LatticeDescription, Level, LevelComparison};
use rustc_hash::FxHashMap;
use tracing::debug;

// ============================================================================
// Security Lattice
// ============================================================================

#[derive(Debug, Clone)]
pub struct SecurityLattice {
    levels: Vec<Level>,
    index: FxHashMap<Level, usize>,
    /// leq[a][b] <=> a ⊑ b
    leq: Vec<Vec<bool>>,
    join: Vec<Vec<Option<usize>>>,
    meet: Vec<Vec<Option<usize>>>,
    top: usize,
    bottom: usize,
}

impl SecurityLattice {
    /// Build and validate a lattice from its description
    pub fn new(desc: LatticeDescription) -> Result<Self> {
        if desc.levels.is_empty() && desc.covers.is_empty() {
            return Err(ConstructionError::EmptyLattice.into());
        }
        let lattice = Self::assemble(desc);

        let n = lattice.levels.len();
        for a in 0..n {
            for b in (a + 1)..n {
                if lattice.leq[a][b] && lattice.leq[b][a] {
                    return Err(ConstructionError::CyclicLattice {
                        a: lattice.levels[a].to_string(),
                        b: lattice.levels[b].to_string(),
                    }
                    .into());
                }
            }
        }
        for a in 0..n {
            for b in a..n {
                for (table, op) in [(&lattice.join, "join"), (&lattice.meet, "meet")] {
                    if table[a][b].is_none() {
                        return Err(ConstructionError::NotALattice {
                            a: lattice.levels[a].to_string(),
                            b: lattice.levels[b].to_string(),
                            op,
                        }
                        .into());
                    }
                }
            }
        }

        debug!(
            levels = n,
            top = %lattice.top(),
            bottom = %lattice.bottom(),
            "Security lattice built"
        );
        Ok(lattice)
    }

    /// Parse the text form (see [`LatticeDescription`]) and build
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(LatticeDescription::parse(text)?)
    }

    /// LOW ⊑ HIGH
    pub fn two_point() -> Self {
        Self::assemble(LatticeDescription::new().cover("LOW", "HIGH"))
    }

    /// LOW ⊑ MID ⊑ HIGH
    pub fn three_point() -> Self {
        Self::assemble(
            LatticeDescription::new()
                .cover("LOW", "MID")
                .cover("MID", "HIGH"),
        )
    }

    /// LOW ⊑ A, B ⊑ HIGH with A and B incomparable
    pub fn diamond() -> Self {
        Self::assemble(
            LatticeDescription::new()
                .cover("LOW", "A")
                .cover("LOW", "B")
                .cover("A", "HIGH")
                .cover("B", "HIGH"),
        )
    }

    /// Closure and join/meet tables without validation
    fn assemble(desc: LatticeDescription) -> Self {
        let levels = desc.levels;
        let index: FxHashMap<Level, usize> = levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        let n = levels.len();

        let mut leq = vec![vec![false; n]; n];
        for (i, row) in leq.iter_mut().enumerate() {
            row[i] = true;
        }
        for (lower, upper) in &desc.covers {
            if let (Some(&a), Some(&b)) = (index.get(lower), index.get(upper)) {
                leq[a][b] = true;
            }
        }
        for k in 0..n {
            for i in 0..n {
                if !leq[i][k] {
                    continue;
                }
                for j in 0..n {
                    if leq[k][j] {
                        leq[i][j] = true;
                    }
                }
            }
        }

        let bound = |a: usize, b: usize, upper: bool| -> Option<usize> {
            let candidates: Vec<usize> = (0..n)
                .filter(|&c| {
                    if upper {
                        leq[a][c] && leq[b][c]
                    } else {
                        leq[c][a] && leq[c][b]
                    }
                })
                .collect();
            candidates.iter().copied().find(|&c| {
                candidates
                    .iter()
                    .all(|&d| if upper { leq[c][d] } else { leq[d][c] })
            })
        };

        let mut join = vec![vec![None; n]; n];
        let mut meet = vec![vec![None; n]; n];
        for a in 0..n {
            for b in 0..n {
                join[a][b] = bound(a, b, true);
                meet[a][b] = bound(a, b, false);
            }
        }

        let top = (0..n).find(|&t| (0..n).all(|a| leq[a][t])).unwrap_or(0);
        let bottom = (0..n).find(|&b| (0..n).all(|a| leq[b][a])).unwrap_or(0);

        SecurityLattice {
            levels,
            index,
            leq,
            join,
            meet,
            top,
            bottom,
        }
    }

    /// All levels in declaration order
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn contains(&self, level: &str) -> bool {
        self.index.contains_key(level)
    }

    /// Level named `name`, if declared
    pub fn level(&self, name: &str) -> Option<Level> {
        self.index.get(name).map(|&i| self.levels[i].clone())
    }

    /// a ⊑ b: data at `a` may flow to `b`. Unknown levels never flow.
    pub fn flows_to(&self, a: &Level, b: &Level) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self.leq[a][b],
            _ => false,
        }
    }

    pub fn is_comparable(&self, a: &Level, b: &Level) -> bool {
        self.flows_to(a, b) || self.flows_to(b, a)
    }

    /// Least upper bound (⊔)
    pub fn join(&self, a: &Level, b: &Level) -> Option<Level> {
        self.lookup(&self.join, a, b)
    }

    /// Greatest lower bound (⊓)
    pub fn meet(&self, a: &Level, b: &Level) -> Option<Level> {
        self.lookup(&self.meet, a, b)
    }

    pub fn top(&self) -> &Level {
        &self.levels[self.top]
    }

    pub fn bottom(&self) -> &Level {
        &self.levels[self.bottom]
    }

    /// Compare a source level against a sink level
    pub fn compare(&self, source: &Level, sink: &Level) -> LevelComparison {
        if self.flows_to(source, sink) {
            LevelComparison::Flows
        } else if self.is_comparable(source, sink) {
            LevelComparison::Violates
        } else {
            LevelComparison::Incomparable
        }
    }

    fn lookup(&self, table: &[Vec<Option<usize>>], a: &Level, b: &Level) -> Option<Level> {
        let (a, b) = (*self.index.get(a)?, *self.index.get(b)?);
        table[a][b].map(|i| self.levels[i].clone())
    }
}

impl Default for SecurityLattice {
    fn default() -> Self {
        Self::two_point()
    }
}
