//! Lattice domain models

use crate::errors::{ConstructionError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Security level name. Cloning shares the name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Level(Arc<str>);

impl Level {
    pub fn new(name: impl AsRef<str>) -> Self {
        Level(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Level {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Level {
    fn from(name: &str) -> Self {
        Level::new(name)
    }
}

impl From<String> for Level {
    fn from(name: String) -> Self {
        Level(Arc::from(name))
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.0.to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level({})", self.0)
    }
}

/// Outcome of comparing a source level against a sink level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelComparison {
    /// Source flows to sink
    Flows,
    /// Comparable, but the sink is strictly lower
    Violates,
    /// The lattice does not order the two levels
    Incomparable,
}

/// Levels plus covering relation (`lower ⊑ upper` pairs).
///
/// Text form, one entry per line:
///
/// ```text
/// # comment
/// LOW <= HIGH
/// level ISOLATED
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatticeDescription {
    pub levels: Vec<Level>,
    pub covers: Vec<(Level, Level)>,
}

impl LatticeDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, name: &str) -> Self {
        self.declare(Level::new(name));
        self
    }

    /// `lower ⊑ upper`; both levels are declared implicitly
    pub fn cover(mut self, lower: &str, upper: &str) -> Self {
        let (lower, upper) = (Level::new(lower), Level::new(upper));
        self.declare(lower.clone());
        self.declare(upper.clone());
        self.covers.push((lower, upper));
        self
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut desc = LatticeDescription::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || ConstructionError::LatticeParse {
                line: i + 1,
                text: raw.to_string(),
            };

            if let Some((lower, upper)) = line.split_once("<=") {
                let (lower, upper) = (lower.trim(), upper.trim());
                if !is_level_name(lower) || !is_level_name(upper) {
                    return Err(malformed().into());
                }
                desc = desc.cover(lower, upper);
            } else if let Some(name) = line.strip_prefix("level ") {
                let name = name.trim();
                if !is_level_name(name) {
                    return Err(malformed().into());
                }
                desc = desc.level(name);
            } else {
                return Err(malformed().into());
            }
        }

        Ok(desc)
    }

    fn declare(&mut self, level: Level) {
        if !self.levels.contains(&level) {
            self.levels.push(level);
        }
    }
}

fn is_level_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == '<' || c == '=')
}
