//! Context-Sensitive Slicer
//!
//! Backward and forward slices over the dependence graph that respect
//! interprocedural call/return matching.
//!
//! ## Modes
//! - **ContextSensitive**: k-limited call strings, each (node, call string)
//!   visited once
//! - **Summary**: two-phase traversal (Horwitz, Reps & Binkley 1990) relying
//!   on summary edges
//! - **ContextInsensitive**: plain reachability, over-approximates
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::*;
pub use ports::*;
