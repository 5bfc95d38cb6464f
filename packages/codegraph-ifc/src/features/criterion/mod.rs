//! Criterion Engine
//!
//! Composes slicer, MHP model and lattice into the checking criteria:
//!
//! - **SEQUENTIAL_NI**: sequential non-interference; thread interference
//!   edges are not traversed
//! - **LSOD_BASIC**: adds interference edges; concurrency-only flows need an
//!   access pair that may happen in parallel
//! - **LSOD_REFINED**: as basic, with synchronization-aware (precise) MHP
//! - **LSOD_TIMING_SENSITIVE**: refined, plus leaks through the relative order
//!   of synchronization events
//!
//! A sequential violation is reported under every criterion. Beyond that,
//! callers should not assume the criteria nest.
//!
//! ## Architecture
//! - **Domain**: Criterion
//! - **Infrastructure**: CriterionEngine (per-run, parallel over pairs)
//! - **Application**: IfcAnalysis (caller-facing facade)
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::*;
pub use domain::*;
pub use infrastructure::*;
