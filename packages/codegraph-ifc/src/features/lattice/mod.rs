//! Lattice Evaluator
//!
//! Finite security lattices: flows-to, join, meet and comparability over
//! caller-supplied level descriptions, with a two-point LOW ⊑ HIGH default.
pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
