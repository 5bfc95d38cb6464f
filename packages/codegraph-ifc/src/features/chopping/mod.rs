//! Chop / Violation Engine
//!
//! `chop(S, T) = forward(S) ∩ backward(T)`. A non-empty chop means a
//! dependence path exists; whether it is a violation is decided by the lattice
//! comparison of the source and sink levels.
pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
