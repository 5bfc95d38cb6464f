//! Feature modules - each feature follows Hexagonal Architecture
//!
//! Each feature contains (as needed):
//! - domain/         - Pure models
//! - ports/          - Interface definitions (traits)
//! - application/    - Use cases
//! - infrastructure/ - Implementations
//!
//! Leaves first: sdg → lattice → concurrency → slicing → annotation →
//! chopping → criterion.

pub mod annotation;
pub mod chopping;
pub mod concurrency;
pub mod criterion;
pub mod lattice;
pub mod sdg;
pub mod slicing;
