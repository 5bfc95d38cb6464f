//! Graph Store
//!
//! Immutable system dependence graph (SDG): typed nodes and edges in a flat
//! arena with adjacency indices for both directions.
//!
//! ## Architecture
//! - **Domain**: `SdgDto` interchange representation
//! - **Infrastructure**: `SystemDependenceGraph`, `SdgBuilder`
//!
//! Every edit goes through a fresh `SdgBuilder::build`, which re-validates the
//! whole graph and recomputes the thread model.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
