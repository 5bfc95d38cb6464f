//! Thread / Concurrency Model
//!
//! Thread registry, thread regions and may-happen-in-parallel (MHP) queries.
//!
//! ## Architecture
//! - **Domain**: ThreadSpec, ThreadInstance, MhpPrecision
//! - **Ports**: MhpPort trait (consumed by the criterion engine)
//! - **Infrastructure**: ThreadModel (regions, fork/join ordering, sync index)
//!
//! ## Precision
//! - `None`: never parallel
//! - `Simple`: region/fork/join ordering only
//! - `Precise`: simple, minus pairs ordered by synchronization dependence
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::*;
pub use ports::*;
