pub mod chopper;
pub mod violation_engine;
pub mod witness;

pub use chopper::Chopper;
pub use violation_engine::ViolationEngine;
pub use witness::shortest_path;
