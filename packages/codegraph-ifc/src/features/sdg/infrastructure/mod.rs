pub mod builder;
pub mod graph;

pub use builder::SdgBuilder;
pub use graph::SystemDependenceGraph;
