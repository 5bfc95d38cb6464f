pub mod context_slicer;

pub use context_slicer::ContextSlicer;
