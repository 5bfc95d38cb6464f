mod mhp;
pub mod thread_model;

pub use thread_model::ThreadModel;
