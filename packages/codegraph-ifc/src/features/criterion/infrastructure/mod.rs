pub mod engine;

pub use engine::CriterionEngine;
