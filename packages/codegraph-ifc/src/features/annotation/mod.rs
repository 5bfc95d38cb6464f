//! Security Annotations
//!
//! Maps caller-level program parts (methods, parameters, fields, statements)
//! to dependence graph nodes and records them as sources or sinks with a
//! security level. The annotation set is the only mutable input of a
//! checking run; runs consume a frozen [`AnnotationSnapshot`].
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::*;
pub use ports::*;
