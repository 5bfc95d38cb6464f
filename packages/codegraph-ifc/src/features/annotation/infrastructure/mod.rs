pub mod annotation_set;
pub mod label_resolver;

pub use annotation_set::AnnotationSet;
pub use label_resolver::LabelResolver;
