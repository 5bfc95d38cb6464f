pub mod ifc_analysis;

pub use ifc_analysis::IfcAnalysis;
