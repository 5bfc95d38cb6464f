//! Shared models and utilities used by every feature.

pub mod cancellation;
pub mod models;

pub use cancellation::CancellationToken;
pub use models::*;
