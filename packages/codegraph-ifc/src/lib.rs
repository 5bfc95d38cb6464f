/*
 * Codegraph IFC - Information-Flow Certification Engine
 *
 * Non-interference checking for concurrent programs over a whole-program
 * system dependence graph (SDG).
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Ids, nodes, edges, cancellation
 * - features/    : sdg → lattice → concurrency → slicing → chopping → criterion
 * - config/      : Presets and YAML configuration
 * - errors       : Crate-wide error type
 *
 * Performance:
 * - Immutable snapshot shared by all workers, no locks
 * - Rayon work-stealing over (source, sink) pairs
 */

#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::needless_range_loop)] // Range loop for matrix indexing
#![allow(clippy::type_complexity)] // Nested result maps

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{IfcConfig, Preset};
pub use errors::{ConstructionError, IfcError, Result};
pub use features::annotation::{AnnotationSet, LabelResolver, ProgramPart, ProgramPartResolver};
pub use features::chopping::{AccessPair, Violation, ViolationKind};
pub use features::concurrency::{MhpPort, MhpPrecision, ThreadModel, ThreadSpec};
pub use features::criterion::{Criterion, CriterionEngine, IfcAnalysis};
pub use features::lattice::{LatticeDescription, Level, LevelComparison, SecurityLattice};
pub use features::sdg::{SdgBuilder, SdgDto, SystemDependenceGraph};
pub use features::slicing::{ContextSlicer, SliceDirection, SliceMode, SlicerPort};
pub use shared::models::{Edge, EdgeKind, EdgeKindSet, Node, NodeId, NodeKind, ProcId, ThreadId};
pub use shared::CancellationToken;
