//! Phase Graph Model
//!
//! Editing model for a lifecycle sequence diagram: an ordered list of phases,
//! each owning parallel sub-phases, with success/failure routes to other
//! phases or to one of three fixed end markers.
//!
//! # Core Concepts
//!
//! - [`PhaseGraph`]: Ordered phases plus the current [`Selection`]
//! - [`Phase`] / [`SubPhase`]: Nodes sharing the [`PhaseNode`] attributes
//! - [`Target`]: Route to another phase or an [`EndMarker`]
//! - [`PhaseId`]: Monotonic, never-reused node identifier
//!
//! # Example
//!
//! ```rust
//! use phasegraph_model::{PhaseGraph, Target};
//!
//! let mut graph = PhaseGraph::new();
//! let first = graph.phases()[0].id();
//! let second = graph.add_phase();
//!
//! graph.select_phase(first);
//! graph.update_success_target(Some(Target::Phase(second)));
//! graph.add_sub_phase();
//!
//! assert_eq!(graph.phase(first).unwrap().sub_phases[0].name, "Parallel 1");
//! ```

#![warn(unreachable_pub)]

// Core modules
mod error;
mod ids;
mod store;
mod types;

// Re-exports
pub use error::IdError;
pub use ids::{EndId, IdGenerator, PhaseId};
pub use store::{PhaseGraph, DEFAULT_PHASE_NAME};
pub use types::{
    end_marker, EndMarker, LifecycleState, NodeKind, Phase, PhaseNode, Selection, SubPhase,
    Target, END_MARKERS,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
