//! Phase Graph Layout
//!
//! Deterministic grid placement for phase sequence diagrams.
//!
//! - [`LayoutDeriver`]: Computes a [`DiagramLayout`] from a graph
//! - [`LayoutConfig`]: Grid constants, overridable from configuration
//!
//! This is a static grid, not a general graph layout: no collision
//! avoidance and no crossing minimization. Deleting or adding a phase only
//! shifts the phases after it.
//!
//! # Example
//!
//! ```rust
//! use phasegraph_layout::derive_layout;
//! use phasegraph_model::PhaseGraph;
//!
//! let mut graph = PhaseGraph::new();
//! graph.add_phase();
//!
//! let layout = derive_layout(&graph);
//! assert_eq!(layout.phases[1].rect.x, 280);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod layout;

pub use config::LayoutConfig;
pub use layout::{
    derive_layout, DiagramLayout, EndBox, LayoutDeriver, PhaseBox, Point, Rect, SubPhaseBox,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
