//! Phase Graph Export
//!
//! Flattens a phase graph into application-lifecycle records and renders
//! them as the downloadable `application-lifecycle.json` artifact.
//!
//! - [`export_structure`]: Graph to [`LifecyclePhaseDto`] records
//! - [`export_json`]: Records as indented JSON text
//! - [`Exporter`]: Writes the JSON file
//!
//! Export is one-directional: nothing here rebuilds a graph from records.
//!
//! # Example
//!
//! ```rust
//! use phasegraph_export::export_json;
//! use phasegraph_model::PhaseGraph;
//!
//! let graph = PhaseGraph::new();
//! let text = export_json(&graph)?;
//! assert!(text.contains("\"subPhases\": []"));
//! # Ok::<(), phasegraph_export::ExportError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod dto;
mod error;
mod serializer;

pub use dto::{LifecyclePhaseDto, LifecycleSubPhaseDto};
pub use error::ExportError;
pub use serializer::{export_json, export_structure, Exporter, DEFAULT_EXPORT_FILE_NAME};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
