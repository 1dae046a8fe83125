//! Testing utilities for the phase graph workspace
//!
//! Shared fixtures and assertions.

#![allow(missing_docs)]

use phasegraph_model::{EndId, PhaseGraph, PhaseId, Target};
use std::collections::HashSet;

/// Graph with `count` phases named `Phase 1..=count`
pub fn graph_with_phases(count: usize) -> PhaseGraph {
    let mut graph = PhaseGraph::new();
    for _ in 1..count {
        graph.add_phase();
    }
    graph
}

/// Graph whose phase `i` carries `sub_counts[i]` sub-phases
///
/// Leaves nothing selected.
pub fn graph_with_sub_phases(sub_counts: &[usize]) -> PhaseGraph {
    let mut graph = graph_with_phases(sub_counts.len().max(1));
    let ids: Vec<PhaseId> = graph.phases().iter().map(|p| p.id()).collect();
    for (id, count) in ids.into_iter().zip(sub_counts) {
        graph.select_phase(id);
        for _ in 0..*count {
            graph.add_sub_phase();
        }
    }
    graph.clear_selection();
    graph
}

/// Id of the phase at `index`
pub fn phase_id_at(graph: &PhaseGraph, index: usize) -> PhaseId {
    graph.phases()[index].id()
}

pub fn end_target(n: u8) -> Target {
    Target::End(EndId::new(n).unwrap())
}

/// Panics if any phase or sub-phase id appears twice
pub fn assert_unique_ids(graph: &PhaseGraph) {
    let ids = graph.node_ids();
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate node ids in {ids:?}");
}

/// Panics if a route points at a sub-phase, at its own node or at a missing phase
pub fn assert_routes_valid(graph: &PhaseGraph) {
    let phase_ids: HashSet<_> = graph.phases().iter().map(|p| p.id()).collect();
    let nodes = graph
        .phases()
        .iter()
        .flat_map(|p| std::iter::once(&p.node).chain(p.sub_phases.iter()));
    for node in nodes {
        for target in [node.success_target, node.failure_target].into_iter().flatten() {
            if let Target::Phase(id) = target {
                assert_ne!(id, node.id, "{} routes to itself", node.id);
                assert!(phase_ids.contains(&id), "{} routes to missing phase {id}", node.id);
            }
        }
    }
}
