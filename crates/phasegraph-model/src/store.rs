//! Phase graph store
//!
//! Owns the ordered phases and the current selection, and exposes the edit
//! operations of the sequence designer:
//! - Appending phases and sub-phases with generated names
//! - Deleting the selection (cascading to sub-phases)
//! - Selection-addressed field updates
//!
//! Every operation is total. Requests that cannot apply (nothing selected,
//! stale ids, targets that would break routing rules) are silent no-ops and
//! are reported through the return value and a `debug` trace.

use crate::ids::{EndId, IdGenerator, PhaseId};
use crate::types::{
    LifecycleState, NodeKind, Phase, PhaseNode, Selection, SubPhase, Target, END_MARKERS,
};
use im::Vector;

/// Name given to the phase that is created when the graph would otherwise be empty
pub const DEFAULT_PHASE_NAME: &str = "Phase 1";

/// Ordered phase collection plus selection
///
/// Backed by persistent vectors: `clone()` is a cheap structural snapshot and
/// edits copy only the touched path.
#[derive(Debug, Clone)]
pub struct PhaseGraph {
    phases: Vector<Phase>,
    selection: Option<Selection>,
    ids: IdGenerator,
}

impl PhaseGraph {
    /// Graph holding the single default phase, nothing selected
    #[must_use]
    pub fn new() -> Self {
        let mut ids = IdGenerator::new();
        let first = Phase::new(ids.next_id(), DEFAULT_PHASE_NAME);
        Self {
            phases: Vector::unit(first),
            selection: None,
            ids,
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Append a phase named `Phase N` (N = count + 1)
    pub fn add_phase(&mut self) -> PhaseId {
        let id = self.ids.next_id();
        let name = format!("Phase {}", self.phases.len() + 1);
        tracing::debug!(%id, %name, "adding phase");
        self.phases.push_back(Phase::new(id, name));
        id
    }

    /// Append a sub-phase to the selected phase
    ///
    /// Named `Parallel M` (M = that phase's sub-phase count + 1). Returns
    /// `None` when no phase is selected or the selected phase is gone.
    pub fn add_sub_phase(&mut self) -> Option<PhaseId> {
        let Some(Selection::Phase { phase_id }) = self.selection else {
            tracing::debug!(selection = ?self.selection, "add_sub_phase ignored: no phase selected");
            return None;
        };
        let Some(index) = self.phase_index(phase_id) else {
            tracing::debug!(%phase_id, "add_sub_phase ignored: selected phase not found");
            return None;
        };

        let phase = self.phases.get_mut(index)?;
        let id = self.ids.next_id();
        let name = format!("Parallel {}", phase.sub_phases.len() + 1);
        tracing::debug!(%phase_id, %id, %name, "adding sub-phase");
        phase.sub_phases.push_back(SubPhase::new(id, name));
        Some(id)
    }

    /// Delete the selected node and clear the selection
    ///
    /// Deleting a phase drops its sub-phases and unsets every target that
    /// routed to it. If no phase remains, a fresh default phase is created.
    /// The selection is cleared either way; returns false when nothing was
    /// selected or the selected node no longer exists.
    pub fn delete_selected(&mut self) -> bool {
        let Some(selection) = self.selection.take() else {
            tracing::debug!("delete_selected ignored: nothing selected");
            return false;
        };

        match selection {
            Selection::Phase { phase_id } => self.remove_phase(phase_id),
            Selection::SubPhase {
                phase_id,
                sub_phase_id,
            } => self.remove_sub_phase(phase_id, sub_phase_id),
        }
    }

    fn remove_phase(&mut self, phase_id: PhaseId) -> bool {
        let before = self.phases.len();
        self.phases.retain(|p| p.id() != phase_id);
        if self.phases.len() == before {
            tracing::debug!(%phase_id, "delete_selected ignored: selected phase not found");
            return false;
        }

        let mut cleared = 0usize;
        for phase in self.phases.iter_mut() {
            cleared += usize::from(phase.node.clear_targets_to(phase_id));
            for sub in phase.sub_phases.iter_mut() {
                cleared += usize::from(sub.clear_targets_to(phase_id));
            }
        }
        tracing::debug!(%phase_id, cleared_targets = cleared, "deleted phase");

        if self.phases.is_empty() {
            let id = self.ids.next_id();
            tracing::debug!(%id, "graph emptied; recreating default phase");
            self.phases.push_back(Phase::new(id, DEFAULT_PHASE_NAME));
        }
        true
    }

    fn remove_sub_phase(&mut self, phase_id: PhaseId, sub_phase_id: PhaseId) -> bool {
        let Some(phase) = self.phases.iter_mut().find(|p| p.id() == phase_id) else {
            tracing::debug!(%phase_id, "delete_selected ignored: parent phase not found");
            return false;
        };
        let before = phase.sub_phases.len();
        phase.sub_phases.retain(|s| s.id != sub_phase_id);
        let removed = phase.sub_phases.len() < before;
        if removed {
            tracing::debug!(%phase_id, %sub_phase_id, "deleted sub-phase");
        } else {
            tracing::debug!(%phase_id, %sub_phase_id, "delete_selected ignored: sub-phase not found");
        }
        removed
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Replace the selection; ids are not validated
    #[inline]
    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    /// Select a top-level phase
    #[inline]
    pub fn select_phase(&mut self, phase_id: PhaseId) {
        self.select(Selection::Phase { phase_id });
    }

    /// Select a sub-phase of `phase_id`
    #[inline]
    pub fn select_sub_phase(&mut self, phase_id: PhaseId, sub_phase_id: PhaseId) {
        self.select(Selection::SubPhase {
            phase_id,
            sub_phase_id,
        });
    }

    /// Clear the selection
    #[inline]
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ------------------------------------------------------------------
    // Selection-addressed edits
    // ------------------------------------------------------------------

    /// Rename the selected node
    pub fn update_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update_selected("name", |node| node.name = name)
    }

    /// Set or unset the success route of the selected node
    ///
    /// Ignored if the target is the node itself, is not an existing
    /// top-level phase, or names an unknown end marker.
    pub fn update_success_target(&mut self, target: Option<Target>) -> bool {
        if !self.accepts_target(target) {
            return false;
        }
        self.update_selected("success_target", |node| node.success_target = target)
    }

    /// Set or unset the failure route of the selected node
    ///
    /// Same acceptance rules as [`Self::update_success_target`].
    pub fn update_failure_target(&mut self, target: Option<Target>) -> bool {
        if !self.accepts_target(target) {
            return false;
        }
        self.update_selected("failure_target", |node| node.failure_target = target)
    }

    /// Set the lifecycle state of the selected node
    pub fn update_lifecycle_state(&mut self, state: LifecycleState) -> bool {
        self.update_selected("lifecycle_state", |node| node.lifecycle_state = state)
    }

    /// Set or unset the numeric value of the selected node
    pub fn update_value(&mut self, value: Option<i64>) -> bool {
        self.update_selected("value", |node| node.value = value)
    }

    /// Set the end flag of the selected node
    pub fn update_is_end(&mut self, is_end: bool) -> bool {
        self.update_selected("is_end", |node| node.is_end = is_end)
    }

    /// Set or unset the success action label of the selected node
    pub fn update_success_button_text(&mut self, text: Option<String>) -> bool {
        self.update_selected("success_button_text", |node| {
            node.success_button_text = text;
        })
    }

    /// Set or unset the failure action label of the selected node
    pub fn update_failure_button_text(&mut self, text: Option<String>) -> bool {
        self.update_selected("failure_button_text", |node| {
            node.failure_button_text = text;
        })
    }

    fn update_selected(
        &mut self,
        field: &'static str,
        apply: impl FnOnce(&mut PhaseNode),
    ) -> bool {
        let Some(selection) = self.selection else {
            tracing::debug!(field, "update ignored: nothing selected");
            return false;
        };
        match self.node_mut(selection) {
            Some(node) => {
                apply(node);
                tracing::debug!(field, id = %selection.node_id(), "updated node");
                true
            }
            None => {
                tracing::debug!(field, ?selection, "update ignored: selection not found");
                false
            }
        }
    }

    fn accepts_target(&self, target: Option<Target>) -> bool {
        let accepted = match target {
            None => true,
            Some(Target::End(end)) => END_MARKERS.iter().any(|m| m.id == end),
            Some(Target::Phase(id)) => {
                let is_self = self.selection.is_some_and(|s| s.node_id() == id);
                !is_self && self.phase_index(id).is_some()
            }
        };
        if !accepted {
            tracing::debug!(?target, selection = ?self.selection, "target rejected");
        }
        accepted
    }

    fn node_mut(&mut self, selection: Selection) -> Option<&mut PhaseNode> {
        let index = self.phase_index(selection.phase_id())?;
        let phase = self.phases.get_mut(index)?;
        match selection {
            Selection::Phase { .. } => Some(&mut phase.node),
            Selection::SubPhase { sub_phase_id, .. } => {
                phase.sub_phases.iter_mut().find(|s| s.id == sub_phase_id)
            }
        }
    }

    fn phase_index(&self, id: PhaseId) -> Option<usize> {
        self.phases.iter().position(|p| p.id() == id)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Phases in display order
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &Vector<Phase> {
        &self.phases
    }

    /// Number of top-level phases (never zero)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Find a phase by id
    #[must_use]
    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id() == id)
    }

    /// Find a sub-phase through its parent
    #[must_use]
    pub fn sub_phase(&self, phase_id: PhaseId, sub_phase_id: PhaseId) -> Option<&SubPhase> {
        self.phase(phase_id)?.sub_phase(sub_phase_id)
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Node the selection resolves to, if it still exists
    #[must_use]
    pub fn selected_node(&self) -> Option<&PhaseNode> {
        match self.selection? {
            Selection::Phase { phase_id } => self.phase(phase_id).map(|p| &p.node),
            Selection::SubPhase {
                phase_id,
                sub_phase_id,
            } => self.sub_phase(phase_id, sub_phase_id),
        }
    }

    /// Kind of the selected node
    #[inline]
    #[must_use]
    pub fn selected_kind(&self) -> Option<NodeKind> {
        self.selection.map(|s| s.kind())
    }

    /// Property panel label for the selection, empty when nothing is selected
    #[inline]
    #[must_use]
    pub fn selected_type_label(&self) -> &'static str {
        self.selected_kind().map_or("", |k| k.label())
    }

    /// Name of the selected node, empty when it does not resolve
    #[must_use]
    pub fn selected_name(&self) -> &str {
        self.selected_node().map_or("", |n| n.name.as_str())
    }

    /// Success route of the selected node
    #[must_use]
    pub fn selected_success_target(&self) -> Option<Target> {
        self.selected_node()?.success_target
    }

    /// Failure route of the selected node
    #[must_use]
    pub fn selected_failure_target(&self) -> Option<Target> {
        self.selected_node()?.failure_target
    }

    /// End marker the selected node succeeds into, defaulting to the first marker
    #[must_use]
    pub fn selected_end_marker(&self) -> EndId {
        match self.selected_success_target() {
            Some(Target::End(end)) => end,
            _ => END_MARKERS[0].id,
        }
    }

    /// Whether `phase_id` is the selected phase
    #[inline]
    #[must_use]
    pub fn is_phase_selected(&self, phase_id: PhaseId) -> bool {
        self.selection == Some(Selection::Phase { phase_id })
    }

    /// Whether the given sub-phase is selected
    #[inline]
    #[must_use]
    pub fn is_sub_phase_selected(&self, phase_id: PhaseId, sub_phase_id: PhaseId) -> bool {
        self.selection
            == Some(Selection::SubPhase {
                phase_id,
                sub_phase_id,
            })
    }

    /// Phases a route picker may offer, excluding `exclude`
    pub fn available_phases(&self, exclude: Option<PhaseId>) -> impl Iterator<Item = &Phase> + '_ {
        self.phases.iter().filter(move |p| Some(p.id()) != exclude)
    }

    /// Every phase and sub-phase id in display order
    #[must_use]
    pub fn node_ids(&self) -> Vec<PhaseId> {
        self.phases
            .iter()
            .flat_map(|p| std::iter::once(p.id()).chain(p.sub_phases.iter().map(|s| s.id)))
            .collect()
    }

    /// Number of ids issued over the graph's lifetime
    #[inline]
    #[must_use]
    pub fn ids_issued(&self) -> u64 {
        self.ids.issued()
    }
}

impl Default for PhaseGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end(n: u8) -> Target {
        Target::End(EndId::new(n).unwrap())
    }

    #[test]
    fn starts_with_default_phase() {
        let graph = PhaseGraph::new();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.phases()[0].name(), "Phase 1");
        assert_eq!(graph.phases()[0].id().to_string(), "phase-1");
        assert!(graph.selection().is_none());
    }

    #[test]
    fn add_phase_names_by_count() {
        let mut graph = PhaseGraph::new();
        graph.add_phase();
        let id = graph.add_phase();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.phase(id).unwrap().name(), "Phase 3");
    }

    #[test]
    fn add_sub_phase_requires_phase_selection() {
        let mut graph = PhaseGraph::new();
        assert!(graph.add_sub_phase().is_none());

        let first = graph.phases()[0].id();
        graph.select_phase(first);
        let sub = graph.add_sub_phase().unwrap();

        graph.select_sub_phase(first, sub);
        assert!(graph.add_sub_phase().is_none());
        assert_eq!(graph.phase(first).unwrap().sub_phases.len(), 1);
    }

    #[test]
    fn add_sub_phase_to_missing_phase_is_noop() {
        let mut graph = PhaseGraph::new();
        graph.select_phase(PhaseId::new(99));
        assert!(graph.add_sub_phase().is_none());
        assert_eq!(graph.ids_issued(), 1);
    }

    #[test]
    fn sub_phase_names_count_per_phase() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        let second = graph.add_phase();

        graph.select_phase(first);
        graph.add_sub_phase();
        graph.add_sub_phase();
        graph.select_phase(second);
        let sub = graph.add_sub_phase().unwrap();

        assert_eq!(graph.sub_phase(second, sub).unwrap().name, "Parallel 1");
        let names: Vec<_> = graph
            .phase(first)
            .unwrap()
            .sub_phases
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, ["Parallel 1", "Parallel 2"]);
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut graph = PhaseGraph::new();
        graph.add_phase();
        assert!(!graph.delete_selected());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn delete_sub_phase_keeps_parent() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        graph.select_phase(first);
        let a = graph.add_sub_phase().unwrap();
        let b = graph.add_sub_phase().unwrap();

        graph.select_sub_phase(first, a);
        assert!(graph.delete_selected());

        let phase = graph.phase(first).unwrap();
        assert_eq!(phase.sub_phases.len(), 1);
        assert_eq!(phase.sub_phases[0].id, b);
        assert!(graph.selection().is_none());
    }

    #[test]
    fn delete_of_stale_phase_selection_reports_no_change() {
        let mut graph = PhaseGraph::new();
        graph.add_phase();
        let before = graph.clone();

        graph.select_phase(PhaseId::new(99));
        assert!(!graph.delete_selected());
        assert_eq!(graph.phases(), before.phases());
        assert_eq!(graph.ids_issued(), before.ids_issued());
        assert!(graph.selection().is_none());
    }

    #[test]
    fn delete_of_stale_sub_phase_selection_reports_no_change() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        graph.select_phase(first);
        let sub = graph.add_sub_phase().unwrap();
        let before = graph.clone();

        graph.select_sub_phase(first, PhaseId::new(99));
        assert!(!graph.delete_selected());
        assert!(graph.selection().is_none());

        graph.select_sub_phase(PhaseId::new(98), sub);
        assert!(!graph.delete_selected());
        assert_eq!(graph.phases(), before.phases());
    }

    #[test]
    fn delete_last_phase_recreates_default() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        graph.select_phase(first);
        graph.update_name("Renamed");
        assert!(graph.delete_selected());

        assert_eq!(graph.len(), 1);
        let phase = &graph.phases()[0];
        assert_eq!(phase.name(), DEFAULT_PHASE_NAME);
        assert_ne!(phase.id(), first);
        assert!(phase.sub_phases.is_empty());
    }

    #[test]
    fn updates_touch_only_selected_field() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        let second = graph.add_phase();

        graph.select_phase(first);
        assert!(graph.update_name("Intake"));
        assert!(graph.update_success_target(Some(Target::Phase(second))));
        assert!(graph.update_failure_target(Some(end(2))));

        let node = &graph.phase(first).unwrap().node;
        assert_eq!(node.name, "Intake");
        assert_eq!(node.success_target, Some(Target::Phase(second)));
        assert_eq!(node.failure_target, Some(end(2)));
        assert_eq!(node.lifecycle_state, LifecycleState::InProgress);

        let other = &graph.phase(second).unwrap().node;
        assert_eq!(other.name, "Phase 2");
        assert!(other.success_target.is_none());
    }

    #[test]
    fn updates_without_selection_are_noops() {
        let mut graph = PhaseGraph::new();
        let before = graph.phases().clone();
        assert!(!graph.update_name("x"));
        assert!(!graph.update_success_target(Some(end(1))));
        assert!(!graph.update_failure_target(None));
        assert!(!graph.update_value(Some(3)));
        assert_eq!(graph.phases(), &before);
    }

    #[test]
    fn sub_phase_updates_address_the_sub_phase() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        graph.select_phase(first);
        let sub = graph.add_sub_phase().unwrap();

        graph.select_sub_phase(first, sub);
        assert!(graph.update_name("Audit"));
        assert!(graph.update_success_target(Some(Target::Phase(first))));

        assert_eq!(graph.phase(first).unwrap().name(), "Phase 1");
        let node = graph.sub_phase(first, sub).unwrap();
        assert_eq!(node.name, "Audit");
        assert_eq!(node.success_target, Some(Target::Phase(first)));
        assert_eq!(graph.selected_name(), "Audit");
        assert_eq!(graph.selected_type_label(), "Parallel Phase");
    }

    #[test]
    fn invalid_targets_are_rejected() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        graph.select_phase(first);
        let sub = graph.add_sub_phase().unwrap();

        // self
        assert!(!graph.update_success_target(Some(Target::Phase(first))));
        // sub-phase id
        assert!(!graph.update_success_target(Some(Target::Phase(sub))));
        // unknown phase
        assert!(!graph.update_failure_target(Some(Target::Phase(PhaseId::new(42)))));
        assert!(graph.phase(first).unwrap().node.success_target.is_none());

        assert!(graph.update_success_target(Some(end(3))));
        assert!(graph.update_success_target(None));
        assert!(graph.phase(first).unwrap().node.success_target.is_none());
    }

    #[test]
    fn deleting_phase_clears_routes_to_it() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        let second = graph.add_phase();

        graph.select_phase(first);
        let sub = graph.add_sub_phase().unwrap();
        graph.update_success_target(Some(Target::Phase(second)));
        graph.update_failure_target(Some(end(1)));
        graph.select_sub_phase(first, sub);
        graph.update_failure_target(Some(Target::Phase(second)));

        graph.select_phase(second);
        graph.delete_selected();

        let phase = graph.phase(first).unwrap();
        assert!(phase.node.success_target.is_none());
        assert_eq!(phase.node.failure_target, Some(end(1)));
        assert!(phase.sub_phases[0].failure_target.is_none());
    }

    #[test]
    fn selected_end_marker_defaults_to_first() {
        let mut graph = PhaseGraph::new();
        assert_eq!(graph.selected_end_marker().get(), 1);

        let first = graph.phases()[0].id();
        graph.select_phase(first);
        graph.update_success_target(Some(end(3)));
        assert_eq!(graph.selected_end_marker().get(), 3);
    }

    #[test]
    fn selection_predicates() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        graph.select_phase(first);
        assert!(graph.is_phase_selected(first));
        assert!(!graph.is_sub_phase_selected(first, first));

        graph.clear_selection();
        assert!(!graph.is_phase_selected(first));
        assert_eq!(graph.selected_type_label(), "");
        assert_eq!(graph.selected_name(), "");
    }

    #[test]
    fn stale_selection_resolves_to_nothing() {
        let mut graph = PhaseGraph::new();
        graph.select_phase(PhaseId::new(77));
        assert!(graph.selected_node().is_none());
        assert_eq!(graph.selected_name(), "");
        assert!(!graph.update_name("ghost"));
    }

    #[test]
    fn available_phases_excludes_one() {
        let mut graph = PhaseGraph::new();
        let first = graph.phases()[0].id();
        let second = graph.add_phase();
        let ids: Vec<_> = graph.available_phases(Some(first)).map(Phase::id).collect();
        assert_eq!(ids, [second]);
        assert_eq!(graph.available_phases(None).count(), 2);
    }

    #[test]
    fn clone_is_an_independent_snapshot() {
        let mut graph = PhaseGraph::new();
        let snapshot = graph.clone();
        graph.add_phase();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(graph.len(), 2);
    }
}
