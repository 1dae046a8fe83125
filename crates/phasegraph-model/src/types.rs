//! Core types for the phase graph
//!
//! Defines the fundamental node types:
//! - Lifecycle states and routing targets
//! - The fixed end markers
//! - Phases, sub-phases and the selection that edits address

use crate::error::IdError;
use crate::ids::{EndId, PhaseId};
use im::Vector;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Lifecycle state carried by a phase
///
/// Informational only; transitions between states are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Not yet started
    NotStarted,
    /// Currently running (default for new nodes)
    #[default]
    InProgress,
    /// Finished
    Completed,
    /// Finished unsuccessfully
    Failed,
    /// Finished successfully
    Succeeded,
}

impl LifecycleState {
    /// Name as written in exports
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Succeeded => "Succeeded",
        }
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the fixed terminal outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndMarker {
    /// Marker id (1..=3)
    pub id: EndId,
    /// Display label
    pub label: &'static str,
}

/// The three end markers every graph routes to
pub const END_MARKERS: [EndMarker; 3] = [
    EndMarker {
        id: EndId::new_unchecked(1),
        label: "End 1",
    },
    EndMarker {
        id: EndId::new_unchecked(2),
        label: "End 2",
    },
    EndMarker {
        id: EndId::new_unchecked(3),
        label: "End 3",
    },
];

/// Look up an end marker by id
#[inline]
#[must_use]
pub fn end_marker(id: EndId) -> Option<&'static EndMarker> {
    END_MARKERS.iter().find(|m| m.id == id)
}

/// Where a node routes on success or failure
///
/// Serialized the way lifecycle exports expect: a phase as its string id,
/// an end marker as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Another top-level phase
    Phase(PhaseId),
    /// A terminal end marker
    End(EndId),
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phase(id) => write!(f, "{id}"),
            Self::End(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for Target {
    type Err = IdError;

    /// Accepts `phase-N`, `end-N` or a bare end number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("phase-") {
            return s.parse().map(Self::Phase);
        }
        if s.starts_with("end-") || (!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())) {
            return s.parse().map(Self::End);
        }
        Err(IdError::MalformedTarget(s.to_string()))
    }
}

impl From<PhaseId> for Target {
    fn from(id: PhaseId) -> Self {
        Self::Phase(id)
    }
}

impl From<EndId> for Target {
    fn from(id: EndId) -> Self {
        Self::End(id)
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Phase(id) => id.serialize(serializer),
            Self::End(id) => id.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TargetVisitor;

        impl Visitor<'_> for TargetVisitor {
            type Value = Target;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("a phase id string or an end marker number")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Target, E> {
                let raw = u8::try_from(v)
                    .map_err(|_| E::custom(IdError::MalformedTarget(v.to_string())))?;
                EndId::new(raw).map(Target::End).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Target, E> {
                let raw = u64::try_from(v)
                    .map_err(|_| E::custom(IdError::MalformedTarget(v.to_string())))?;
                self.visit_u64(raw)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Target, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TargetVisitor)
    }
}

/// Attributes shared by phases and sub-phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseNode {
    /// Stable identifier
    pub id: PhaseId,
    /// Display label (not unique)
    pub name: String,
    /// Optional numeric payload
    pub value: Option<i64>,
    /// Informational lifecycle state
    pub lifecycle_state: LifecycleState,
    /// Informational end flag
    pub is_end: bool,
    /// Route taken on success
    pub success_target: Option<Target>,
    /// Route taken on failure
    pub failure_target: Option<Target>,
    /// Label for the success action
    pub success_button_text: Option<String>,
    /// Label for the failure action
    pub failure_button_text: Option<String>,
}

impl PhaseNode {
    /// Node with default attributes
    #[must_use]
    pub fn new(id: PhaseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            value: None,
            lifecycle_state: LifecycleState::default(),
            is_end: false,
            success_target: None,
            failure_target: None,
            success_button_text: None,
            failure_button_text: None,
        }
    }

    /// Unset any target that routes to `phase`
    ///
    /// Returns true if a target was cleared.
    pub(crate) fn clear_targets_to(&mut self, phase: PhaseId) -> bool {
        let dangling = Some(Target::Phase(phase));
        let mut cleared = false;
        if self.success_target == dangling {
            self.success_target = None;
            cleared = true;
        }
        if self.failure_target == dangling {
            self.failure_target = None;
            cleared = true;
        }
        cleared
    }
}

/// A sub-phase carries the node attributes only; it cannot nest further
pub type SubPhase = PhaseNode;

/// Top-level phase owning an ordered list of sub-phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    /// Node attributes
    pub node: PhaseNode,
    /// Parallel sub-stages in insertion order
    pub sub_phases: Vector<SubPhase>,
}

impl Phase {
    /// Phase with default attributes and no sub-phases
    #[must_use]
    pub fn new(id: PhaseId, name: impl Into<String>) -> Self {
        Self {
            node: PhaseNode::new(id, name),
            sub_phases: Vector::new(),
        }
    }

    /// Phase id
    #[inline]
    #[must_use]
    pub fn id(&self) -> PhaseId {
        self.node.id
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Find a sub-phase by id
    #[must_use]
    pub fn sub_phase(&self, id: PhaseId) -> Option<&SubPhase> {
        self.sub_phases.iter().find(|s| s.id == id)
    }
}

/// Kind of node a selection refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top-level phase
    Phase,
    /// Sub-phase nested under a phase
    SubPhase,
}

impl NodeKind {
    /// Label shown in the property panel
    #[inline]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Phase => "Phase",
            Self::SubPhase => "Parallel Phase",
        }
    }
}

/// The single node edit operations apply to
///
/// Ids are not validated on selection; a stale selection resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// A top-level phase
    Phase {
        /// Selected phase
        phase_id: PhaseId,
    },
    /// A sub-phase, located through its parent
    SubPhase {
        /// Owning phase
        phase_id: PhaseId,
        /// Selected sub-phase
        sub_phase_id: PhaseId,
    },
}

impl Selection {
    /// Kind of the selected node
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Phase { .. } => NodeKind::Phase,
            Self::SubPhase { .. } => NodeKind::SubPhase,
        }
    }

    /// Id of the phase that owns the selection
    #[inline]
    #[must_use]
    pub const fn phase_id(&self) -> PhaseId {
        match self {
            Self::Phase { phase_id } | Self::SubPhase { phase_id, .. } => *phase_id,
        }
    }

    /// Id of the selected node itself
    #[inline]
    #[must_use]
    pub const fn node_id(&self) -> PhaseId {
        match self {
            Self::Phase { phase_id } => *phase_id,
            Self::SubPhase { sub_phase_id, .. } => *sub_phase_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parse_forms() {
        assert_eq!(
            "phase-4".parse::<Target>().unwrap(),
            Target::Phase(PhaseId::new(4))
        );
        assert_eq!(
            "end-3".parse::<Target>().unwrap(),
            Target::End(EndId::new(3).unwrap())
        );
        assert_eq!(
            "2".parse::<Target>().unwrap(),
            Target::End(EndId::new(2).unwrap())
        );
        assert!("".parse::<Target>().is_err());
        assert!("somewhere".parse::<Target>().is_err());
        assert!("end-7".parse::<Target>().is_err());
    }

    #[test]
    fn target_json_shape() {
        let phase = Target::Phase(PhaseId::new(2));
        let end = Target::End(EndId::new(1).unwrap());
        assert_eq!(serde_json::to_string(&phase).unwrap(), "\"phase-2\"");
        assert_eq!(serde_json::to_string(&end).unwrap(), "1");

        let back: Target = serde_json::from_str("\"phase-2\"").unwrap();
        assert_eq!(back, phase);
        let back: Target = serde_json::from_str("1").unwrap();
        assert_eq!(back, end);
        assert!(serde_json::from_str::<Target>("9").is_err());
    }

    #[test]
    fn end_markers_are_fixed() {
        assert_eq!(END_MARKERS.len(), 3);
        let labels: Vec<_> = END_MARKERS.iter().map(|m| m.label).collect();
        assert_eq!(labels, ["End 1", "End 2", "End 3"]);
        assert_eq!(end_marker(EndId::new(2).unwrap()).unwrap().label, "End 2");
    }

    #[test]
    fn new_node_defaults() {
        let node = PhaseNode::new(PhaseId::new(1), "Phase 1");
        assert_eq!(node.lifecycle_state, LifecycleState::InProgress);
        assert!(!node.is_end);
        assert!(node.value.is_none());
        assert!(node.success_target.is_none());
        assert!(node.failure_target.is_none());
    }

    #[test]
    fn clear_targets_only_touches_matching() {
        let mut node = PhaseNode::new(PhaseId::new(1), "a");
        node.success_target = Some(Target::Phase(PhaseId::new(2)));
        node.failure_target = Some(Target::End(EndId::new(1).unwrap()));

        assert!(node.clear_targets_to(PhaseId::new(2)));
        assert!(node.success_target.is_none());
        assert!(node.failure_target.is_some());
        assert!(!node.clear_targets_to(PhaseId::new(2)));
    }

    #[test]
    fn selection_accessors() {
        let sel = Selection::SubPhase {
            phase_id: PhaseId::new(1),
            sub_phase_id: PhaseId::new(3),
        };
        assert_eq!(sel.kind(), NodeKind::SubPhase);
        assert_eq!(sel.kind().label(), "Parallel Phase");
        assert_eq!(sel.phase_id(), PhaseId::new(1));
        assert_eq!(sel.node_id(), PhaseId::new(3));
    }
}
