//! Application lifecycle record shapes
//!
//! Mirrors the external lifecycle-phase contract. Optional fields are
//! omitted when unset; key order is fixed by field order.

use phasegraph_model::{LifecycleState, PhaseNode, Target};
use serde::{Deserialize, Serialize};

/// Exported sub-phase record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleSubPhaseDto {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,
    pub is_end: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_phase_id: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_phase_id: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_button_text: Option<String>,
}

impl From<&PhaseNode> for LifecycleSubPhaseDto {
    fn from(node: &PhaseNode) -> Self {
        Self {
            id: node.id.to_string(),
            name: Some(node.name.clone()),
            value: node.value,
            lifecycle_state: Some(node.lifecycle_state),
            is_end: node.is_end,
            failure_phase_id: node.failure_target,
            success_phase_id: node.success_target,
            failure_button_text: node.failure_button_text.clone(),
            success_button_text: node.success_button_text.clone(),
        }
    }
}

/// Exported phase record with nested sub-phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecyclePhaseDto {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,
    pub is_end: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_phase_id: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_phase_id: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_phases: Option<Vec<LifecycleSubPhaseDto>>,
}

impl From<&phasegraph_model::Phase> for LifecyclePhaseDto {
    fn from(phase: &phasegraph_model::Phase) -> Self {
        let LifecycleSubPhaseDto {
            id,
            name,
            value,
            lifecycle_state,
            is_end,
            failure_phase_id,
            success_phase_id,
            failure_button_text,
            success_button_text,
        } = LifecycleSubPhaseDto::from(&phase.node);

        Self {
            id,
            name,
            value,
            lifecycle_state,
            is_end,
            failure_phase_id,
            success_phase_id,
            failure_button_text,
            success_button_text,
            sub_phases: Some(phase.sub_phases.iter().map(LifecycleSubPhaseDto::from).collect()),
        }
    }
}
