//! Edit scripts
//!
//! A script is a YAML or JSON list of edit commands, one per store
//! operation, replayed in order against a fresh graph:
//!
//! ```yaml
//! - op: add_phase
//! - op: select_phase
//!   phase: phase-1
//! - op: set_success
//!   target: phase-2
//! - op: set_failure
//!   target: 3
//! ```

use phasegraph_model::{LifecycleState, PhaseGraph, PhaseId, Target};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Script loading errors
#[derive(Debug, thiserror::Error)]
pub(crate) enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON script {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML script {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One designer edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum EditCommand {
    AddPhase,
    AddSubPhase,
    DeleteSelected,
    SelectPhase {
        phase: PhaseId,
    },
    SelectSubPhase {
        phase: PhaseId,
        sub_phase: PhaseId,
    },
    ClearSelection,
    Rename {
        name: String,
    },
    SetSuccess {
        #[serde(default)]
        target: Option<Target>,
    },
    SetFailure {
        #[serde(default)]
        target: Option<Target>,
    },
    SetState {
        state: LifecycleState,
    },
    SetValue {
        #[serde(default)]
        value: Option<i64>,
    },
    SetEnd {
        is_end: bool,
    },
    SetSuccessButton {
        #[serde(default)]
        text: Option<String>,
    },
    SetFailureButton {
        #[serde(default)]
        text: Option<String>,
    },
}

impl EditCommand {
    /// Apply to `graph`, returning whether anything changed
    pub(crate) fn apply(&self, graph: &mut PhaseGraph) -> bool {
        match self {
            Self::AddPhase => {
                graph.add_phase();
                true
            }
            Self::AddSubPhase => graph.add_sub_phase().is_some(),
            Self::DeleteSelected => graph.delete_selected(),
            Self::SelectPhase { phase } => {
                graph.select_phase(*phase);
                true
            }
            Self::SelectSubPhase { phase, sub_phase } => {
                graph.select_sub_phase(*phase, *sub_phase);
                true
            }
            Self::ClearSelection => {
                graph.clear_selection();
                true
            }
            Self::Rename { name } => graph.update_name(name.clone()),
            Self::SetSuccess { target } => graph.update_success_target(*target),
            Self::SetFailure { target } => graph.update_failure_target(*target),
            Self::SetState { state } => graph.update_lifecycle_state(*state),
            Self::SetValue { value } => graph.update_value(*value),
            Self::SetEnd { is_end } => graph.update_is_end(*is_end),
            Self::SetSuccessButton { text } => graph.update_success_button_text(text.clone()),
            Self::SetFailureButton { text } => graph.update_failure_button_text(text.clone()),
        }
    }
}

/// Outcome of replaying a script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReplayReport {
    pub(crate) applied: usize,
    pub(crate) ignored: usize,
}

/// Replay `commands` in order; ignored commands are counted, not fatal
pub(crate) fn replay(graph: &mut PhaseGraph, commands: &[EditCommand]) -> ReplayReport {
    let mut report = ReplayReport::default();
    for (step, command) in commands.iter().enumerate() {
        if command.apply(graph) {
            report.applied += 1;
        } else {
            report.ignored += 1;
            tracing::debug!(step, ?command, "command had no effect");
        }
    }
    tracing::info!(
        applied = report.applied,
        ignored = report.ignored,
        phases = graph.len(),
        "replayed script"
    );
    report
}

/// Parse script text; `.json` files are read as JSON, everything else as YAML
pub(crate) fn parse_script(text: &str, origin: &Path) -> Result<Vec<EditCommand>, ScriptError> {
    let is_json = origin
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(text).map_err(|source| ScriptError::Json {
            path: origin.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(text).map_err(|source| ScriptError::Yaml {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Read and parse a script file
pub(crate) fn load_script(path: &Path) -> Result<Vec<EditCommand>, ScriptError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&text, path)
}

const DEMO_SCRIPT: &str = r"
- op: add_phase
- op: add_phase
- op: select_phase
  phase: phase-1
- op: rename
  name: Intake
- op: set_success
  target: phase-2
- op: set_failure
  target: 3
- op: add_sub_phase
- op: select_sub_phase
  phase: phase-1
  sub_phase: phase-4
- op: rename
  name: Background check
- op: set_success
  target: end-1
- op: select_phase
  phase: phase-2
- op: rename
  name: Review
- op: set_success
  target: phase-3
- op: set_failure
  target: 3
- op: set_success_button
  text: Approve
- op: set_failure_button
  text: Reject
- op: select_phase
  phase: phase-3
- op: rename
  name: Approval
- op: set_state
  state: NotStarted
- op: set_end
  is_end: true
- op: set_success
  target: 2
- op: clear_selection
";

/// Built-in sample session used by the `demo` command
pub(crate) fn demo_script() -> Result<Vec<EditCommand>, ScriptError> {
    parse_script(DEMO_SCRIPT, Path::new("demo.yaml"))
}
