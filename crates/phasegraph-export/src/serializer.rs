//! Lifecycle export serializer
//!
//! Projects a graph into lifecycle records and renders them as indented
//! JSON. Pure functions of the graph; writing the file is the only side
//! effect and lives in [`Exporter::write`].

use crate::dto::LifecyclePhaseDto;
use crate::error::ExportError;
use phasegraph_model::PhaseGraph;
use std::path::PathBuf;

/// File name the designer offers for download
pub const DEFAULT_EXPORT_FILE_NAME: &str = "application-lifecycle.json";

/// Project every phase into its export record
#[must_use]
pub fn export_structure(graph: &PhaseGraph) -> Vec<LifecyclePhaseDto> {
    graph.phases().iter().map(LifecyclePhaseDto::from).collect()
}

/// Render the export records as 2-space indented JSON
///
/// # Errors
/// Returns error if serialization fails
pub fn export_json(graph: &PhaseGraph) -> Result<String, ExportError> {
    let records = export_structure(graph);
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Writes export files into a directory
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    file_name: String,
}

impl Exporter {
    /// Exporter writing `application-lifecycle.json` into `output_dir`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }

    /// With a different file name
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Full path of the export file
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    /// Render `graph` and write it, returning the written path
    ///
    /// # Errors
    /// Returns error if serialization or the file write fails
    pub fn write(&self, graph: &PhaseGraph) -> Result<PathBuf, ExportError> {
        let json = export_json(graph)?;
        let path = self.target_path();
        std::fs::write(&path, json.as_bytes()).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), phases = graph.len(), "wrote lifecycle export");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_graph_export_text() {
        let graph = PhaseGraph::new();
        let json = export_json(&graph).unwrap();
        let expected = r#"[
  {
    "id": "phase-1",
    "name": "Phase 1",
    "lifecycleState": "InProgress",
    "isEnd": false,
    "subPhases": []
  }
]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn target_path_joins_file_name() {
        let exporter = Exporter::new("/tmp/out").with_file_name("lifecycle.json");
        assert_eq!(exporter.target_path(), PathBuf::from("/tmp/out/lifecycle.json"));
    }

    #[test]
    fn write_to_missing_dir_reports_path() {
        let exporter = Exporter::new("/definitely/not/a/real/dir");
        let err = exporter.write(&PhaseGraph::new()).unwrap_err();
        assert_eq!(
            err.path(),
            Some(&PathBuf::from("/definitely/not/a/real/dir/application-lifecycle.json"))
        );
    }
}
