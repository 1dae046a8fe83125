//! Designer configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields the stock canvas and writes the export to the
//! current directory.

use phasegraph_export::{Exporter, DEFAULT_EXPORT_FILE_NAME};
use phasegraph_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where and under which name the export is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ExportConfig {
    pub(crate) output_dir: PathBuf,
    pub(crate) file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// Top-level designer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DesignerConfig {
    /// Grid constants
    pub(crate) layout: LayoutConfig,
    /// Export destination
    pub(crate) export: ExportConfig,
    /// Tracing filter used when `RUST_LOG` is unset
    pub(crate) log_filter: String,
}

impl DesignerConfig {
    /// Parse configuration from TOML text
    pub(crate) fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a TOML file
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load `path` if given, else defaults
    pub(crate) fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// With export directory
    #[must_use]
    pub(crate) fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export.output_dir = dir.into();
        self
    }

    /// Exporter for the configured destination
    pub(crate) fn exporter(&self) -> Exporter {
        Exporter::new(&self.export.output_dir).with_file_name(&self.export.file_name)
    }
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            export: ExportConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_is_default() {
        let config = DesignerConfig::from_toml_str("", Path::new("inline")).unwrap();
        assert_eq!(config, DesignerConfig::default());
        assert_eq!(config.exporter().target_path(), Path::new("./application-lifecycle.json"));
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let text = r#"
log_filter = "debug"

[layout]
phase_gap = 300

[export]
file_name = "lifecycle.json"
"#;
        let config = DesignerConfig::from_toml_str(text, Path::new("inline")).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.layout.phase_gap, 300);
        assert_eq!(config.layout.start_x, 60);
        assert_eq!(config.export.file_name, "lifecycle.json");
        assert_eq!(config.export.output_dir, PathBuf::from("."));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nstart_x = 0").unwrap();
        let config = DesignerConfig::load(file.path()).unwrap();
        assert_eq!(config.layout.start_x, 0);
    }

    #[test]
    fn bad_toml_reports_parse_error() {
        let err = DesignerConfig::from_toml_str("layout = 3", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = DesignerConfig::load(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn output_dir_override() {
        let config = DesignerConfig::default().with_output_dir("/tmp/x");
        assert_eq!(config.exporter().target_path(), Path::new("/tmp/x/application-lifecycle.json"));
    }
}
