//! Error types for lifecycle export

use std::path::PathBuf;

/// Export failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Rendering the records to JSON failed
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the export file failed
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Destination path, for I/O failures
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Serialize(_) => None,
        }
    }
}
