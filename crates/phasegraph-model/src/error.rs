//! Error types for the phase graph model
//!
//! Graph edits never fail. These errors only arise when ids or targets are
//! parsed from text supplied by a caller.

/// Identifier and target parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Text is not of the form `phase-N` with N >= 1
    #[error("malformed phase id: {0:?}")]
    MalformedPhaseId(String),

    /// End marker number outside the fixed set
    #[error("end marker {0} out of range (expected 1..=3)")]
    EndOutOfRange(u8),

    /// Text names neither a phase nor an end marker
    #[error("malformed target: {0:?}")]
    MalformedTarget(String),
}
