//! Errors raised while reading or writing records.

use thiserror::Error;

/// Errors that can occur while persisting status snapshots or KPI rows.
#[derive(Debug, Error)]
pub enum RecordError {
    /// I/O error on the underlying file or writer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Snapshot written by an incompatible version
    #[error("unsupported snapshot version {found:?} (expected {expected:?})")]
    UnsupportedVersion { found: String, expected: &'static str },
}
