//! Error types for the edit tools

use std::path::PathBuf;
use std::time::Duration;

/// Errors surfaced by the edit tool boundary
///
/// Only structurally missing data and absent files are hard errors; the
/// engine reports per-block failures and no-op edits inside a successful
/// [`crate::edit::EditOutcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A required request field was absent
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Target file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The diff contained no parsable SEARCH/REPLACE block
    #[error("No search/replace blocks could be parsed from the diff")]
    NoBlocksParsed,

    /// The edit request was structurally invalid
    #[error("Invalid edit request: {0}")]
    Edit(#[from] stitch_edit::EditError),

    /// Request or response could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The edit did not complete within the allowed time
    #[error("Edit operation exceeded {0:?} timeout")]
    Timeout(Duration),
}
