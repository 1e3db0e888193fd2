//! Error types for the edit engine

/// Errors that can occur while parsing or compiling an edit request
///
/// Text processing itself never fails: malformed bounds are clamped and
/// zero-length matches are skipped over. Only structurally invalid input
/// is an error.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Search pattern failed to compile
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A SEARCH block declares a start line that is not a positive integer
    #[error("Search block {index} declares an invalid start line: {found:?}")]
    InvalidStartLine { index: usize, found: String },

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}
