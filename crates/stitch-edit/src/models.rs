//! Data model shared by the edit engine components

use serde::{Deserialize, Serialize};

/// Classifies the nature of an edit
///
/// Informational only; no arithmetic depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditType {
    /// Existing content was changed in place
    Modify,
    /// New content was inserted without removing anything
    Insert,
    /// Content was replaced by a search-and-replace request
    Replace,
    /// The file itself was created by the edit
    Create,
}

/// One resolved location of interest in an edited file
///
/// Lines are 1-based and inclusive. Columns are 1-based; `None` means
/// the whole line. Invariant: `start_line <= end_line`, and when both
/// columns are present on a single line, `start_column <= end_column + 1`
/// (an empty insertion point is valid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPosition {
    /// Relative path of the edited file
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: Option<usize>,
    pub end_column: Option<usize>,
    pub edit_type: EditType,
}

/// A single SEARCH/REPLACE block as written in an edit request
///
/// Created by the parser, consumed once by the offset tracker and the
/// applier, then discarded. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReplaceBlock {
    /// Start line as declared in the request, before drift correction
    pub declared_start_line: usize,
    pub search_text: String,
    pub replace_text: String,
    /// Position in the original request, for tie-breaking equal start lines
    pub source_order_index: usize,
}

/// Failure detail for one block that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFailure {
    /// Index of the block in application order
    pub block_index: usize,
    /// Start line the block declared
    pub declared_start_line: usize,
    /// Human-readable description of why the block did not apply
    pub message: String,
    /// Structured context, e.g. the text found where a match was expected
    pub detail: Option<String>,
}

/// Outcome of applying a sequence of blocks to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementResult {
    /// The document after every block that did apply
    pub new_content: String,
    /// True only when every block applied
    pub succeeded: bool,
    /// One entry per block that failed to apply
    pub fail_parts: Vec<BlockFailure>,
}
