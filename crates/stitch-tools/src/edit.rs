//! Edit engine façade
//!
//! Validates edit requests, reads the original text through the
//! [`FileSource`] seam, runs the core transformation, resolves where the
//! last change landed, and records that position in the session's store.
//! The engine never writes files; callers persist `new_content` after
//! whatever approval flow they run.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use stitch_edit::{
    apply_blocks, parse_blocks, replace, resolve_adjusted_lines, resolve_block_position,
    resolve_replace_position, BlockFailure, BlockMatcher, EditPosition, EditPositionStore,
    EditType, LineMatcher, ReplaceOptions,
};

use crate::error::ToolError;
use crate::report::{self, ChangeStats};
use crate::source::FileSource;

/// Request for a bounded search-and-replace edit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchReplaceInput {
    /// Path of the file to edit, relative to the workspace
    #[serde(default)]
    pub path: String,
    /// Text or pattern to search for
    pub search: Option<String>,
    /// Replacement text; an empty string deletes the matches
    pub replace: Option<String>,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default)]
    pub ignore_case: bool,
    /// Optional 1-based inclusive line bounds
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
    /// Optional 1-based inclusive column bounds within the bounded lines
    pub start_column: Option<usize>,
    pub end_column: Option<usize>,
}

impl SearchReplaceInput {
    fn options(&self) -> ReplaceOptions {
        ReplaceOptions {
            use_regex: self.use_regex,
            ignore_case: self.ignore_case,
            start_line: self.start_line,
            end_line: self.end_line,
            start_column: self.start_column,
            end_column: self.end_column,
        }
    }
}

/// Request to apply one or more SEARCH/REPLACE blocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyDiffInput {
    /// Path of the file to edit, relative to the workspace
    #[serde(default)]
    pub path: String,
    /// Diff text containing the SEARCH/REPLACE blocks
    pub diff: Option<String>,
}

/// Result of one edit invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOutcome {
    /// True when the whole request applied
    pub success: bool,
    /// True when the computed text equals the original; an informational
    /// no-op, not an error
    pub no_change: bool,
    /// The document after the edit; callers persist it
    pub new_content: String,
    /// Where the last change landed, when one was resolved
    pub position: Option<EditPosition>,
    /// Per-block failures, for block-mode requests
    pub fail_parts: Vec<BlockFailure>,
    /// Unified diff of the applied change, for display
    pub unified_diff: Option<String>,
    /// Line additions and deletions of the applied change
    pub stats: Option<ChangeStats>,
    /// Consecutive failed edits recorded against this file
    pub consecutive_failures: u32,
}

impl EditOutcome {
    fn no_change(content: String, consecutive_failures: u32) -> Self {
        Self {
            success: true,
            no_change: true,
            new_content: content,
            position: None,
            fail_parts: Vec::new(),
            unified_diff: None,
            stats: None,
            consecutive_failures,
        }
    }
}

/// Consecutive-failure counter per file path
///
/// Lets callers escalate diagnostics after repeated failures on the same
/// file instead of surfacing the same terse error forever. Resets when
/// an edit to the file succeeds.
#[derive(Debug, Default)]
pub struct FailureTally {
    counts: RwLock<HashMap<String, u32>>,
}

impl FailureTally {
    pub fn record_failure(&self, path: &str) -> u32 {
        let mut counts = self
            .counts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let count = counts.entry(path.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn reset(&self, path: &str) {
        let mut counts = self
            .counts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        counts.remove(path);
    }

    pub fn count(&self, path: &str) -> u32 {
        let counts = self.counts.read().unwrap_or_else(PoisonError::into_inner);
        counts.get(path).copied().unwrap_or(0)
    }
}

/// The edit tool entry point
///
/// Owns the position store and failure tally for one edit session;
/// construct one per session and tear it down with the session.
pub struct EditEngine<S> {
    source: S,
    store: EditPositionStore,
    matcher: Box<dyn BlockMatcher + Send + Sync>,
    tally: FailureTally,
}

impl<S: FileSource> EditEngine<S> {
    pub fn new(source: S, store: EditPositionStore) -> Self {
        Self {
            source,
            store,
            matcher: Box::new(LineMatcher),
            tally: FailureTally::default(),
        }
    }

    /// Swap the block matching primitive, e.g. for a fuzzier matcher.
    pub fn with_matcher(mut self, matcher: Box<dyn BlockMatcher + Send + Sync>) -> Self {
        self.matcher = matcher;
        self
    }

    /// The session's position store.
    pub fn store(&self) -> &EditPositionStore {
        &self.store
    }

    /// Consecutive failed edits recorded against a file.
    pub fn consecutive_failures(&self, path: &str) -> u32 {
        self.tally.count(path)
    }

    /// Perform a bounded search-and-replace edit.
    pub fn search_replace(&self, input: &SearchReplaceInput) -> Result<EditOutcome, ToolError> {
        let path = require(&input.path, "path")?;
        let search = input
            .search
            .as_deref()
            .ok_or(ToolError::MissingParameter("search"))?;
        let replacement = input
            .replace
            .as_deref()
            .ok_or(ToolError::MissingParameter("replace"))?;

        let original = self.source.read(Path::new(path))?;
        let options = input.options();
        let new_content = replace(&original, search, replacement, &options)?;

        if new_content == original {
            debug!("search/replace on {} produced no change", path);
            return Ok(EditOutcome::no_change(new_content, self.tally.count(path)));
        }

        let edit_type = if search.is_empty() {
            EditType::Insert
        } else {
            EditType::Replace
        };
        let position = resolve_replace_position(&original, search, replacement, &options)?.map(
            |span| EditPosition {
                file_path: path.to_string(),
                start_line: span.start_line,
                end_line: span.end_line,
                start_column: Some(span.start_column),
                end_column: Some(span.end_column),
                edit_type,
            },
        );
        if let Some(position) = &position {
            self.store.track_position(path, position.clone())?;
        }
        self.tally.reset(path);

        Ok(EditOutcome {
            success: true,
            no_change: false,
            unified_diff: Some(report::unified_diff(&original, &new_content)),
            stats: Some(report::change_stats(&original, &new_content)),
            new_content,
            position,
            fail_parts: Vec::new(),
            consecutive_failures: 0,
        })
    }

    /// Apply one or more SEARCH/REPLACE blocks to a file.
    pub fn apply_diff(&self, input: &ApplyDiffInput) -> Result<EditOutcome, ToolError> {
        let path = require(&input.path, "path")?;
        let diff = input
            .diff
            .as_deref()
            .ok_or(ToolError::MissingParameter("diff"))?;

        let blocks = parse_blocks(diff)?;
        if blocks.is_empty() {
            return Err(ToolError::NoBlocksParsed);
        }

        let original = self.source.read(Path::new(path))?;
        let result = apply_blocks(&original, &blocks, self.matcher.as_ref());

        let consecutive = if result.succeeded {
            self.tally.reset(path);
            0
        } else {
            self.tally.record_failure(path)
        };

        if result.new_content == original {
            debug!("diff on {} produced no change", path);
            let mut outcome = EditOutcome::no_change(result.new_content, consecutive);
            outcome.success = result.succeeded;
            outcome.fail_parts = result.fail_parts;
            return Ok(outcome);
        }

        let adjusted = resolve_adjusted_lines(&blocks);
        let failed: HashSet<usize> = result.fail_parts.iter().map(|f| f.block_index).collect();
        let position = adjusted
            .iter()
            .enumerate()
            .rev()
            .find(|(index, _)| !failed.contains(index))
            .map(|(_, entry)| {
                let span = resolve_block_position(
                    &result.new_content,
                    entry.adjusted_start_line,
                    entry.adjusted_end_line,
                    &entry.block.replace_text,
                );
                EditPosition {
                    file_path: path.to_string(),
                    start_line: span.start_line,
                    end_line: span.end_line,
                    start_column: Some(span.start_column),
                    end_column: Some(span.end_column),
                    edit_type: EditType::Modify,
                }
            });
        if let Some(position) = &position {
            self.store.track_position(path, position.clone())?;
        }

        Ok(EditOutcome {
            success: result.succeeded,
            no_change: false,
            unified_diff: Some(report::unified_diff(&original, &result.new_content)),
            stats: Some(report::change_stats(&original, &result.new_content)),
            new_content: result.new_content,
            position,
            fail_parts: result.fail_parts,
            consecutive_failures: consecutive,
        })
    }
}

fn require<'a>(value: &'a str, name: &'static str) -> Result<&'a str, ToolError> {
    if value.is_empty() {
        Err(ToolError::MissingParameter(name))
    } else {
        Ok(value)
    }
}
