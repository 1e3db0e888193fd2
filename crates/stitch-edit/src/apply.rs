//! Sequential application of SEARCH/REPLACE blocks
//!
//! Applies each block against the evolving document through a
//! [`BlockMatcher`], collecting per-block failures without aborting the
//! remaining blocks, so callers can report every failure in one response
//! instead of one retry at a time.

use tracing::warn;

use crate::models::{BlockFailure, ReplacementResult, SearchReplaceBlock};
use crate::offsets;
use crate::text;

/// Locates one search/replace pair in a document and applies it.
///
/// Matching is an external primitive to the engine: implementations may
/// match exactly, with whitespace tolerance, or fuzzily. `start_hint` is
/// the 1-based line where the search text is expected in the current
/// document state, already corrected for drift from earlier blocks.
pub trait BlockMatcher {
    fn apply(
        &self,
        text: &str,
        start_hint: usize,
        search_text: &str,
        replace_text: &str,
    ) -> Result<String, MatchFailure>;
}

/// Structured failure returned by a [`BlockMatcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    pub message: String,
    /// Context for diagnostics, e.g. the text found where a match was expected
    pub detail: Option<String>,
}

/// Apply every block to `original` in declared start line order.
///
/// A block that fails to locate its search text is recorded in
/// `fail_parts` and skipped; later blocks still apply. Blocks whose
/// declared line range overlaps an earlier block's range are rejected
/// the same way, since cumulative drift correction is only sound for
/// non-overlapping ascending edits.
pub fn apply_blocks(
    original: &str,
    blocks: &[SearchReplaceBlock],
    matcher: &dyn BlockMatcher,
) -> ReplacementResult {
    let ordered = offsets::sort_blocks(blocks);
    let mut working = original.to_string();
    let mut fail_parts = Vec::new();
    let mut cumulative_offset: isize = 0;
    let mut previous_end: Option<usize> = None;

    for (index, block) in ordered.iter().enumerate() {
        let search_lines = text::count_lines(&block.search_text);
        let declared_end = block.declared_start_line + search_lines - 1;

        if let Some(previous) = previous_end {
            if block.declared_start_line <= previous {
                warn!(
                    block = index,
                    line = block.declared_start_line,
                    "search/replace block overlaps the previous block"
                );
                fail_parts.push(BlockFailure {
                    block_index: index,
                    declared_start_line: block.declared_start_line,
                    message: "block overlaps the previous block's line range".to_string(),
                    detail: Some(format!("previous block ends at line {previous}")),
                });
                previous_end = Some(previous.max(declared_end));
                continue;
            }
        }
        previous_end = Some(declared_end);

        let hint = (block.declared_start_line as isize + cumulative_offset).max(1) as usize;
        match matcher.apply(&working, hint, &block.search_text, &block.replace_text) {
            Ok(updated) => {
                working = updated;
                cumulative_offset +=
                    text::count_lines(&block.replace_text) as isize - search_lines as isize;
            }
            Err(failure) => {
                warn!(
                    block = index,
                    line = block.declared_start_line,
                    "search/replace block did not apply: {}",
                    failure.message
                );
                fail_parts.push(BlockFailure {
                    block_index: index,
                    declared_start_line: block.declared_start_line,
                    message: failure.message,
                    detail: failure.detail,
                });
            }
        }
    }

    ReplacementResult {
        new_content: working,
        succeeded: fail_parts.is_empty(),
        fail_parts,
    }
}

/// Line-oriented matcher used by default.
///
/// Tries, in order: an exact match at the hinted line, an exact match
/// anywhere in the document, and a whitespace-trimmed match anywhere in
/// the document. An empty search text inserts the replacement before the
/// hinted line. Replacement lines are spliced in verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineMatcher;

impl BlockMatcher for LineMatcher {
    fn apply(
        &self,
        text: &str,
        start_hint: usize,
        search_text: &str,
        replace_text: &str,
    ) -> Result<String, MatchFailure> {
        let separator = text::line_separator(text);
        let lines: Vec<&str> = text.split(separator).collect();
        let replace_lines: Vec<&str> = if replace_text.is_empty() {
            Vec::new()
        } else {
            replace_text.split('\n').collect()
        };

        if search_text.is_empty() {
            let at = start_hint.clamp(1, lines.len() + 1) - 1;
            return Ok(splice(&lines, at, 0, &replace_lines, separator));
        }

        let search_lines: Vec<&str> = search_text.split('\n').collect();
        let window = search_lines.len();
        if window > lines.len() {
            return Err(MatchFailure {
                message: format!(
                    "document has {} lines, search text spans {}",
                    lines.len(),
                    window
                ),
                detail: None,
            });
        }

        let hinted = (start_hint.saturating_sub(1)).min(lines.len() - window);
        let at = if window_matches(&lines, hinted, &search_lines, false) {
            Some(hinted)
        } else {
            find_window(&lines, &search_lines, false)
                .or_else(|| find_window(&lines, &search_lines, true))
        };

        match at {
            Some(at) => Ok(splice(&lines, at, window, &replace_lines, separator)),
            None => Err(MatchFailure {
                message: format!("search text not found near line {start_hint}"),
                detail: Some(format!(
                    "expected at line {}:\n{}\nfound:\n{}",
                    hinted + 1,
                    search_text,
                    lines[hinted..hinted + window].join("\n"),
                )),
            }),
        }
    }
}

/// Replace `remove` lines starting at `at` with `insert`, rejoining with
/// the document's separator.
fn splice(lines: &[&str], at: usize, remove: usize, insert: &[&str], separator: &str) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() - remove + insert.len());
    out.extend_from_slice(&lines[..at]);
    out.extend_from_slice(insert);
    out.extend_from_slice(&lines[at + remove..]);
    out.join(separator)
}

fn window_matches(lines: &[&str], at: usize, search: &[&str], trimmed: bool) -> bool {
    search.iter().enumerate().all(|(offset, wanted)| {
        let found = lines[at + offset];
        if trimmed {
            found.trim() == wanted.trim()
        } else {
            found == *wanted
        }
    })
}

fn find_window(lines: &[&str], search: &[&str], trimmed: bool) -> Option<usize> {
    (0..=lines.len() - search.len()).find(|&at| window_matches(lines, at, search, trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start: usize, search: &str, replace: &str, order: usize) -> SearchReplaceBlock {
        SearchReplaceBlock {
            declared_start_line: start,
            search_text: search.to_string(),
            replace_text: replace.to_string(),
            source_order_index: order,
        }
    }

    #[test]
    fn test_single_block_applies_at_hint() {
        let text = "one\ntwo\nthree";
        let blocks = vec![block(2, "two", "2", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "one\n2\nthree");
    }

    #[test]
    fn test_two_blocks_with_drift() {
        let text = "a\nb\nc\nd";
        let blocks = vec![
            block(2, "b", "b1\nb2", 0),
            block(4, "d", "D", 1),
        ];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "a\nb1\nb2\nc\nD");
    }

    #[test]
    fn test_failing_block_does_not_abort_the_rest() {
        let text = "a\nb\nc";
        let blocks = vec![
            block(1, "not present", "x", 0),
            block(3, "c", "C", 1),
        ];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(!result.succeeded);
        assert_eq!(result.fail_parts.len(), 1);
        assert_eq!(result.fail_parts[0].block_index, 0);
        assert_eq!(result.new_content, "a\nb\nC");
    }

    #[test]
    fn test_blocks_apply_in_declared_order_regardless_of_input_order() {
        let text = "a\nb\nc\nd";
        let blocks = vec![
            block(4, "d", "D", 0),
            block(1, "a", "A\nA2", 1),
        ];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "A\nA2\nb\nc\nD");
    }

    #[test]
    fn test_overlapping_block_is_rejected() {
        let text = "a\nb\nc\nd";
        let blocks = vec![
            block(1, "a\nb", "x", 0),
            block(2, "b", "y", 1),
        ];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(!result.succeeded);
        assert_eq!(result.fail_parts.len(), 1);
        assert!(result.fail_parts[0].message.contains("overlaps"));
        // The first block still applied.
        assert_eq!(result.new_content, "x\nc\nd");
    }

    #[test]
    fn test_matcher_falls_back_to_search_anywhere() {
        let text = "one\ntwo\nthree";
        // Hint is wrong but the text exists elsewhere.
        let blocks = vec![block(1, "three", "3", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "one\ntwo\n3");
    }

    #[test]
    fn test_matcher_tolerates_trimmed_whitespace() {
        let text = "fn main() {\n    let x = 1;\n}";
        let blocks = vec![block(2, "let x = 1;", "    let x = 2;", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "fn main() {\n    let x = 2;\n}");
    }

    #[test]
    fn test_empty_search_inserts_before_hint() {
        let text = "a\nc";
        let blocks = vec![block(2, "", "b", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "a\nb\nc");
    }

    #[test]
    fn test_empty_replace_deletes_lines() {
        let text = "a\nb\nc";
        let blocks = vec![block(2, "b", "", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "a\nc");
    }

    #[test]
    fn test_failure_detail_reports_found_text() {
        let text = "a\nb\nc";
        let blocks = vec![block(2, "zzz", "x", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(!result.succeeded);
        let detail = result.fail_parts[0].detail.as_deref().unwrap();
        assert!(detail.contains("zzz"));
        assert!(detail.contains('b'));
    }

    #[test]
    fn test_search_longer_than_document_fails_cleanly() {
        let text = "a";
        let blocks = vec![block(1, "a\nb\nc", "x", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(!result.succeeded);
        assert_eq!(result.new_content, "a");
    }

    #[test]
    fn test_crlf_document_keeps_separator() {
        let text = "one\r\ntwo\r\nthree";
        let blocks = vec![block(2, "two", "2", 0)];
        let result = apply_blocks(text, &blocks, &LineMatcher);
        assert!(result.succeeded);
        assert_eq!(result.new_content, "one\r\n2\r\nthree");
    }
}
