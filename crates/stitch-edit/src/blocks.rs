//! SEARCH/REPLACE block parsing
//!
//! Recognizes the textual convention used by edit requests:
//!
//! ```text
//! <<<<<<< SEARCH
//! :start_line:42
//! -------
//! old text
//! =======
//! new text
//! >>>>>>> REPLACE
//! ```
//!
//! Multiple blocks may be concatenated in one diff text. Each block's
//! search and replace text extends only to the next marker, never across
//! block boundaries. When no block matches this grammar, the parser
//! falls back to a legacy single-block form in which the `-------`
//! separator and the `:start_line:` declaration may be omitted (the
//! start line defaults to 1).

use crate::error::EditError;
use crate::models::SearchReplaceBlock;

const SEARCH_MARKER: &str = "<<<<<<< SEARCH";
const SEPARATOR_MARKER: &str = "-------";
const DIVIDER_MARKER: &str = "=======";
const REPLACE_MARKER: &str = ">>>>>>> REPLACE";
const START_LINE_PREFIX: &str = ":start_line:";

/// Parse every SEARCH/REPLACE block out of a diff text, in source order.
///
/// Returns an empty vector when the text contains no block at all;
/// callers must treat that as a distinct case from a parse error, which
/// is only raised for a structurally present but invalid declaration.
pub fn parse_blocks(diff_text: &str) -> Result<Vec<SearchReplaceBlock>, EditError> {
    let blocks = scan(diff_text, true)?;
    if !blocks.is_empty() {
        return Ok(blocks);
    }
    let mut legacy = scan(diff_text, false)?;
    legacy.truncate(1);
    Ok(legacy)
}

/// Line-oriented scan for blocks. `strict` requires the `:start_line:`
/// declaration and the `-------` separator; the legacy grammar treats
/// both as optional.
fn scan(diff_text: &str, strict: bool) -> Result<Vec<SearchReplaceBlock>, EditError> {
    let mut blocks = Vec::new();
    let mut lines = diff_text.lines().peekable();

    while let Some(line) = lines.next() {
        if line.trim_end() != SEARCH_MARKER {
            continue;
        }
        let index = blocks.len();

        // Metadata lines of the form `:name:value` directly after the
        // marker. Only `:start_line:` is meaningful; others are skipped.
        let mut declared_start_line = None;
        while let Some(next) = lines.peek() {
            let meta = next.trim();
            if let Some(value) = meta.strip_prefix(START_LINE_PREFIX) {
                let value = value.trim();
                declared_start_line = Some(value.parse::<usize>().map_err(|_| {
                    EditError::InvalidStartLine {
                        index,
                        found: value.to_string(),
                    }
                })?);
                lines.next();
            } else if meta.starts_with(':') && meta[1..].contains(':') {
                lines.next();
            } else {
                break;
            }
        }

        let has_separator = matches!(lines.peek(), Some(l) if l.trim_end() == SEPARATOR_MARKER);
        if has_separator {
            lines.next();
        }
        if strict && (declared_start_line.is_none() || !has_separator) {
            // Not a match for the strict grammar; skip to the next marker.
            continue;
        }

        let mut search_lines = Vec::new();
        let mut divided = false;
        for l in lines.by_ref() {
            if l.trim_end() == DIVIDER_MARKER {
                divided = true;
                break;
            }
            search_lines.push(l);
        }
        if !divided {
            break;
        }

        let mut replace_lines = Vec::new();
        let mut closed = false;
        for l in lines.by_ref() {
            if l.trim_end() == REPLACE_MARKER {
                closed = true;
                break;
            }
            replace_lines.push(l);
        }
        if !closed {
            break;
        }

        blocks.push(SearchReplaceBlock {
            declared_start_line: declared_start_line.unwrap_or(1),
            search_text: search_lines.join("\n"),
            replace_text: replace_lines.join("\n"),
            source_order_index: index,
        });
    }

    Ok(blocks)
}
