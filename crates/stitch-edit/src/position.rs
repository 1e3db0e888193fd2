//! Best-effort resolution of where an edit landed
//!
//! Columns are recovered by searching the final document for the
//! replacement text, because matchers may re-indent or otherwise perturb
//! exact offsets. The resolved spans are reasonable anchors for moving
//! editor focus, not guaranteed byte-exact ranges; when the replacement
//! text cannot be found verbatim, a deterministic whitespace-based
//! fallback is used instead.

use regex::Regex;

use crate::error::EditError;
use crate::replace::{column_window, compile_pattern, ReplaceOptions};
use crate::text;

/// A resolved span in 1-based line/column coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

/// Resolve the span of a block's replacement within the final document.
///
/// `adjusted_start_line` and `adjusted_end_line` come from the offset
/// tracker. Start column: the trimmed first line of the replacement is
/// located in the final start line, falling back to the replacement's
/// own leading indentation. End column: the right-trimmed last line of
/// the replacement is located in the final end line, falling back to the
/// end of that line's content.
pub fn resolve_block_position(
    final_text: &str,
    adjusted_start_line: usize,
    adjusted_end_line: usize,
    replace_text: &str,
) -> ResolvedSpan {
    let separator = text::line_separator(final_text);
    let lines: Vec<&str> = final_text.split(separator).collect();
    let last_line = lines.len().max(1);
    let start_line = adjusted_start_line.clamp(1, last_line);
    let end_line = adjusted_end_line.clamp(start_line, last_line);

    let first_replace = replace_text.split('\n').next().unwrap_or("");
    let last_replace = replace_text.split('\n').next_back().unwrap_or("");

    let start_hay = lines.get(start_line - 1).copied().unwrap_or("");
    let needle = first_replace.trim();
    let start_column = match (!needle.is_empty()).then(|| start_hay.find(needle)).flatten() {
        Some(byte) => text::column_at_byte(start_hay, byte),
        None => text::leading_whitespace(first_replace) + 1,
    };

    let end_hay = lines.get(end_line - 1).copied().unwrap_or("");
    let tail = last_replace.trim_end();
    let end_column = match (!tail.is_empty()).then(|| end_hay.find(tail)).flatten() {
        Some(byte) => text::column_at_byte(end_hay, byte) + tail.chars().count(),
        None => end_hay.trim_end().chars().count() + 1,
    };

    ResolvedSpan {
        start_line,
        end_line,
        start_column,
        end_column,
    }
}

/// Resolve the span left by a bounded search-and-replace.
///
/// The *last* match of `pattern` within the requested bounds anchors the
/// span in the original text; its end is then advanced by the shape of
/// the replacement so the span covers where the replacement's own text
/// ends. Returns `None` when no match qualifies, which is not an error;
/// there is simply nothing to track.
pub fn resolve_replace_position(
    original: &str,
    pattern: &str,
    replacement: &str,
    options: &ReplaceOptions,
) -> Result<Option<ResolvedSpan>, EditError> {
    let regex = compile_pattern(pattern, options)?;
    let anchor = if options.bounded() {
        last_bounded_match(original, &regex, options)
    } else {
        last_global_match(original, &regex)
    };
    Ok(anchor.map(|(line, column)| span_for_replacement(line, column, replacement)))
}

/// Last match anywhere in the document, as a 1-based (line, column).
///
/// `find_iter` steps past zero-length matches on its own, so an empty
/// pattern terminates after at most text length + 1 matches.
fn last_global_match(text: &str, regex: &Regex) -> Option<(usize, usize)> {
    let found = regex.find_iter(text).last()?;
    Some(text::line_col_at(text, found.start()))
}

/// Last match within the line/column bounds. Column bounds restrict each
/// line independently, matching the replacer's semantics.
fn last_bounded_match(
    text: &str,
    regex: &Regex,
    options: &ReplaceOptions,
) -> Option<(usize, usize)> {
    let separator = text::line_separator(text);
    let lines: Vec<&str> = text.split(separator).collect();
    let (first, last) = options.line_range(lines.len());

    let mut anchor = None;
    for number in first..=last {
        let line = lines[number - 1];
        let (from, to) = if options.has_column_bounds() {
            match column_window(line, options) {
                Some(window) => window,
                None => continue,
            }
        } else {
            (0, line.len())
        };
        for found in regex.find_iter(&line[from..to]) {
            anchor = Some((number, text::column_at_byte(line, from + found.start())));
        }
    }
    anchor
}

/// Advance a match anchor by the shape of the replacement text.
fn span_for_replacement(start_line: usize, start_column: usize, replacement: &str) -> ResolvedSpan {
    match replacement.rsplit_once('\n') {
        Some((_, tail)) => ResolvedSpan {
            start_line,
            end_line: start_line + text::count_lines(replacement) - 1,
            start_column,
            end_column: tail.chars().count() + 1,
        },
        None => ResolvedSpan {
            start_line,
            end_line: start_line,
            start_column,
            end_column: start_column + replacement.chars().count(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_position_exact_match() {
        let final_text = "line1\nL2\nline3";
        let span = resolve_block_position(final_text, 2, 2, "L2");
        assert_eq!(span.start_line, 2);
        assert_eq!(span.end_line, 2);
        assert_eq!(span.start_column, 1);
        assert_eq!(span.end_column, 3);
    }

    #[test]
    fn test_block_position_finds_indented_replacement() {
        let final_text = "fn main() {\n    let x = 2;\n}";
        let span = resolve_block_position(final_text, 2, 2, "let x = 2;");
        assert_eq!(span.start_column, 5);
        assert_eq!(span.end_column, 15);
    }

    #[test]
    fn test_block_position_multiline_replacement() {
        let final_text = "a\nnew1\nnew2\nb";
        let span = resolve_block_position(final_text, 2, 3, "new1\nnew2");
        assert_eq!(span.start_line, 2);
        assert_eq!(span.end_line, 3);
        assert_eq!(span.start_column, 1);
        assert_eq!(span.end_column, 5);
    }

    #[test]
    fn test_block_position_fallback_when_content_diverged() {
        // The matcher reformatted the replacement, so the substring
        // search misses; columns fall back to indentation and line end.
        let final_text = "\t\treformatted();\nother";
        let span = resolve_block_position(final_text, 1, 1, "    original();");
        assert_eq!(span.start_column, 5);
        assert_eq!(span.end_column, final_text.lines().next().unwrap().len() + 1);
    }

    #[test]
    fn test_block_position_clamps_out_of_range_lines() {
        let span = resolve_block_position("only", 5, 9, "x");
        assert_eq!(span.start_line, 1);
        assert_eq!(span.end_line, 1);
    }

    #[test]
    fn test_simple_position_single_line() {
        let options = ReplaceOptions::default();
        let span = resolve_replace_position("line1\nline2\nline3", "line2", "L2", &options)
            .unwrap()
            .unwrap();
        assert_eq!(span.start_line, 2);
        assert_eq!(span.end_line, 2);
        assert_eq!(span.start_column, 1);
        assert_eq!(span.end_column, 3);
    }

    #[test]
    fn test_simple_position_last_match_wins() {
        let options = ReplaceOptions::default();
        let span = resolve_replace_position("foo foo foo", "foo", "bar", &options)
            .unwrap()
            .unwrap();
        // Anchored at the third occurrence (column 9), advanced by the
        // replacement's own length.
        assert_eq!(span.start_line, 1);
        assert_eq!(span.start_column, 9);
        assert_eq!(span.end_column, 12);
    }

    #[test]
    fn test_simple_position_multiline_replacement() {
        let options = ReplaceOptions::default();
        let span = resolve_replace_position("a b", "b", "x\nyz", &options)
            .unwrap()
            .unwrap();
        assert_eq!(span.start_line, 1);
        assert_eq!(span.end_line, 2);
        assert_eq!(span.start_column, 3);
        assert_eq!(span.end_column, 3);
    }

    #[test]
    fn test_simple_position_respects_line_bounds() {
        let options = ReplaceOptions {
            start_line: Some(1),
            end_line: Some(2),
            ..Default::default()
        };
        let span = resolve_replace_position("foo\nfoo\nfoo", "foo", "bar", &options)
            .unwrap()
            .unwrap();
        assert_eq!(span.start_line, 2);
    }

    #[test]
    fn test_simple_position_respects_column_bounds() {
        let options = ReplaceOptions {
            start_line: Some(1),
            end_line: Some(1),
            start_column: Some(1),
            end_column: Some(4),
            ..Default::default()
        };
        let span = resolve_replace_position("foo foo foo", "foo", "bar", &options)
            .unwrap()
            .unwrap();
        assert_eq!(span.start_column, 1);
    }

    #[test]
    fn test_simple_position_none_when_no_match() {
        let options = ReplaceOptions::default();
        let span = resolve_replace_position("abc", "zzz", "x", &options).unwrap();
        assert!(span.is_none());
    }

    #[test]
    fn test_empty_pattern_scan_terminates() {
        let options = ReplaceOptions::default();
        // An empty literal matches at every position; the scan must
        // still terminate and anchor at the end of the text.
        let span = resolve_replace_position("abc", "", "x", &options)
            .unwrap()
            .unwrap();
        assert_eq!(span.start_line, 1);
        assert_eq!(span.start_column, 4);
    }

    #[test]
    fn test_ignore_case_affects_anchor() {
        let options = ReplaceOptions {
            ignore_case: true,
            ..Default::default()
        };
        let span = resolve_replace_position("FOO bar", "foo", "x", &options)
            .unwrap()
            .unwrap();
        assert_eq!(span.start_column, 1);
    }
}
