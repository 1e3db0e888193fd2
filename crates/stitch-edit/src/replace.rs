//! Bounded search-and-replace over in-memory text
//!
//! Replaces pattern occurrences across a whole document, or only within
//! an optional 1-based inclusive line/column window. Lines outside the
//! window pass through byte-for-byte; within the window, column bounds
//! restrict each line independently.

use regex::{NoExpand, Regex, RegexBuilder};

use crate::error::EditError;
use crate::text;

/// Options controlling how a search pattern is matched and bounded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Treat the pattern as a regular expression instead of literal text
    pub use_regex: bool,
    /// Case-insensitive matching
    pub ignore_case: bool,
    /// 1-based inclusive line bounds restricting which lines are eligible
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
    /// 1-based inclusive column bounds, applied per line within the line bounds
    pub start_column: Option<usize>,
    pub end_column: Option<usize>,
}

impl ReplaceOptions {
    pub(crate) fn has_column_bounds(&self) -> bool {
        self.start_column.is_some() || self.end_column.is_some()
    }

    pub(crate) fn bounded(&self) -> bool {
        self.start_line.is_some()
            || self.end_line.is_some()
            || self.has_column_bounds()
    }

    /// Line range `[first, last]` for a document of `total` lines, with
    /// absent bounds defaulting to the first and last line.
    pub(crate) fn line_range(&self, total: usize) -> (usize, usize) {
        let first = self.start_line.unwrap_or(1).max(1);
        let last = self.end_line.unwrap_or(total).min(total);
        (first, last)
    }
}

/// Compile the search pattern according to the options.
///
/// Literal patterns are escaped first so that metacharacters such as
/// `. * + ? ^ $ { } ( ) | [ ] \` match verbatim.
pub fn compile_pattern(pattern: &str, options: &ReplaceOptions) -> Result<Regex, EditError> {
    let source = if options.use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    let regex = RegexBuilder::new(&source)
        .case_insensitive(options.ignore_case)
        .build()?;
    Ok(regex)
}

/// Replace all non-overlapping occurrences of `pattern` in `text`.
///
/// Without bounds this is a single global left-to-right pass. With any
/// bound, lines outside the line range pass through unchanged and column
/// bounds restrict replacement to a per-line window. A result identical
/// to the input is a valid no-op, not an error.
pub fn replace(
    text: &str,
    pattern: &str,
    replacement: &str,
    options: &ReplaceOptions,
) -> Result<String, EditError> {
    let regex = compile_pattern(pattern, options)?;
    if !options.bounded() {
        return Ok(substitute(&regex, text, replacement, options.use_regex));
    }

    let separator = text::line_separator(text);
    let lines: Vec<&str> = text.split(separator).collect();
    let (first, last) = options.line_range(lines.len());

    let mut out = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let number = idx + 1;
        if number < first || number > last {
            out.push((*line).to_string());
        } else if options.has_column_bounds() {
            out.push(replace_in_columns(&regex, line, replacement, options));
        } else {
            out.push(substitute(&regex, line, replacement, options.use_regex));
        }
    }
    Ok(out.join(separator))
}

/// Replace within the column window of one line, reassembling
/// `prefix + replaced + suffix`. A window where the start column is not
/// strictly before the end column is not well-formed and leaves the
/// line unchanged.
fn replace_in_columns(
    regex: &Regex,
    line: &str,
    replacement: &str,
    options: &ReplaceOptions,
) -> String {
    match column_window(line, options) {
        Some((from, to)) => {
            let replaced = substitute(regex, &line[from..to], replacement, options.use_regex);
            format!("{}{}{}", &line[..from], replaced, &line[to..])
        }
        None => line.to_string(),
    }
}

/// Byte range of the column-bounded window within `line`, or `None`
/// when the bounds do not form a window.
pub(crate) fn column_window(line: &str, options: &ReplaceOptions) -> Option<(usize, usize)> {
    let start_column = options.start_column.unwrap_or(1).max(1);
    let end_column = options
        .end_column
        .unwrap_or_else(|| line.chars().count() + 1);
    if start_column >= end_column {
        return None;
    }
    let from = text::byte_of_column(line, start_column);
    let to = text::byte_of_column(line, end_column);
    if from >= to {
        return None;
    }
    Some((from, to))
}

/// Run the actual substitution. Literal replacements are inserted
/// verbatim; in regex mode `$n` capture references expand as usual.
fn substitute(regex: &Regex, text: &str, replacement: &str, expand: bool) -> String {
    if expand {
        regex.replace_all(text, replacement).into_owned()
    } else {
        regex.replace_all(text, NoExpand(replacement)).into_owned()
    }
}
