//! Unified diff rendering and change statistics for applied edits

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Line additions and deletions between two versions of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub additions: usize,
    pub deletions: usize,
}

/// Render a unified diff between the original and edited content.
pub fn unified_diff(old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header("before", "after")
        .to_string()
}

/// Count added and removed lines between two versions.
pub fn change_stats(old: &str, new: &str) -> ChangeStats {
    let diff = TextDiff::from_lines(old, new);
    let mut additions = 0;
    let mut deletions = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => additions += 1,
            ChangeTag::Delete => deletions += 1,
            ChangeTag::Equal => {}
        }
    }
    ChangeStats {
        additions,
        deletions,
    }
}
