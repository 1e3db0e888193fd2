//! Cumulative line-drift correction for ordered blocks
//!
//! Once a block inserts or removes lines, every block declared further
//! down the original file shifts by the net delta. The tracker computes,
//! for each block, the line range it occupies in the document after all
//! earlier blocks have been applied. Blocks are processed in declared
//! start line order and never revisited, so each delta only affects the
//! blocks that follow it.

use crate::models::SearchReplaceBlock;
use crate::text;

/// A block together with its drift-corrected line range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustedBlock {
    pub block: SearchReplaceBlock,
    /// 1-based start line in the document after earlier blocks applied
    pub adjusted_start_line: usize,
    /// 1-based inclusive end line of the block's replacement text
    pub adjusted_end_line: usize,
}

/// Sort blocks into application order: declared start line ascending,
/// stable on source order for ties.
pub fn sort_blocks(blocks: &[SearchReplaceBlock]) -> Vec<SearchReplaceBlock> {
    let mut ordered = blocks.to_vec();
    ordered.sort_by_key(|block| (block.declared_start_line, block.source_order_index));
    ordered
}

/// Resolve each block's adjusted line range.
pub fn resolve_adjusted_lines(blocks: &[SearchReplaceBlock]) -> Vec<AdjustedBlock> {
    let mut adjusted = Vec::with_capacity(blocks.len());
    let mut cumulative_offset: isize = 0;

    for block in sort_blocks(blocks) {
        let search_lines = text::count_lines(&block.search_text);
        let replace_lines = text::count_lines(&block.replace_text);

        let start = block.declared_start_line as isize + cumulative_offset;
        let adjusted_start_line = start.max(1) as usize;
        let adjusted_end_line = adjusted_start_line + replace_lines - 1;

        cumulative_offset += replace_lines as isize - search_lines as isize;
        adjusted.push(AdjustedBlock {
            block,
            adjusted_start_line,
            adjusted_end_line,
        });
    }

    adjusted
}
