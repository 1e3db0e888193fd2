//! Stitch edit engine
//!
//! Diff application and edit-position resolution for the Stitch coding
//! assistant. Given an edit request expressed either as a bounded
//! search-and-replace or as one or more line-anchored SEARCH/REPLACE
//! blocks, the engine computes the resulting document, per-block
//! success/failure, and the precise line/column span of the last change
//! so the editor can move focus there after the edit lands.
//!
//! Everything in this crate is a synchronous pure function over
//! in-memory strings, except [`store::EditPositionStore`], which is a
//! small mutable map owned by the editing session. The engine never
//! touches the filesystem and never decides *whether* an edit should be
//! applied; both concerns belong to the caller.
//!
//! # Modules
//!
//! - [`replace`] - Bounded and global search-and-replace
//! - [`blocks`] - SEARCH/REPLACE block parsing
//! - [`apply`] - Sequential block application behind a matcher seam
//! - [`offsets`] - Cumulative line-drift correction
//! - [`position`] - Best-effort resolution of where an edit landed
//! - [`store`] - Per-session record of resolved positions
//! - [`models`] - Shared data model
//! - [`error`] - Error types

pub mod apply;
pub mod blocks;
pub mod error;
pub mod models;
pub mod offsets;
pub mod position;
pub mod replace;
pub mod store;

mod text;

pub use apply::{apply_blocks, BlockMatcher, LineMatcher, MatchFailure};
pub use blocks::parse_blocks;
pub use error::EditError;
pub use models::{
    BlockFailure, EditPosition, EditType, ReplacementResult, SearchReplaceBlock,
};
pub use offsets::{resolve_adjusted_lines, sort_blocks, AdjustedBlock};
pub use position::{resolve_block_position, resolve_replace_position, ResolvedSpan};
pub use replace::{replace, ReplaceOptions};
pub use store::EditPositionStore;
