//! Stitch edit tools
//!
//! The tool boundary around the [`stitch_edit`] engine: request
//! validation, file reading, position tracking, diff reporting, and
//! async provider wrappers for the outer tool dispatcher.
//!
//! # Modules
//!
//! - [`edit`] - The [`edit::EditEngine`] façade and its request/outcome types
//! - [`source`] - File content seam between the engine and the filesystem
//! - [`report`] - Unified diff rendering of applied changes
//! - [`provider`] - Async JSON providers over the engine
//! - [`error`] - Error taxonomy for the tool boundary
//!
//! The engine computes new file content but never writes it; persisting
//! the result, and deciding whether the edit should happen at all, stay
//! with the caller.

pub mod edit;
pub mod error;
pub mod provider;
pub mod report;
pub mod source;

pub use edit::{ApplyDiffInput, EditEngine, EditOutcome, FailureTally, SearchReplaceInput};
pub use error::ToolError;
pub use provider::{execute_with_timeout, ApplyDiffProvider, Provider, SearchReplaceProvider};
pub use report::{change_stats, unified_diff, ChangeStats};
pub use source::{FileSource, FsFileSource};
