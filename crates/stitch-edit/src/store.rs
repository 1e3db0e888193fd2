//! Per-session record of resolved edit positions
//!
//! Records where each edit landed so the editor can move focus there
//! once the edit cycle completes. The store is owned by the session that
//! performs edits and passed into the editing flow; positions for a file
//! are cleared after its edit cycle completes, or wholesale at session
//! end. All access is serialized by the surrounding task orchestration,
//! one edit flow per file at a time.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::EditError;
use crate::models::EditPosition;

/// Append-only, per-file ordered record of resolved edit positions
#[derive(Debug, Clone, Default)]
pub struct EditPositionStore {
    positions: Arc<RwLock<HashMap<String, Vec<EditPosition>>>>,
}

impl EditPositionStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved position for a file
    ///
    /// Insertion order is chronological; no deduplication is performed.
    pub fn track_position(&self, file_path: &str, position: EditPosition) -> Result<(), EditError> {
        let mut positions = self.positions.write().map_err(|_| {
            EditError::Lock("Failed to acquire write lock for edit positions".to_string())
        })?;
        positions
            .entry(file_path.to_string())
            .or_default()
            .push(position);
        debug!("Recorded edit position for {}", file_path);
        Ok(())
    }

    /// First (oldest) recorded position for a file, if any
    pub fn primary_position(&self, file_path: &str) -> Result<Option<EditPosition>, EditError> {
        let positions = self.positions.read().map_err(|_| {
            EditError::Lock("Failed to acquire read lock for edit positions".to_string())
        })?;
        Ok(positions
            .get(file_path)
            .and_then(|recorded| recorded.first())
            .cloned())
    }

    /// All recorded positions for a file, in insertion order
    pub fn positions(&self, file_path: &str) -> Result<Vec<EditPosition>, EditError> {
        let positions = self.positions.read().map_err(|_| {
            EditError::Lock("Failed to acquire read lock for edit positions".to_string())
        })?;
        Ok(positions.get(file_path).cloned().unwrap_or_default())
    }

    /// Remove all records for a file
    pub fn clear_positions(&self, file_path: &str) -> Result<(), EditError> {
        let mut positions = self.positions.write().map_err(|_| {
            EditError::Lock("Failed to acquire write lock for edit positions".to_string())
        })?;
        positions.remove(file_path);
        debug!("Cleared edit positions for {}", file_path);
        Ok(())
    }

    /// Remove every record in the store
    pub fn clear_all(&self) -> Result<(), EditError> {
        let mut positions = self.positions.write().map_err(|_| {
            EditError::Lock("Failed to acquire write lock for edit positions".to_string())
        })?;
        positions.clear();
        debug!("Cleared all edit positions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EditType;

    fn position(file: &str, line: usize) -> EditPosition {
        EditPosition {
            file_path: file.to_string(),
            start_line: line,
            end_line: line,
            start_column: Some(1),
            end_column: Some(1),
            edit_type: EditType::Modify,
        }
    }

    #[test]
    fn test_primary_position_is_oldest() {
        let store = EditPositionStore::new();
        store.track_position("a.rs", position("a.rs", 1)).unwrap();
        store.track_position("a.rs", position("a.rs", 9)).unwrap();

        let primary = store.primary_position("a.rs").unwrap().unwrap();
        assert_eq!(primary.start_line, 1);
    }

    #[test]
    fn test_primary_position_empty_is_none() {
        let store = EditPositionStore::new();
        assert!(store.primary_position("missing.rs").unwrap().is_none());
    }

    #[test]
    fn test_positions_keeps_insertion_order_without_dedup() {
        let store = EditPositionStore::new();
        store.track_position("a.rs", position("a.rs", 3)).unwrap();
        store.track_position("a.rs", position("a.rs", 3)).unwrap();
        store.track_position("a.rs", position("a.rs", 7)).unwrap();

        let recorded = store.positions("a.rs").unwrap();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0].start_line, 3);
        assert_eq!(recorded[2].start_line, 7);
    }

    #[test]
    fn test_clear_positions_is_per_file() {
        let store = EditPositionStore::new();
        store.track_position("a.rs", position("a.rs", 1)).unwrap();
        store.track_position("b.rs", position("b.rs", 2)).unwrap();

        store.clear_positions("a.rs").unwrap();
        assert!(store.primary_position("a.rs").unwrap().is_none());
        assert!(store.primary_position("b.rs").unwrap().is_some());
    }

    #[test]
    fn test_clear_all() {
        let store = EditPositionStore::new();
        store.track_position("a.rs", position("a.rs", 1)).unwrap();
        store.track_position("b.rs", position("b.rs", 2)).unwrap();

        store.clear_all().unwrap();
        assert!(store.primary_position("a.rs").unwrap().is_none());
        assert!(store.primary_position("b.rs").unwrap().is_none());
    }
}
