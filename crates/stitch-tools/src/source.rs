//! File content source for the edit tools
//!
//! The engine never touches the filesystem directly; it consumes
//! original text through this seam and hands new text back to the caller
//! to persist after whatever approval flow applies.

use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// Supplies original file content to the edit engine
pub trait FileSource: Send + Sync {
    /// Read the file's current content
    ///
    /// A missing file is reported as [`ToolError::FileNotFound`] with
    /// the resolved path.
    fn read(&self, path: &Path) -> Result<String, ToolError>;
}

/// Reads files from the local filesystem, optionally relative to a
/// workspace root
#[derive(Debug, Clone, Default)]
pub struct FsFileSource {
    root: Option<PathBuf>,
}

impl FsFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against a workspace root
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl FileSource for FsFileSource {
    fn read(&self, path: &Path) -> Result<String, ToolError> {
        let resolved = self.resolve(path);
        std::fs::read_to_string(&resolved).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::FileNotFound(resolved)
            } else {
                ToolError::Io(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "content").unwrap();
        file.flush().unwrap();

        let source = FsFileSource::new();
        let text = source.read(file.path()).unwrap();
        assert_eq!(text, "content\n");
    }

    #[test]
    fn test_missing_file_reports_resolved_path() {
        let source = FsFileSource::rooted("/workspace");
        let err = source.read(Path::new("src/missing.rs")).unwrap_err();
        match err {
            ToolError::FileNotFound(path) => {
                assert_eq!(path, PathBuf::from("/workspace/src/missing.rs"));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }
}
