//! Finding definition files on disk.

use crate::LoadError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Check whether `path` looks like a definition file.
pub fn is_definition_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// List definition files under `dir`.
///
/// Only the top level is searched unless `recursive` is set. Entries are
/// visited in file name order, so the result is stable between runs.
pub fn discover(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(max_depth).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Walk {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if entry.file_type().is_file() && is_definition_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    tracing::debug!(dir = %dir.display(), recursive, count = files.len(), "discovered definition files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.yaml"), "").unwrap();
        fs::write(dir.path().join("a.YML"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.yaml"), "").unwrap();
        dir
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover_top_level_only() {
        let dir = layout();
        let files = discover(dir.path(), false).unwrap();
        assert_eq!(names(&files, dir.path()), ["a.YML", "b.yaml"]);
    }

    #[test]
    fn test_discover_recursive() {
        let dir = layout();
        let files = discover(dir.path(), true).unwrap();
        assert_eq!(names(&files, dir.path()), ["a.YML", "b.yaml", "sub/c.yaml"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let err = discover(Path::new("/nonexistent/queries"), true).unwrap_err();
        assert!(matches!(err, LoadError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_is_definition_file() {
        assert!(is_definition_file(Path::new("q.yaml")));
        assert!(is_definition_file(Path::new("q.Yml")));
        assert!(!is_definition_file(Path::new("q.json")));
        assert!(!is_definition_file(Path::new("yaml")));
    }
}
