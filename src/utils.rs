//! Filesystem helpers

use glob::glob;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Remove `dir` and recreate it empty
///
/// Clearing is all-or-nothing: the directory is removed in one call and
/// recreated, never emptied entry by entry, so an interrupted run cannot
/// leave it half-cleared.
pub fn create_or_clean_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

/// All paths matching a glob pattern, in filesystem order
pub fn glob_paths(pattern: &str) -> Vec<PathBuf> {
    match glob(pattern) {
        Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_or_clean_dir_removes_stale_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("stale.txt"), "old").unwrap();

        create_or_clean_dir(&target).unwrap();

        assert!(target.exists());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_create_or_clean_dir_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("out");

        create_or_clean_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_glob_paths_matches_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csproj"), "").unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();

        let pattern = dir.path().join("*.csproj");
        let found = glob_paths(&pattern.to_string_lossy());
        assert_eq!(found.len(), 1);
    }
}
