//! Filesystem-scan discovery for library directories without a manifest.

use crate::library::FileRole;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Header and source files found under a directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub headers: Vec<PathBuf>,
    pub sources: Vec<PathBuf>,
}

/// Recursively collect member files below `dir`.
///
/// All matching paths are sorted lexicographically by their raw OS string
/// before being split by role, so both lists come out in sorted order.
/// Hidden entries below the root are skipped; unreadable entries are ignored.
pub fn scan_directory(dir: &Path, source_ext: &str, header_ext: &str) -> ScanResult {
    let mut found: Vec<(PathBuf, FileRole)> = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let role = FileRole::classify(e.path(), source_ext, header_ext)?;
            Some((e.into_path(), role))
        })
        .collect();

    found.sort_by(|(a, _), (b, _)| a.as_os_str().cmp(b.as_os_str()));

    let mut result = ScanResult::default();
    for (path, role) in found {
        match role {
            FileRole::Header => result.headers.push(path),
            FileRole::Source => result.sources.push(path),
        }
    }

    debug!(
        "Scanned {}: {} headers, {} sources",
        dir.display(),
        result.headers.len(),
        result.sources.len()
    );
    result
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_sorts_then_partitions() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(dir, "z.psl");
        touch(dir, "a.psi");
        touch(dir, "m.psl");
        touch(dir, "notes.txt");

        let result = scan_directory(dir, "psl", "psi");
        assert_eq!(result.headers, vec![dir.join("a.psi")]);
        assert_eq!(result.sources, vec![dir.join("m.psl"), dir.join("z.psl")]);
    }

    #[test]
    fn test_scan_recurses_and_orders_by_full_path() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(dir, "b.psl");
        touch(dir, "a/z.psl");
        touch(dir, "a-b/c.psl");

        let result = scan_directory(dir, "psl", "psi");
        // Raw string order: '-' sorts before '/'.
        assert_eq!(
            result.sources,
            vec![dir.join("a-b/c.psl"), dir.join("a/z.psl"), dir.join("b.psl")]
        );
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(dir, ".cache/gen.psl");
        touch(dir, ".hidden.psl");
        touch(dir, "kept.psl");

        let result = scan_directory(dir, "psl", "psi");
        assert_eq!(result.sources, vec![dir.join("kept.psl")]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(scan_directory(temp_dir.path(), "psl", "psi"), ScanResult::default());
    }
}
