//! Library resolution.
//!
//! Turns a user-supplied path into a [`Library`] with ordered member lists:
//!
//! - a single `.psl` / `.psi` file becomes a one-file library;
//! - a directory with a `psl_list.json` manifest uses the manifest's order;
//! - any other directory is scanned recursively and sorted.
//!
//! Resolution reads the filesystem but never writes to it.

mod manifest;
mod scan;

pub use manifest::Manifest;
pub use scan::{scan_directory, ScanResult};

use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result};
use crate::library::{FileRole, Library};
use crate::paths::library_name;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// File names and extensions the resolver recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub manifest_file_name: String,
    pub source_extension: String,
    pub header_extension: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            manifest_file_name: LibraryConfig::MANIFEST_FILE_NAME.to_string(),
            source_extension: LibraryConfig::SOURCE_EXTENSION.to_string(),
            header_extension: LibraryConfig::HEADER_EXTENSION.to_string(),
        }
    }
}

/// Resolves user paths into libraries.
#[derive(Debug, Clone, Default)]
pub struct LibraryResolver {
    options: ResolverOptions,
}

impl LibraryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve `input` into a library.
    ///
    /// Relative input is made absolute against the current directory. The
    /// library name is the final component of the input path.
    pub fn resolve(&self, input: &Path) -> Result<Library> {
        if input.as_os_str().is_empty() {
            return Err(LibraryError::InvalidInput {
                message: "No path entered.".to_string(),
            });
        }

        let path =
            std::path::absolute(input).map_err(|e| LibraryError::io_with_path(e, input))?;

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LibraryError::PathNotFound(path));
            }
            Err(e) => return Err(LibraryError::io_with_path(e, &path)),
        };

        let name = library_name(&path);
        let library = if metadata.is_dir() {
            self.resolve_directory(name, &path)?
        } else if metadata.is_file() {
            self.resolve_file(name, &path)?
        } else {
            return Err(self.unsupported(&path));
        };

        info!(
            "Resolved library '{}' at {}: {} headers, {} sources",
            library.name,
            library.path.display(),
            library.headers.len(),
            library.sources.len()
        );
        Ok(library)
    }

    fn resolve_file(&self, name: String, path: &Path) -> Result<Library> {
        let role = FileRole::classify(
            path,
            &self.options.source_extension,
            &self.options.header_extension,
        )
        .ok_or_else(|| self.unsupported(path))?;

        let member = vec![path.to_path_buf()];
        Ok(match role {
            FileRole::Source => Library::new(name, path, member, Vec::new()),
            FileRole::Header => Library::new(name, path, Vec::new(), member),
        })
    }

    fn resolve_directory(&self, name: String, dir: &Path) -> Result<Library> {
        let manifest_path = dir.join(&self.options.manifest_file_name);

        let (headers, sources) = if manifest_path.is_file() {
            debug!("Using manifest {}", manifest_path.display());
            let manifest = Manifest::load(&manifest_path, dir)?;
            if manifest.is_empty() {
                return Err(LibraryError::EmptyLibrary(manifest_path));
            }
            if let Some(missing) = manifest
                .headers
                .iter()
                .chain(manifest.sources.iter())
                .find(|p| !p.is_file())
            {
                return Err(LibraryError::PathNotFound(missing.clone()));
            }
            (manifest.headers, manifest.sources)
        } else {
            let scanned = scan_directory(
                dir,
                &self.options.source_extension,
                &self.options.header_extension,
            );
            (scanned.headers, scanned.sources)
        };

        let library = Library::new(name, dir, sources, headers);
        if library.is_empty() {
            return Err(LibraryError::EmptyLibrary(dir.to_path_buf()));
        }
        Ok(library)
    }

    fn unsupported(&self, path: &Path) -> LibraryError {
        LibraryError::UnsupportedFileType {
            path: path.to_path_buf(),
            source_ext: self.options.source_extension.clone(),
            header_ext: self.options.header_extension.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    fn library_dir(temp_dir: &TempDir, name: &str) -> PathBuf {
        let dir = temp_dir.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resolve_with_manifest_keeps_manifest_order() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "collections");
        touch(&dir, "a.psi");
        touch(&dir, "b.psl");
        touch(&dir, "c.psl");
        touch(&dir, "ignored.psl");
        fs::write(
            dir.join("psl_list.json"),
            r#"{"headers": ["a.psi"], "sources": ["c.psl", "b.psl"]}"#,
        )
        .unwrap();

        let library = LibraryResolver::new().resolve(&dir).unwrap();
        assert_eq!(library.name, "collections");
        assert_eq!(library.path, dir);
        assert_eq!(library.headers, vec![dir.join("a.psi")]);
        assert_eq!(library.sources, vec![dir.join("c.psl"), dir.join("b.psl")]);
    }

    #[test]
    fn test_resolve_without_manifest_scans_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "z.psl");
        touch(&dir, "a.psi");
        touch(&dir, "m.psl");

        let library = LibraryResolver::new().resolve(&dir).unwrap();
        assert_eq!(library.headers, vec![dir.join("a.psi")]);
        assert_eq!(library.sources, vec![dir.join("m.psl"), dir.join("z.psl")]);
    }

    #[test]
    fn test_resolve_scan_includes_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "top.psl");
        touch(&dir, "inner/deep.psi");

        let library = LibraryResolver::new().resolve(&dir).unwrap();
        assert_eq!(library.headers, vec![dir.join("inner/deep.psi")]);
        assert_eq!(library.sources, vec![dir.join("top.psl")]);
    }

    #[test]
    fn test_resolve_single_source_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "io.psl");

        let library = LibraryResolver::new().resolve(&file).unwrap();
        assert_eq!(library.name, "io.psl");
        assert_eq!(library.sources, vec![file]);
        assert!(library.headers.is_empty());
    }

    #[test]
    fn test_resolve_single_header_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "io.psi");

        let library = LibraryResolver::new().resolve(&file).unwrap();
        assert_eq!(library.headers, vec![file]);
        assert!(library.sources.is_empty());
    }

    #[test]
    fn test_resolve_other_extension_is_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let file = touch(temp_dir.path(), "readme.txt");

        match LibraryResolver::new().resolve(&file) {
            Err(LibraryError::UnsupportedFileType { path, .. }) => assert_eq!(path, file),
            other => panic!("Expected UnsupportedFileType, got: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        match LibraryResolver::new().resolve(&missing) {
            Err(LibraryError::PathNotFound(path)) => assert_eq!(path, missing),
            other => panic!("Expected PathNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_empty_input() {
        assert!(matches!(
            LibraryResolver::new().resolve(Path::new("")),
            Err(LibraryError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_resolve_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "empty");
        touch(&dir, "notes.md");

        assert!(matches!(
            LibraryResolver::new().resolve(&dir),
            Err(LibraryError::EmptyLibrary(_))
        ));
    }

    #[test]
    fn test_malformed_manifest_does_not_fall_back_to_scan() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "a.psl");
        fs::write(dir.join("psl_list.json"), r#"{"sources": "a.psl"}"#).unwrap();

        assert!(matches!(
            LibraryResolver::new().resolve(&dir),
            Err(LibraryError::ManifestParseError { .. })
        ));
    }

    #[test]
    fn test_empty_manifest_is_empty_library() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "a.psl");
        fs::write(dir.join("psl_list.json"), "{}").unwrap();

        assert!(matches!(
            LibraryResolver::new().resolve(&dir),
            Err(LibraryError::EmptyLibrary(_))
        ));
    }

    #[test]
    fn test_manifest_entry_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "a.psl");
        fs::write(
            dir.join("psl_list.json"),
            r#"{"sources": ["a.psl", "gone.psl"]}"#,
        )
        .unwrap();

        match LibraryResolver::new().resolve(&dir) {
            Err(LibraryError::PathNotFound(path)) => assert_eq!(path, dir.join("gone.psl")),
            other => panic!("Expected PathNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_custom_options() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "a.src");
        touch(&dir, "a.psl");

        let resolver = LibraryResolver::with_options(ResolverOptions {
            source_extension: "src".to_string(),
            ..Default::default()
        });
        let library = resolver.resolve(&dir).unwrap();
        assert_eq!(library.sources, vec![dir.join("a.src")]);
    }

    #[test]
    fn test_array_manifest_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "a.psi");
        touch(&dir, "b.psl");
        fs::write(dir.join("psl_list.json"), r#"[["a.psi"], ["b.psl"]]"#).unwrap();

        assert!(matches!(
            LibraryResolver::new().resolve(&dir),
            Err(LibraryError::ManifestParseError { .. })
        ));
    }

    #[test]
    fn test_absolute_manifest_entry_is_anchored_to_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        let outside = touch(temp_dir.path(), "outside.psl");
        touch(&dir, "inside.psl");
        let entry = outside.display().to_string();
        fs::write(
            dir.join("psl_list.json"),
            serde_json::json!({ "sources": ["inside.psl", entry] }).to_string(),
        )
        .unwrap();

        match LibraryResolver::new().resolve(&dir) {
            Err(LibraryError::PathNotFound(path)) => {
                assert!(path.starts_with(&dir));
                assert_ne!(path, outside);
            }
            other => panic!("Expected PathNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_manifest_entry_must_be_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = library_dir(&temp_dir, "lib");
        touch(&dir, "a.psl");
        touch(&dir, "nested/b.psl");
        fs::write(
            dir.join("psl_list.json"),
            r#"{"sources": ["a.psl", "", "nested"]}"#,
        )
        .unwrap();

        match LibraryResolver::new().resolve(&dir) {
            Err(LibraryError::PathNotFound(path)) => assert_eq!(path, dir),
            other => panic!("Expected PathNotFound, got: {:?}", other),
        }
    }
}
