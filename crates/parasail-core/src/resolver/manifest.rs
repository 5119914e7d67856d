//! `psl_list.json` manifest parsing.
//!
//! A manifest pins the member files of a library directory and their order:
//!
//! ```json
//! { "headers": ["api.psi"], "sources": ["list.psl", "map.psl"] }
//! ```
//!
//! Either field may be absent. Anything else that does not fit this shape is
//! a parse error. Entries are always relative to the manifest's directory; a
//! leading root is stripped rather than honored.

use crate::error::{LibraryError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    sources: Vec<String>,
}

/// Member files listed by a manifest, resolved against its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub headers: Vec<PathBuf>,
    pub sources: Vec<PathBuf>,
}

impl Manifest {
    /// Parse manifest text; entries are joined onto `dir`.
    pub fn parse(contents: &str, manifest_path: &Path, dir: &Path) -> Result<Self> {
        let parse_error = |e: serde_json::Error| LibraryError::ManifestParseError {
            path: manifest_path.to_path_buf(),
            message: e.to_string(),
            source: Some(e),
        };

        let value: Value = serde_json::from_str(contents).map_err(parse_error)?;
        if !value.is_object() {
            return Err(LibraryError::ManifestParseError {
                path: manifest_path.to_path_buf(),
                message: "manifest must be a JSON object".to_string(),
                source: None,
            });
        }
        let file: ManifestFile = serde_json::from_value(value).map_err(parse_error)?;

        Ok(Self {
            headers: file.headers.iter().map(|f| join_entry(dir, f)).collect(),
            sources: file.sources.iter().map(|f| join_entry(dir, f)).collect(),
        })
    }

    /// Read and parse the manifest at `manifest_path`.
    pub fn load(manifest_path: &Path, dir: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(manifest_path).map_err(|e| {
            LibraryError::ManifestParseError {
                path: manifest_path.to_path_buf(),
                message: e.to_string(),
                source: None,
            }
        })?;
        Self::parse(&contents, manifest_path, dir)
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.sources.is_empty()
    }
}

/// Join `entry` onto `dir`, dropping any root or drive prefix of `entry`.
fn join_entry(dir: &Path, entry: &str) -> PathBuf {
    let relative: PathBuf = Path::new(entry)
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();
    dir.join(relative)
}
