//! The library data model.

use crate::config::LibraryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A registered unit of ParaSail source material.
///
/// `path` is the registry key. `headers` and `sources` keep the order they
/// were resolved in; that order is the analysis order and must survive
/// persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    pub path: PathBuf,
    pub sources: Vec<PathBuf>,
    pub headers: Vec<PathBuf>,
}

impl Library {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        sources: Vec<PathBuf>,
        headers: Vec<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            sources,
            headers,
        }
    }

    /// A library without any member files cannot be registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.headers.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.sources.len() + self.headers.len()
    }

    /// Member files in analysis order: headers first, then sources.
    pub fn members(&self) -> impl Iterator<Item = (FileRole, &Path)> {
        self.headers
            .iter()
            .map(|p| (FileRole::Header, p.as_path()))
            .chain(self.sources.iter().map(|p| (FileRole::Source, p.as_path())))
    }
}

/// Role of a member file within a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Header,
    Source,
}

impl FileRole {
    /// Classify a path by its extension using the default extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::classify(
            path,
            LibraryConfig::SOURCE_EXTENSION,
            LibraryConfig::HEADER_EXTENSION,
        )
    }

    /// Classify a path by its extension. Matching is case-sensitive.
    pub fn classify(path: &Path, source_ext: &str, header_ext: &str) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext == source_ext {
            Some(FileRole::Source)
        } else if ext == header_ext {
            Some(FileRole::Header)
        } else {
            None
        }
    }
}

/// Identifies a library for removal: by its key, or by a library value
/// (matched on `path` only, so values re-read from storage still match).
#[derive(Debug, Clone, Copy)]
pub enum LibraryRef<'a> {
    Path(&'a Path),
    Library(&'a Library),
}

impl LibraryRef<'_> {
    pub fn path(&self) -> &Path {
        match self {
            LibraryRef::Path(path) => path,
            LibraryRef::Library(library) => &library.path,
        }
    }
}

impl<'a> From<&'a Path> for LibraryRef<'a> {
    fn from(path: &'a Path) -> Self {
        LibraryRef::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for LibraryRef<'a> {
    fn from(path: &'a PathBuf) -> Self {
        LibraryRef::Path(path.as_path())
    }
}

impl<'a> From<&'a Library> for LibraryRef<'a> {
    fn from(library: &'a Library) -> Self {
        LibraryRef::Library(library)
    }
}
