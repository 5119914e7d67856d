//! Durable storage for the library registry.
//!
//! The whole ordered library sequence is one pretty-printed JSON array,
//! rewritten wholesale on every mutation.

mod atomic;

pub use atomic::atomic_write_json;

use crate::error::{LibraryError, Result};
use crate::library::Library;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON-file store holding the registered libraries.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(crate::paths::default_registry_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted libraries.
    ///
    /// Returns `None` if the file does not exist and `PersistenceCorrupt` if
    /// its content is not a valid library array.
    pub fn load(&self) -> Result<Option<Vec<Library>>> {
        let Some(contents) = atomic::read_if_exists(&self.path)? else {
            return Ok(None);
        };

        let libraries: Vec<Library> =
            serde_json::from_str(&contents).map_err(|e| LibraryError::PersistenceCorrupt {
                path: self.path.clone(),
                message: e.to_string(),
                source: Some(e),
            })?;

        debug!(
            "Loaded {} libraries from {}",
            libraries.len(),
            self.path.display()
        );
        Ok(Some(libraries))
    }

    /// Overwrite the persisted libraries with `libraries`.
    pub fn save(&self, libraries: &[Library]) -> Result<()> {
        atomic_write_json(&self.path, libraries)
    }
}
