//! JSON-backed registry of library paths.

use crate::error::{LibraryError, Result};
use crate::library::{Library, LibraryRef};
use crate::store::RegistryStore;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Immutable view of the registry contents at one point in time.
pub type RegistrySnapshot = Arc<[Library]>;

/// Result of [`LibraryRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A library with the same path is already registered. Nothing changed.
    AlreadyExists,
}

/// Result of [`LibraryRegistry::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Library),
    NotFound,
}

/// Ordered, path-unique set of libraries with write-through persistence.
///
/// Mutations take `&mut self` and run to completion: the in-memory change,
/// the file write and the change event happen together or not at all.
pub struct LibraryRegistry {
    store: RegistryStore,
    libraries: Vec<Library>,
    events: watch::Sender<RegistrySnapshot>,
    load_error: Option<LibraryError>,
}

impl LibraryRegistry {
    /// Open the registry at the default platform location.
    pub fn open_default() -> Result<Self> {
        Self::open(RegistryStore::at_default_location()?)
    }

    /// Open the registry backed by `store`.
    ///
    /// A missing file is created empty. A corrupt file is logged, the registry
    /// starts empty and the file is left as-is until the next successful
    /// mutation; the failure is available from [`load_error`](Self::load_error).
    pub fn open(store: RegistryStore) -> Result<Self> {
        let (libraries, load_error) = match store.load() {
            Ok(Some(libraries)) => (dedup_by_path(libraries), None),
            Ok(None) => {
                debug!(
                    "No registry file at {}, creating one",
                    store.path().display()
                );
                store.save(&[])?;
                (Vec::new(), None)
            }
            Err(err @ LibraryError::PersistenceCorrupt { .. }) => {
                error!("Failed to load library registry: {}", err);
                (Vec::new(), Some(err))
            }
            Err(err) => return Err(err),
        };

        let (events, _) = watch::channel(RegistrySnapshot::from(libraries.clone()));

        info!(
            "Opened library registry at {} ({} libraries)",
            store.path().display(),
            libraries.len()
        );

        Ok(Self {
            store,
            libraries,
            events,
            load_error,
        })
    }

    /// Register `library`.
    ///
    /// Returns [`AddOutcome::AlreadyExists`] without touching state or disk
    /// when the path is already registered.
    pub fn add(&mut self, library: Library) -> Result<AddOutcome> {
        if library.is_empty() {
            return Err(LibraryError::EmptyLibrary(library.path));
        }
        if self.contains(&library.path) {
            debug!("Library {} already registered", library.path.display());
            return Ok(AddOutcome::AlreadyExists);
        }

        let name = library.name.clone();
        let path = library.path.clone();
        self.libraries.push(library);

        if let Err(e) = self.persist() {
            self.libraries.pop();
            return Err(e);
        }

        info!("Added library '{}' at {}", name, path.display());
        self.publish();
        Ok(AddOutcome::Added)
    }

    /// Unregister the library matching `target` by path.
    pub fn remove<'a>(&mut self, target: impl Into<LibraryRef<'a>>) -> Result<RemoveOutcome> {
        let target = target.into();
        let Some(index) = self.position(target.path()) else {
            debug!("No library registered at {}", target.path().display());
            return Ok(RemoveOutcome::NotFound);
        };

        let removed = self.libraries.remove(index);

        if let Err(e) = self.persist() {
            self.libraries.insert(index, removed);
            return Err(e);
        }

        info!(
            "Removed library '{}' at {}",
            removed.name,
            removed.path.display()
        );
        self.publish();
        Ok(RemoveOutcome::Removed(removed))
    }

    /// All libraries in registration order.
    pub fn list(&self) -> &[Library] {
        &self.libraries
    }

    pub fn get(&self, path: &Path) -> Option<&Library> {
        self.libraries.iter().find(|l| l.path == path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.position(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// The current contents as a shareable snapshot.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.events.borrow().clone()
    }

    /// Subscribe to change events. The receiver always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<RegistrySnapshot> {
        self.events.subscribe()
    }

    /// The error that made the persisted file unreadable at open, if any.
    pub fn load_error(&self) -> Option<&LibraryError> {
        self.load_error.as_ref()
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.libraries.iter().position(|l| l.path == path)
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.libraries)?;
        if self.load_error.take().is_some() {
            warn!(
                "Overwrote unreadable registry file {}",
                self.store.path().display()
            );
        }
        Ok(())
    }

    fn publish(&self) {
        self.events
            .send_replace(RegistrySnapshot::from(self.libraries.clone()));
    }
}

fn dedup_by_path(libraries: Vec<Library>) -> Vec<Library> {
    let mut unique: Vec<Library> = Vec::with_capacity(libraries.len());
    for library in libraries {
        if unique.iter().any(|l| l.path == library.path) {
            warn!(
                "Dropping duplicate registry entry for {}",
                library.path.display()
            );
            continue;
        }
        unique.push(library);
    }
    unique
}
