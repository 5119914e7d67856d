//! Process-wide orchestration of registry, resolver and analysis service.
//!
//! One `LibraryManager` is created at startup and passed by reference to
//! whatever needs it. Every mutation follows the same order: resolve,
//! update and persist the registry, then notify the service.

use crate::error::{LibraryError, Result};
use crate::library::{Library, LibraryRef};
use crate::paths::normalize_input_path;
use crate::registry::{AddOutcome, LibraryRegistry, RegistrySnapshot, RemoveOutcome};
use crate::resolver::LibraryResolver;
use crate::sync::{CompletionCandidate, Diagnostic, Position, SyncChannel};
use crate::view::LibraryView;
use std::path::Path;
use tokio::sync::watch;
use tracing::{info, warn};

/// Owns the registry and the optional analysis service channel.
pub struct LibraryManager {
    registry: LibraryRegistry,
    resolver: LibraryResolver,
    sync: Option<SyncChannel>,
}

impl LibraryManager {
    pub fn new(registry: LibraryRegistry, resolver: LibraryResolver) -> Self {
        Self {
            registry,
            resolver,
            sync: None,
        }
    }

    /// Attach an analysis service channel.
    pub fn with_sync(mut self, channel: SyncChannel) -> Self {
        self.sync = Some(channel);
        self
    }

    pub fn registry(&self) -> &LibraryRegistry {
        &self.registry
    }

    pub fn sync(&self) -> Option<&SyncChannel> {
        self.sync.as_ref()
    }

    /// Register the library at user-entered `input`.
    ///
    /// Fails with `DuplicatePath` before touching the filesystem when the
    /// path is already registered.
    pub async fn add_library(&mut self, input: &str) -> Result<Library> {
        let path = normalize_input_path(input)?;
        if self.registry.contains(&path) {
            return Err(LibraryError::DuplicatePath(path));
        }

        let library = self.resolver.resolve(&path)?;
        match self.registry.add(library.clone())? {
            AddOutcome::Added => {}
            AddOutcome::AlreadyExists => return Err(LibraryError::DuplicatePath(library.path)),
        }

        if let Some(sync) = &self.sync {
            if let Err(e) = sync.library_added(&library).await {
                warn!(
                    "Failed to notify analysis service of library '{}': {}",
                    library.name, e
                );
            }
        }

        Ok(library)
    }

    /// Unregister a library by path or by value.
    pub async fn remove_library<'a>(
        &mut self,
        target: impl Into<LibraryRef<'a>>,
    ) -> Result<Library> {
        let target = target.into();
        let removed = match self.registry.remove(target)? {
            RemoveOutcome::Removed(library) => library,
            RemoveOutcome::NotFound => {
                return Err(LibraryError::LibraryNotFound(target.path().to_path_buf()))
            }
        };

        if let Some(sync) = &self.sync {
            if let Err(e) = sync.library_removed(&removed).await {
                warn!(
                    "Failed to notify analysis service of removal of '{}': {}",
                    removed.name, e
                );
            }
        }

        Ok(removed)
    }

    /// Completion candidates from the analysis service; empty without one.
    pub async fn completions_at(&self, uri: &str, position: Position) -> Vec<CompletionCandidate> {
        match &self.sync {
            Some(sync) => sync.completions_at(uri, position).await,
            None => Vec::new(),
        }
    }

    /// Diagnostics from the analysis service; empty without one.
    pub async fn diagnostics_for(&self, uri: &str) -> Vec<Diagnostic> {
        match &self.sync {
            Some(sync) => sync.diagnostics_for(uri).await,
            None => Vec::new(),
        }
    }

    /// Diagnostics unless superseded by a newer check; `None` without a service.
    pub async fn check_document(&self, uri: &str) -> Option<Vec<Diagnostic>> {
        match &self.sync {
            Some(sync) => sync.check_document(uri).await,
            None => None,
        }
    }

    pub fn libraries(&self) -> &[Library] {
        self.registry.list()
    }

    pub fn find(&self, path: &Path) -> Option<&Library> {
        self.registry.get(path)
    }

    /// A tree view that follows registry changes.
    pub fn view(&self) -> LibraryView {
        LibraryView::new(self.registry.subscribe())
    }

    pub fn subscribe(&self) -> watch::Receiver<RegistrySnapshot> {
        self.registry.subscribe()
    }

    /// Tear down the analysis service channel, if any.
    pub async fn shutdown(&mut self) {
        if let Some(sync) = self.sync.take() {
            sync.shutdown().await;
        }
        info!("Library manager shut down");
    }
}
