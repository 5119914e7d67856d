//! The authoritative set of registered libraries.
//!
//! The registry owns the ordered library list, keeps it deduplicated by
//! `path`, persists it through a [`RegistryStore`](crate::store::RegistryStore)
//! on every mutation and publishes a fresh snapshot to subscribers after each
//! successful change.
//!
//! # Location
//!
//! By default the registry file lives in the platform config directory:
//! - **Linux**: `~/.config/parasail/libraries.json`
//! - **Windows**: `%APPDATA%\parasail\libraries.json`
//! - **macOS**: `~/Library/Application Support/parasail/libraries.json`

pub mod library_registry;

pub use library_registry::{AddOutcome, LibraryRegistry, RegistrySnapshot, RemoveOutcome};
