//! Centralized configuration for the ParaSail library registry.
//!
//! Well-known file names, extensions, protocol limits and view labels live
//! here so the resolver, registry, view and sync layers agree on them.

use std::time::Duration;

/// Library discovery and registry file configuration.
pub struct LibraryConfig;

impl LibraryConfig {
    pub const APP_DIR_NAME: &'static str = "parasail";
    pub const REGISTRY_FILE_NAME: &'static str = "libraries.json";

    /// Optional per-directory manifest listing member files explicitly.
    pub const MANIFEST_FILE_NAME: &'static str = "psl_list.json";

    pub const SOURCE_EXTENSION: &'static str = "psl";
    pub const HEADER_EXTENSION: &'static str = "psi";
}

/// Analysis service channel configuration.
pub struct SyncConfig;

impl SyncConfig {
    /// Upper bound for a completion or diagnostics round-trip.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
    /// How long the CLI lingers for `library/added` / `library/removed`.
    pub const CONFIRMATION_WAIT: Duration = Duration::from_millis(500);
    /// Maximum accepted JSON-RPC message body (16 MB).
    pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
}

/// Library tree view labels and command identifiers.
pub struct ViewConfig;

impl ViewConfig {
    pub const ADD_LIBRARY_LABEL: &'static str = "Add Library";
    pub const ADD_LIBRARY_COMMAND: &'static str = "parasail.addLibrary";
    pub const REMOVE_LIBRARY_COMMAND: &'static str = "parasail.removeLibrary";
    /// Context value attached to library nodes so hosts can offer removal.
    pub const LIBRARY_CONTEXT_VALUE: &'static str = "library";
}
