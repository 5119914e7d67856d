//! ParaSail Core - Editor-side library registry for the ParaSail language.
//!
//! This crate lets a host register ParaSail libraries (single `.psl`/`.psi`
//! files or directories of them), keeps the registered set in a durable JSON
//! file, projects it as a tree, and keeps an external analysis service
//! informed of every change over JSON-RPC.
//!
//! # Example
//!
//! ```rust,ignore
//! use parasail_core::{LibraryManager, LibraryRegistry, LibraryResolver, SyncChannel};
//!
//! #[tokio::main]
//! async fn main() -> parasail_core::Result<()> {
//!     let registry = LibraryRegistry::open_default()?;
//!     let (channel, _confirmations) = SyncChannel::connect_tcp("127.0.0.1:7777").await?;
//!     let mut manager =
//!         LibraryManager::new(registry, LibraryResolver::new()).with_sync(channel);
//!
//!     let library = manager.add_library("/home/me/psl/collections").await?;
//!     println!("{} headers, {} sources", library.headers.len(), library.sources.len());
//!
//!     manager.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod manager;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod sync;
pub mod view;

// Re-export commonly used types
pub use commands::{CommandOutcome, HostUi};
pub use config::{LibraryConfig, SyncConfig, ViewConfig};
pub use error::{LibraryError, Result};
pub use library::{FileRole, Library, LibraryRef};
pub use manager::LibraryManager;
pub use registry::{AddOutcome, LibraryRegistry, RegistrySnapshot, RemoveOutcome};
pub use resolver::{LibraryResolver, ResolverOptions};
pub use store::RegistryStore;
pub use sync::{
    CompletionCandidate, Confirmation, Diagnostic, DiagnosticSeverity, Position, Range,
    SyncChannel,
};
pub use view::{project, DisplayNode, LibraryView, NodeKind};
