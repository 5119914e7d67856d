//! Error types for the ParaSail library registry.
//!
//! Resolution and registry failures are surfaced to the user action that
//! triggered them. Analysis-service request failures are not: callers degrade
//! them to empty results and only log them.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for registry, resolver and sync operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{message}")]
    InvalidInput { message: String },

    // Resolution errors
    #[error("The path {} does not exist.", .0.display())]
    PathNotFound(PathBuf),

    #[error("The file {} is not a .{source_ext} or .{header_ext} file.", .path.display())]
    UnsupportedFileType {
        path: PathBuf,
        source_ext: String,
        header_ext: String,
    },

    #[error("Error reading {}: {message}", .path.display())]
    ManifestParseError {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("No source or header files found in {}", .0.display())]
    EmptyLibrary(PathBuf),

    // Registry errors
    #[error("Library path {} already exists.", .0.display())]
    DuplicatePath(PathBuf),

    #[error("No library found with the path: {}", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("Registry file {} is corrupt: {message}", .path.display())]
    PersistenceCorrupt {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Analysis service errors
    #[error("{method} request failed: {message}")]
    RequestFailed { method: String, message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Analysis service channel closed")]
    ChannelClosed,

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl LibraryError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        LibraryError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether this error should be shown to the user.
    ///
    /// Analysis service failures only go to the log.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            LibraryError::RequestFailed { .. }
                | LibraryError::Rpc { .. }
                | LibraryError::Timeout(_)
                | LibraryError::ChannelClosed
                | LibraryError::Protocol { .. }
        )
    }

    /// Fold a transport-level failure into a `RequestFailed` for `method`.
    pub fn into_request_failed(self, method: &str) -> Self {
        match self {
            err @ LibraryError::RequestFailed { .. } => err,
            other => LibraryError::RequestFailed {
                method: method.to_string(),
                message: other.to_string(),
            },
        }
    }
}
