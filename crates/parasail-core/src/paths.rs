//! Platform-specific path utilities.
//!
//! The registry file lives in the platform config directory:
//! - **Linux**: `~/.config/parasail/libraries.json`
//! - **Windows**: `%APPDATA%\parasail\libraries.json`
//! - **macOS**: `~/Library/Application Support/parasail/libraries.json`

use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Default location of the persisted library registry.
pub fn default_registry_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| LibraryError::Config {
        message: "Could not determine config directory".to_string(),
    })?;
    Ok(config_dir
        .join(LibraryConfig::APP_DIR_NAME)
        .join(LibraryConfig::REGISTRY_FILE_NAME))
}

/// Normalize user-entered path text into an absolute path.
///
/// Surrounding whitespace is trimmed and relative input is anchored at the
/// current directory. The filesystem is not consulted, so the result is
/// still the key the user typed, just absolute.
pub fn normalize_input_path(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::InvalidInput {
            message: "No path entered.".to_string(),
        });
    }
    std::path::absolute(Path::new(trimmed)).map_err(|e| LibraryError::io_with_path(e, trimmed))
}

/// Display name for a library: the final component of its path.
pub fn library_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert a document path or URI string to a `file://` URI string.
///
/// Input that already parses as a URI with a scheme is passed through.
pub fn document_uri(input: &str) -> Result<String> {
    if let Ok(url) = Url::parse(input) {
        if url.scheme().len() > 1 {
            return Ok(url.to_string());
        }
    }
    let path = normalize_input_path(input)?;
    Url::from_file_path(&path)
        .map(|u| u.to_string())
        .map_err(|_| LibraryError::InvalidInput {
            message: format!("Cannot convert {} to a file URI", path.display()),
        })
}
