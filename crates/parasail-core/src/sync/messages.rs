//! Method names and payloads exchanged with the analysis service.

use crate::library::Library;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Editor → service: a library was registered.
pub const LIBRARY_ADD: &str = "library/add";
/// Editor → service: a library was unregistered.
pub const LIBRARY_REMOVE: &str = "library/remove";
/// Service → editor: the service loaded a library.
pub const LIBRARY_ADDED: &str = "library/added";
/// Service → editor: the service dropped a library.
pub const LIBRARY_REMOVED: &str = "library/removed";
pub const COMPLETIONS: &str = "completions";
pub const CHECK_ERRORS: &str = "checkErrors";

/// Payload of `library/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryAddParams {
    pub name: String,
    pub path: PathBuf,
    pub sources: Vec<PathBuf>,
    pub headers: Vec<PathBuf>,
}

impl From<&Library> for LibraryAddParams {
    fn from(library: &Library) -> Self {
        Self {
            name: library.name.clone(),
            path: library.path.clone(),
            sources: library.sources.clone(),
            headers: library.headers.clone(),
        }
    }
}

/// Payload of `library/remove`, `library/added` and `library/removed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryRemoveParams {
    pub name: String,
    pub path: PathBuf,
}

impl From<&Library> for LibraryRemoveParams {
    fn from(library: &Library) -> Self {
        Self {
            name: library.name.clone(),
            path: library.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocumentIdentifier {
    pub uri: String,
}

/// Zero-based line and character offset in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Params of `completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

/// Params of `checkErrors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckErrorsParams {
    pub text_document: TextDocumentIdentifier,
}

/// One completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCandidate {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
}

/// Diagnostic severity, encoded on the wire as 1 (error) to 4 (hint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl TryFrom<u8> for DiagnosticSeverity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            1 => Ok(DiagnosticSeverity::Error),
            2 => Ok(DiagnosticSeverity::Warning),
            3 => Ok(DiagnosticSeverity::Information),
            4 => Ok(DiagnosticSeverity::Hint),
            other => Err(format!("invalid diagnostic severity {}", other)),
        }
    }
}

impl From<DiagnosticSeverity> for u8 {
    fn from(severity: DiagnosticSeverity) -> Self {
        match severity {
            DiagnosticSeverity::Error => 1,
            DiagnosticSeverity::Warning => 2,
            DiagnosticSeverity::Information => 3,
            DiagnosticSeverity::Hint => 4,
        }
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Information => "info",
            DiagnosticSeverity::Hint => "hint",
        };
        f.write_str(label)
    }
}

/// A problem reported for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosticSeverity>,
}

/// Decode a `completions` result: a bare array, `{ "items": [...] }` or `null`.
pub fn parse_completions(result: Value) -> serde_json::Result<Vec<CompletionCandidate>> {
    match result {
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) if map.contains_key("items") => {
            serde_json::from_value(map.remove("items").unwrap_or(Value::Null))
        }
        other => serde_json::from_value(other),
    }
}

/// Decode a `checkErrors` result: an array or `null`.
pub fn parse_diagnostics(result: Value) -> serde_json::Result<Vec<Diagnostic>> {
    match result {
        Value::Null => Ok(Vec::new()),
        other => serde_json::from_value(other),
    }
}

/// Informational acknowledgement pushed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    LibraryAdded { name: String, path: PathBuf },
    LibraryRemoved { name: String, path: PathBuf },
}

impl Confirmation {
    /// Decode an inbound notification; `None` if it is not a confirmation.
    pub fn from_notification(method: &str, params: Option<Value>) -> Option<Self> {
        let decode = |params: Option<Value>| -> Option<LibraryRemoveParams> {
            serde_json::from_value(params?).ok()
        };
        match method {
            LIBRARY_ADDED => decode(params)
                .map(|p| Confirmation::LibraryAdded { name: p.name, path: p.path }),
            LIBRARY_REMOVED => decode(params)
                .map(|p| Confirmation::LibraryRemoved { name: p.name, path: p.path }),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Confirmation::LibraryAdded { name, .. } | Confirmation::LibraryRemoved { name, .. } => {
                name
            }
        }
    }
}
