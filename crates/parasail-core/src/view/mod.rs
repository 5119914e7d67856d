//! Tree projection of the registry.
//!
//! [`project`] is a pure function from registry contents to a display forest.
//! Hosts render the forest however they like; [`LibraryView`] recomputes it
//! whenever the registry publishes a change.

use crate::config::ViewConfig;
use crate::library::{FileRole, Library};
use crate::registry::RegistrySnapshot;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// What a display node stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Synthetic entry that triggers the add-library command when activated.
    AddAction { command: String },
    Library { path: PathBuf, context_value: String },
    Member { path: PathBuf, role: FileRole },
}

/// One node in the library tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    pub label: String,
    pub tooltip: Option<String>,
    pub kind: NodeKind,
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    /// Library nodes expand; action and member nodes are leaves.
    pub fn collapsible(&self) -> bool {
        matches!(self.kind, NodeKind::Library { .. })
    }

    /// Registry key of a selected library node.
    pub fn library_path(&self) -> Option<&Path> {
        match &self.kind {
            NodeKind::Library { path, .. } => Some(path),
            _ => None,
        }
    }

    fn add_action() -> Self {
        Self {
            label: ViewConfig::ADD_LIBRARY_LABEL.to_string(),
            tooltip: None,
            kind: NodeKind::AddAction {
                command: ViewConfig::ADD_LIBRARY_COMMAND.to_string(),
            },
            children: Vec::new(),
        }
    }

    fn library(library: &Library) -> Self {
        Self {
            label: library.name.clone(),
            tooltip: Some(library.path.display().to_string()),
            kind: NodeKind::Library {
                path: library.path.clone(),
                context_value: ViewConfig::LIBRARY_CONTEXT_VALUE.to_string(),
            },
            children: library
                .members()
                .map(|(role, path)| Self::member(role, path))
                .collect(),
        }
    }

    fn member(role: FileRole, path: &Path) -> Self {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            label,
            tooltip: Some(path.display().to_string()),
            kind: NodeKind::Member {
                path: path.to_path_buf(),
                role,
            },
            children: Vec::new(),
        }
    }
}

/// Project registry contents into the display forest.
///
/// The add-action node comes first, then one node per library in registry
/// order, each with headers before sources.
pub fn project(libraries: &[Library]) -> Vec<DisplayNode> {
    std::iter::once(DisplayNode::add_action())
        .chain(libraries.iter().map(DisplayNode::library))
        .collect()
}

/// Registry subscriber that re-projects the forest on every change.
pub struct LibraryView {
    rx: watch::Receiver<RegistrySnapshot>,
}

impl LibraryView {
    pub fn new(rx: watch::Receiver<RegistrySnapshot>) -> Self {
        Self { rx }
    }

    /// The forest for the latest registry contents.
    pub fn forest(&self) -> Vec<DisplayNode> {
        project(&self.rx.borrow())
    }

    /// Wait for the next registry change and return the refreshed forest.
    ///
    /// Returns `None` once the registry has been dropped.
    pub async fn changed(&mut self) -> Option<Vec<DisplayNode>> {
        self.rx.changed().await.ok()?;
        let snapshot = self.rx.borrow_and_update().clone();
        Some(project(&snapshot))
    }
}
