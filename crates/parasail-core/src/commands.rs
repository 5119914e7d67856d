//! User-facing add-library and remove-library flows.
//!
//! The host supplies prompts, confirmations and message display through
//! [`HostUi`]; everything else is decided here so every host behaves the same.

use crate::error::LibraryError;
use crate::library::Library;
use crate::manager::LibraryManager;
use crate::paths::normalize_input_path;
use crate::sync::Confirmation;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

const ADD_PROMPT: &str = "Enter the library path";
const REMOVE_PROMPT: &str = "Enter the path of the library to remove";
const PATH_PLACEHOLDER: &str = "/path/to/library";

/// Interaction capabilities a host provides to the command flows.
#[async_trait]
pub trait HostUi: Send + Sync {
    /// Ask for a path. `None` means the user cancelled.
    async fn prompt_path(&self, prompt: &str, placeholder: &str) -> Option<String>;

    /// Ask a yes/no question; `false` on decline or dismissal.
    async fn confirm(&self, message: &str) -> bool;

    fn show_info(&self, message: &str);

    fn show_error(&self, message: &str);
}

/// How a command flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome<T> {
    Done(T),
    /// The user backed out; nothing was shown or changed.
    Cancelled,
    /// An error was shown to the user.
    Failed,
}

impl<T> CommandOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, CommandOutcome::Failed)
    }
}

/// Prompt for a path and register the library found there.
pub async fn add_library(
    manager: &mut LibraryManager,
    ui: &dyn HostUi,
) -> CommandOutcome<Library> {
    let input = ui
        .prompt_path(ADD_PROMPT, PATH_PLACEHOLDER)
        .await
        .unwrap_or_default();

    match manager.add_library(&input).await {
        Ok(library) => {
            ui.show_info(&added_message(&library));
            CommandOutcome::Done(library)
        }
        Err(e) => report(ui, e),
    }
}

/// Remove a library, asking for confirmation first.
///
/// With `selection` (a library node picked in the tree) that library is
/// removed; otherwise the user is asked for its path.
pub async fn remove_library(
    manager: &mut LibraryManager,
    ui: &dyn HostUi,
    selection: Option<&Path>,
) -> CommandOutcome<Library> {
    let path = match selection {
        Some(path) => path.to_path_buf(),
        None => {
            let Some(input) = ui.prompt_path(REMOVE_PROMPT, PATH_PLACEHOLDER).await else {
                return CommandOutcome::Cancelled;
            };
            let input = input.trim();
            if input.is_empty() {
                return CommandOutcome::Cancelled;
            }
            match normalize_input_path(input) {
                Ok(path) if manager.find(&path).is_some() => path,
                _ => {
                    return report(
                        ui,
                        LibraryError::LibraryNotFound(Path::new(input).to_path_buf()),
                    )
                }
            }
        }
    };

    let Some(name) = manager.find(&path).map(|l| l.name.clone()) else {
        return report(ui, LibraryError::LibraryNotFound(path));
    };

    if !ui.confirm(&confirmation_prompt(&name)).await {
        debug!("Removal of '{}' declined", name);
        return CommandOutcome::Cancelled;
    }

    match manager.remove_library(path.as_path()).await {
        Ok(library) => {
            ui.show_info(&format!("Library '{}' removed.", library.name));
            CommandOutcome::Done(library)
        }
        Err(e) => report(ui, e),
    }
}

/// Text shown when the analysis service confirms a change.
pub fn confirmation_message(confirmation: &Confirmation) -> String {
    match confirmation {
        Confirmation::LibraryAdded { name, .. } => {
            format!("Server confirmed: Library '{}' added.", name)
        }
        Confirmation::LibraryRemoved { name, .. } => {
            format!("Server confirmed: Library '{}' removed.", name)
        }
    }
}

fn added_message(library: &Library) -> String {
    format!(
        "Library '{}' added with {} files ({} sources, {} headers).",
        library.name,
        library.file_count(),
        library.sources.len(),
        library.headers.len()
    )
}

fn confirmation_prompt(name: &str) -> String {
    format!("Are you sure you want to remove '{}'?", name)
}

fn report<T>(ui: &dyn HostUi, error: LibraryError) -> CommandOutcome<T> {
    if error.is_user_facing() {
        ui.show_error(&error.to_string());
    } else {
        debug!("Suppressed non-user-facing error: {}", error);
    }
    CommandOutcome::Failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LibraryRegistry;
    use crate::resolver::LibraryResolver;
    use crate::store::RegistryStore;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Scripted host: fixed answers, recorded output.
    #[derive(Default)]
    struct ScriptedUi {
        answer: Option<String>,
        confirm: bool,
        infos: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
        confirm_prompts: Mutex<Vec<String>>,
    }

    impl ScriptedUi {
        fn answering(answer: Option<&str>, confirm: bool) -> Self {
            Self {
                answer: answer.map(str::to_string),
                confirm,
                ..Default::default()
            }
        }

        fn infos(&self) -> Vec<String> {
            self.infos.lock().unwrap().clone()
        }

        fn errors(&self) -> Vec<String> {
            self.errors.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HostUi for ScriptedUi {
        async fn prompt_path(&self, _prompt: &str, _placeholder: &str) -> Option<String> {
            self.answer.clone()
        }

        async fn confirm(&self, message: &str) -> bool {
            self.confirm_prompts.lock().unwrap().push(message.to_string());
            self.confirm
        }

        fn show_info(&self, message: &str) {
            self.infos.lock().unwrap().push(message.to_string());
        }

        fn show_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn create_manager() -> (LibraryManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = RegistryStore::new(temp_dir.path().join("libraries.json"));
        let registry = LibraryRegistry::open(store).unwrap();
        (LibraryManager::new(registry, LibraryResolver::new()), temp_dir)
    }

    fn library_dir(temp_dir: &TempDir) -> PathBuf {
        let dir = temp_dir.path().join("collections");
        fs::create_dir_all(&dir).unwrap();
        for file in ["api.psi", "list.psl", "map.psl"] {
            fs::write(dir.join(file), "").unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_add_shows_summary() {
        let (mut manager, temp_dir) = create_manager();
        let dir = library_dir(&temp_dir);
        let ui = ScriptedUi::answering(Some(&dir.display().to_string()), true);

        let outcome = add_library(&mut manager, &ui).await;
        assert!(matches!(outcome, CommandOutcome::Done(_)));
        assert_eq!(
            ui.infos(),
            vec!["Library 'collections' added with 3 files (2 sources, 1 headers).".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_cancelled_prompt_reports_no_path() {
        let (mut manager, _temp_dir) = create_manager();
        let ui = ScriptedUi::answering(None, true);

        assert!(add_library(&mut manager, &ui).await.is_failed());
        assert_eq!(ui.errors(), vec!["No path entered.".to_string()]);
    }

    #[tokio::test]
    async fn test_add_duplicate_reports_existing_path() {
        let (mut manager, temp_dir) = create_manager();
        let dir = library_dir(&temp_dir);
        let ui = ScriptedUi::answering(Some(&dir.display().to_string()), true);

        add_library(&mut manager, &ui).await;
        assert!(add_library(&mut manager, &ui).await.is_failed());
        assert_eq!(
            ui.errors(),
            vec![format!("Library path {} already exists.", dir.display())]
        );
    }

    #[tokio::test]
    async fn test_add_missing_path_reports_it() {
        let (mut manager, temp_dir) = create_manager();
        let missing = temp_dir.path().join("missing");
        let ui = ScriptedUi::answering(Some(&missing.display().to_string()), true);

        assert!(add_library(&mut manager, &ui).await.is_failed());
        assert_eq!(
            ui.errors(),
            vec![format!("The path {} does not exist.", missing.display())]
        );
    }

    #[tokio::test]
    async fn test_remove_selection_after_confirmation() {
        let (mut manager, temp_dir) = create_manager();
        let dir = library_dir(&temp_dir);
        manager.add_library(&dir.display().to_string()).await.unwrap();
        let ui = ScriptedUi::answering(None, true);

        let outcome = remove_library(&mut manager, &ui, Some(&dir)).await;
        assert!(matches!(outcome, CommandOutcome::Done(_)));
        assert_eq!(
            ui.confirm_prompts.lock().unwrap().clone(),
            vec!["Are you sure you want to remove 'collections'?".to_string()]
        );
        assert_eq!(ui.infos(), vec!["Library 'collections' removed.".to_string()]);
        assert!(manager.libraries().is_empty());
    }

    #[tokio::test]
    async fn test_remove_declined_is_silent_noop() {
        let (mut manager, temp_dir) = create_manager();
        let dir = library_dir(&temp_dir);
        manager.add_library(&dir.display().to_string()).await.unwrap();
        let ui = ScriptedUi::answering(None, false);

        let outcome = remove_library(&mut manager, &ui, Some(&dir)).await;
        assert_eq!(outcome, CommandOutcome::Cancelled);
        assert!(ui.infos().is_empty());
        assert!(ui.errors().is_empty());
        assert_eq!(manager.libraries().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_by_prompt_unknown_path() {
        let (mut manager, _temp_dir) = create_manager();
        let ui = ScriptedUi::answering(Some("/nowhere/lib"), true);

        assert!(remove_library(&mut manager, &ui, None).await.is_failed());
        assert_eq!(
            ui.errors(),
            vec!["No library found with the path: /nowhere/lib".to_string()]
        );
    }

    #[tokio::test]
    async fn test_remove_by_prompt_known_path() {
        let (mut manager, temp_dir) = create_manager();
        let dir = library_dir(&temp_dir);
        manager.add_library(&dir.display().to_string()).await.unwrap();
        let ui = ScriptedUi::answering(Some(&dir.display().to_string()), true);

        let outcome = remove_library(&mut manager, &ui, None).await;
        assert!(matches!(outcome, CommandOutcome::Done(_)));
        assert!(manager.libraries().is_empty());
    }

    #[test]
    fn test_confirmation_messages() {
        let added = Confirmation::LibraryAdded {
            name: "collections".to_string(),
            path: PathBuf::from("/libs/collections"),
        };
        assert_eq!(
            confirmation_message(&added),
            "Server confirmed: Library 'collections' added."
        );

        let removed = Confirmation::LibraryRemoved {
            name: "collections".to_string(),
            path: PathBuf::from("/libs/collections"),
        };
        assert_eq!(
            confirmation_message(&removed),
            "Server confirmed: Library 'collections' removed."
        );
    }
}
