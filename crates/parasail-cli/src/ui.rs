//! Terminal implementation of the host UI.

use async_trait::async_trait;
use parasail_core::HostUi;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// Prompts on stderr, reads answers from stdin, prints messages to stdout.
pub struct TerminalUi {
    stdin: Mutex<BufReader<Stdin>>,
    /// Answer for the next path prompt, taken from the command line.
    preset_path: std::sync::Mutex<Option<String>>,
    assume_yes: bool,
}

impl TerminalUi {
    pub fn new(preset_path: Option<String>, assume_yes: bool) -> Self {
        Self {
            stdin: Mutex::new(BufReader::new(tokio::io::stdin())),
            preset_path: std::sync::Mutex::new(preset_path),
            assume_yes,
        }
    }

    async fn read_line(&self, prompt: &str) -> Option<String> {
        eprint!("{}", prompt);
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        let mut stdin = self.stdin.lock().await;
        match stdin.read_line(&mut line).await {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

#[async_trait]
impl HostUi for TerminalUi {
    async fn prompt_path(&self, prompt: &str, placeholder: &str) -> Option<String> {
        let preset = self.preset_path.lock().ok().and_then(|mut p| p.take());
        if preset.is_some() {
            return preset;
        }
        self.read_line(&format!("{} (e.g. {}): ", prompt, placeholder))
            .await
    }

    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.read_line(&format!("{} [y/N] ", message))
            .await
            .is_some_and(|answer| is_yes(&answer))
    }

    fn show_info(&self, message: &str) {
        println!("{}", message);
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
