//! ParaSail CLI - Terminal host for the ParaSail library registry.
//!
//! Registers and removes ParaSail libraries, shows the library tree and,
//! when pointed at a running analysis service, forwards registry changes to
//! it and queries completions and diagnostics.

mod render;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parasail_core::commands::{self, CommandOutcome};
use parasail_core::paths::document_uri;
use parasail_core::{
    Confirmation, HostUi, LibraryManager, LibraryRegistry, LibraryResolver, Position,
    RegistryStore, SyncChannel, SyncConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use ui::TerminalUi;

#[derive(Parser, Debug)]
#[command(name = "parasail")]
#[command(about = "Manage ParaSail libraries and talk to the analysis service")]
struct Args {
    /// Registry file (defaults to the platform config directory)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Analysis service address, e.g. 127.0.0.1:7777
    #[arg(long)]
    server: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a library directory or a single .psl/.psi file
    Add {
        /// Library path (prompted for when omitted)
        path: Option<String>,
    },
    /// Unregister a library
    Remove {
        /// Library path (prompted for when omitted)
        path: Option<String>,
    },
    /// List registered libraries
    List,
    /// Show the library tree
    Tree {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the analysis service for completions
    Complete {
        file: String,
        /// Zero-based line
        line: u32,
        /// Zero-based character offset
        character: u32,
    },
    /// Ask the analysis service for diagnostics
    Check { file: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let store = match args.registry {
        Some(path) => RegistryStore::new(path),
        None => RegistryStore::at_default_location()?,
    };
    let registry = LibraryRegistry::open(store).context("Failed to open library registry")?;
    if let Some(err) = registry.load_error() {
        warn!("Starting with an empty registry: {}", err);
    }

    let mut manager = LibraryManager::new(registry, LibraryResolver::new());
    let mut confirmations = None;
    if let Some(addr) = &args.server {
        match SyncChannel::connect_tcp(addr.as_str()).await {
            Ok((channel, rx)) => {
                manager = manager.with_sync(channel);
                confirmations = Some(rx);
            }
            Err(e) => warn!("Analysis service at {} unavailable: {}", addr, e),
        }
    }

    let code = run(args.command, args.yes, &mut manager, confirmations).await?;

    manager.shutdown().await;
    Ok(code)
}

async fn run(
    command: Command,
    assume_yes: bool,
    manager: &mut LibraryManager,
    mut confirmations: Option<mpsc::UnboundedReceiver<Confirmation>>,
) -> Result<ExitCode> {
    let code = match command {
        Command::Add { path } => {
            let ui = TerminalUi::new(path, assume_yes);
            let outcome = commands::add_library(manager, &ui).await;
            drain_confirmations(&ui, confirmations.as_mut()).await;
            exit_code(&outcome)
        }
        Command::Remove { path } => {
            let ui = TerminalUi::new(path, assume_yes);
            let outcome = commands::remove_library(manager, &ui, None).await;
            drain_confirmations(&ui, confirmations.as_mut()).await;
            exit_code(&outcome)
        }
        Command::List => {
            print!("{}", render::render_library_list(manager.libraries()));
            ExitCode::SUCCESS
        }
        Command::Tree { json } => {
            let forest = manager.view().forest();
            if json {
                println!("{}", serde_json::to_string_pretty(&forest)?);
            } else {
                print!("{}", render::render_forest(&forest));
            }
            ExitCode::SUCCESS
        }
        Command::Complete {
            file,
            line,
            character,
        } => {
            require_service(manager);
            let uri = document_uri(&file)?;
            let candidates = manager
                .completions_at(&uri, Position::new(line, character))
                .await;
            print!("{}", render::render_completions(&candidates));
            ExitCode::SUCCESS
        }
        Command::Check { file } => {
            require_service(manager);
            let uri = document_uri(&file)?;
            let diagnostics = manager.check_document(&uri).await.unwrap_or_default();
            print!("{}", render::render_diagnostics(&file, &diagnostics));
            ExitCode::SUCCESS
        }
    };
    Ok(code)
}

/// Show service confirmations that arrive shortly after a change.
async fn drain_confirmations(
    ui: &dyn HostUi,
    confirmations: Option<&mut mpsc::UnboundedReceiver<Confirmation>>,
) {
    let Some(rx) = confirmations else {
        return;
    };
    while let Ok(Some(confirmation)) =
        tokio::time::timeout(SyncConfig::CONFIRMATION_WAIT, rx.recv()).await
    {
        ui.show_info(&commands::confirmation_message(&confirmation));
    }
}

fn require_service(manager: &LibraryManager) {
    if manager.sync().is_none() {
        info!("No analysis service connected (use --server); results will be empty");
    }
}

fn exit_code<T>(outcome: &CommandOutcome<T>) -> ExitCode {
    if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
