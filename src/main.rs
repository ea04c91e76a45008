//! # tb - team board for the terminal
//!
//! Two team kanban boards sharing one task collection, a project dashboard,
//! a keyword-driven task assistant and a defect tracker. Everything runs
//! against local JSON documents, either from the command line or through an
//! interactive terminal interface.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task to the Mav-CDS board
//! tb board mav-cds add --story "Login page" --assignee Kiran --name Anil \
//!     --start today --end "in 5d" --priority high
//!
//! # Move it along the workflow
//! tb board mav-cds move 1718000000000 in-development
//!
//! # Ask about it
//! tb chat what is Kiran working on
//!
//! # Open the interface
//! tb ui
//! ```
//!
//! ## Boards
//!
//! A board shows the tasks whose assignee is on its team roster. Saving a
//! board merges its tasks back into the shared collection; tasks belonging to
//! the other team are never touched.
//!
//! Data is stored in `~/.teamboard/` (`jira-tasks.json`, `defect-list.json`,
//! optional `config.toml`). Pass `--data-dir` to use another directory.
//! Set `RUST_LOG=teamboard=debug` to trace store and board activity on stderr.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod assistant;
pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod confirm;
pub mod dates;
pub mod defect;
pub mod display;
pub mod error;
pub mod fields;
pub mod roster;
pub mod stats;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod input;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use config::{resolve_data_dir, Config, CONFIG_FILE};
use error::Result;
use store::{FileStore, RecordStore};

fn main() {
    // Tracing is opt-in via RUST_LOG and goes to stderr, away from command output.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let config_path = cli.config.unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    let config = Config::load_or_default(&config_path)?;
    tracing::debug!(
        data_dir = %data_dir.display(),
        merge = ?config.store.merge,
        "starting"
    );
    let store = RecordStore::with_policy(FileStore::new(data_dir), config.store.merge);

    match cli.command {
        Commands::Boards => cmd_boards(&store),
        Commands::Board { board, action } => cmd_board(&store, &board, action),
        Commands::Dashboard { json } => cmd_dashboard(&store, &config, json),
        Commands::Chat { query } => cmd_chat(&store, &config, query),
        Commands::Defects { action } => cmd_defects(&store, action),
        Commands::Ui { board } => tui::run::run_tui(&store, &config, &board),
        Commands::Completions { .. } => Ok(()),
    }
}
