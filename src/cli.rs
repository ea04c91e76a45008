use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Team task boards, dashboard, assistant and defect tracker.
/// Data lives in ~/.teamboard unless --data-dir is given.
#[derive(Parser)]
#[command(name = "tb", version, about = "Team board and defect tracker")]
pub struct Cli {
    /// Directory holding the task and defect documents.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
