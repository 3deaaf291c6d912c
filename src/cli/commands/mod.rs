//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `import`: CSV → enrichment → output document
//! - `progress`: inspect and prune the progress file

mod import;
mod progress;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Overrides};

pub use import::cmd_import;
pub use progress::{cmd_progress, cmd_prune};

/// BookBuddy → Open Library → document database importer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: the OS config directory's shelf-import/config.toml)
    #[arg(long, global = true, env = "SHELF_IMPORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Import a BookBuddy CSV, enriching ISBNs and covers
    Import {
        /// BookBuddy CSV export
        #[arg(short, long, env = "SHELF_IMPORT_INPUT")]
        input: Option<PathBuf>,
        /// Output JSON document (default: ~/FamilyBooks/books_for_import.json)
        #[arg(short, long, env = "SHELF_IMPORT_OUTPUT")]
        output: Option<PathBuf>,
        /// Progress file (default: ~/FamilyBooks/import_progress.json)
        #[arg(long, env = "SHELF_IMPORT_PROGRESS")]
        progress: Option<PathBuf>,
        /// Milliseconds to wait between books that hit the network
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Cache lookups that failed transiently instead of retrying them next run
        #[arg(long)]
        cache_failures: bool,
    },
    /// Show what the progress file holds
    Progress {
        /// Progress file (default: ~/FamilyBooks/import_progress.json)
        #[arg(long, env = "SHELF_IMPORT_PROGRESS")]
        progress: Option<PathBuf>,
    },
    /// Drop progress entries with neither ISBN nor cover so they are retried
    Prune {
        /// Progress file (default: ~/FamilyBooks/import_progress.json)
        #[arg(long, env = "SHELF_IMPORT_PROGRESS")]
        progress: Option<PathBuf>,
        /// Show what would be removed without saving
        #[arg(long)]
        dry_run: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let file = config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Import {
            input,
            output,
            progress,
            delay_ms,
            cache_failures,
        } => {
            let overrides = Overrides {
                input_path: input.clone(),
                output_path: output.clone(),
                progress_path: progress.clone(),
                request_delay_ms: *delay_ms,
                cache_transient_failures: *cache_failures,
            };
            let config = config::ImportConfig::resolve(file, overrides)?;
            let rt = Runtime::new()?;
            cmd_import(&rt, &config)
        }
        Commands::Progress { progress } => {
            cmd_progress(&config::resolve_progress_path(&file, progress.clone()))
        }
        Commands::Prune { progress, dry_run } => cmd_prune(
            &config::resolve_progress_path(&file, progress.clone()),
            *dry_run,
        ),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Print a banner line
pub(crate) fn print_rule() {
    println!("{}", "=".repeat(60));
}
