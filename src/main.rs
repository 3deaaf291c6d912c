//! Shelf Import - BookBuddy catalog migration with Open Library enrichment.
//!
//! Reads a BookBuddy CSV export, fills in missing ISBNs and cover URLs from
//! Open Library (resuming from a progress file), and writes a keyed JSON
//! document ready for bulk import into a document database.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod output;
pub mod progress;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("shelf_import=info".parse()?))
        .init();

    cli::run_command(&args)
}
