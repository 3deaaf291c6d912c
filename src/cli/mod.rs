//! Command-line interface for shelf-import.
//!
//! This module provides the import run plus two maintenance commands for
//! the progress file.

mod commands;

pub use commands::{Cli, Commands, run_command};
