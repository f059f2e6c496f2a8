//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Personal time tracker.
///
/// Starts an interactive session: name a task, start and stop the timer,
/// and every completed run is recorded with its duration and cost.
/// Type `help` at the prompt for the available commands.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the database file, overriding the configured location.
    #[arg(short, long)]
    pub database: Option<PathBuf>,
}
