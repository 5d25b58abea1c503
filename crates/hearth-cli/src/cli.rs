use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `hearth` binary.
#[derive(Debug, Parser)]
#[command(name = "hearth", version, about = "Hearth - home task automation over a document store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra config file merged over the user and project layers
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Materialize the coming week's task instances from the templates
    Rollover {
        /// Anchor instant, ISO date or datetime (assumed UTC); defaults to now
        #[arg(long)]
        now: Option<String>,
    },
    /// Backfill and reschedule stray tasks in the active database
    Review {
        /// Anchor date, ISO date or datetime (assumed UTC); defaults to today
        #[arg(long)]
        now: Option<String>,
    },
}
