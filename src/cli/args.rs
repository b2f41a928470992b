//! Command line argument parsing for the Phalanx CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Phalanx - run structured searches against an in-memory index
#[derive(Parser, Debug, Clone)]
#[command(name = "phalanx")]
#[command(about = "Run structured search requests against an in-memory index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PhalanxArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PhalanxArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index items and execute a search request
    Search(SearchArgs),

    /// Index items and show index statistics
    Stats(StatsArgs),
}

/// Files describing an index and its content.
#[derive(Parser, Debug, Clone)]
pub struct IndexSource {
    /// Index definition file (JSON)
    #[arg(short, long, value_name = "INDEX_FILE")]
    pub index: PathBuf,

    /// Item file (JSON array or JSONL)
    #[arg(long, value_name = "ITEMS_FILE")]
    pub items: PathBuf,

    /// Backend configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: IndexSource,

    /// Search request file (JSON)
    #[arg(short, long, value_name = "REQUEST_FILE")]
    pub request: PathBuf,
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: IndexSource,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
