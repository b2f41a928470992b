//! Phalanx CLI binary.

use std::io::Write;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use phalanx::cli::args::*;
use phalanx::cli::commands::*;

fn main() {
    let args = PhalanxArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let command = match &args.command {
        Command::Search(_) => "search",
        Command::Stats(_) => "stats",
    };
    if let Err(e) = execute_command(args).with_context(|| format!("{command} failed")) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
