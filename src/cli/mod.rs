//! CLI command definitions and handlers

mod init;
mod status;
mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Draftmeter - writing-progress meters for folder trees
#[derive(Parser, Debug)]
#[command(name = "draftmeter")]
#[command(
    version,
    about = "Word counts, pace, and breakpoint notifications for a folder of chapters",
    long_about = "Draftmeter aggregates word counts over a folder tree of chapters and \
renders per-folder badges and progress meters. In watch mode it recomputes on every \
document change, cancelling superseded passes, and notifies when a configured \
breakpoint is crossed.",
    after_help = "\
Examples:
  draftmeter .                    Recompute and render once
  draftmeter status --format json JSON output for scripting
  draftmeter watch                Live meters while you write
  draftmeter init                 Write an example draftmeter.toml

Configuration: draftmeter.toml in the project directory (see `draftmeter init`)."
)]
pub struct Cli {
    /// Project directory (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recompute progress now and render once
    Status {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Watch the folder tree and re-render on every change
    Watch {
        /// Debounce window for filesystem events, in milliseconds
        #[arg(long, default_value = "500")]
        debounce_ms: u64,
    },

    /// Write an example draftmeter.toml with commented settings
    Init,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Status { format }) => status::run(&cli.path, &format),
        Some(Commands::Watch { debounce_ms }) => watch::run(&cli.path, debounce_ms),
        Some(Commands::Init) => init::run(&cli.path),
        // Bare `draftmeter .` behaves like `status`
        None => status::run(&cli.path, "text"),
    }
}
