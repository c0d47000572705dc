//! Kapwa command-line entry point

use clap::Parser;
use kapwa_cli::commands::Commands;

/// Split documents into token-bounded, overlapping chunks for retrieval
#[derive(Debug, Parser)]
#[command(name = "kapwa", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    Cli::parse().command.execute()
}
