//! provas: segment OCR'd exam text into exercise records

use clap::Parser;
use provas_cli::commands::Commands;

/// Segment exam text into chunks and extract multiple-choice exercises
#[derive(Debug, Parser)]
#[command(name = "provas", version, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    Cli::parse().command.execute()
}
