//! Tunelink CLI - Command-line interface
//!
//! Runs the song lookup API server or a one-off lookup.

mod commands;
mod tracing_setup;

use std::path::PathBuf;

use clap::Parser;
use tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "tunelink")]
#[command(about = "Find a song on every music platform")]
#[command(version)]
struct Cli {
    /// Console log level
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,
    /// Also write a full trace log to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.log_dir.as_deref())?;

    commands::handle_command(cli.command).await
}
