//! k7 CLI: scaffold Go backend projects from composable template collections.
//!
//! Two commands: `init` generates a project from one storage and one server
//! variant, `list` prints the variants each concern accepts.
//!
//! All generation happens in [`k7_core`]; this crate only gathers choices,
//! reports progress and drives the external `go` and `git` tools.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "k7",
    about = "Scaffold Go backend projects from composable templates",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    Init(commands::init::InitArgs),

    /// List the variants available for each concern
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Filter directive for a `-v` count.
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init(args) => commands::init::run(args).await?,
        Commands::List { json } => commands::list::run(json)?,
    }

    Ok(())
}
