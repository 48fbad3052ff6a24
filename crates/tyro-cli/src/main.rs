//! Tyro: learn the Tyro language by solving challenges in your own editor.
//!
//! ## Commands
//!
//! - `list`: levels and challenges with completion status
//! - `show`: a challenge's lesson and mission
//! - `start`: seed the workspace file from the scaffold
//! - `check`: validate the current solution, record the attempt, award XP
//! - `hint` / `reset` / `solution`: the usual lifelines
//! - `stats`: XP, rank, streaks

mod commands;
mod feedback;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tyro")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive Tyro coding curriculum", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a tyro.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the workspace directory
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Override the progress file
    #[arg(long, global = true)]
    progress: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List levels and challenges with completion status
    List,

    /// Show a challenge's lesson and mission
    Show {
        /// Challenge id, e.g. L2-C1
        id: String,
    },

    /// Create the workspace file for a challenge, seeded with the scaffold
    Start {
        /// Challenge id, e.g. L2-C1
        id: String,
    },

    /// Validate the current solution and record the attempt
    Check {
        /// Challenge id, e.g. L2-C1
        id: String,

        /// Print the raw validation result as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Reveal a hint
    Hint {
        /// Challenge id, e.g. L2-C1
        id: String,

        /// Which hint to show (1-based)
        #[arg(short, long, default_value_t = 1)]
        number: usize,
    },

    /// Reset the workspace file to the scaffold
    Reset {
        /// Challenge id, e.g. L2-C1
        id: String,
    },

    /// Reveal the reference solution (unlocks after 3 attempts)
    Solution {
        /// Challenge id, e.g. L2-C1
        id: String,
    },

    /// Show XP, rank, streaks and overall progress
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context::new(
        cli.config.as_deref(),
        cli.workspace,
        cli.progress,
    )?;

    match cli.command {
        Commands::List => commands::list(&ctx),
        Commands::Show { id } => commands::show(&ctx, &id),
        Commands::Start { id } => commands::start(&ctx, &id),
        Commands::Check { id, json } => commands::check(&ctx, &id, json),
        Commands::Hint { id, number } => commands::hint(&ctx, &id, number),
        Commands::Reset { id } => commands::reset(&ctx, &id),
        Commands::Solution { id } => commands::solution(&ctx, &id),
        Commands::Stats => commands::stats(&ctx),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
