//! SeismoGrid CLI - Command-line interface
//!
//! This binary provides a command-line interface to the seismogrid
//! library: running computations, inspecting the buffer, and managing
//! configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod runner;

use commands::cache::CacheAction;
use commands::compute::ComputeArgs;
use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "seismogrid")]
#[command(version = seismogrid::VERSION)]
#[command(about = "Seismic risk computation over geographic grids", long_about = None)]
struct Cli {
    /// Also log to stdout
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured computation and write the result grid
    Compute {
        /// Configuration file (defaults to the user configuration path)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Result grid path, overriding the configured output path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Inspect or flush the cross-cell buffer
    Cache {
        /// Configuration file (defaults to the user configuration path)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(subcommand)]
        action: CacheAction,
    },

    /// View or bootstrap configuration
    Config {
        /// Configuration file (defaults to the user configuration path)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compute { config, output } => {
            commands::compute::run(ComputeArgs { config, output }, cli.verbose)
        }
        Commands::Cache { config, action } => commands::cache::run(action, config),
        Commands::Config { config, command } => commands::config::run(command, config),
    };

    if let Err(error) = result {
        error.exit();
    }
}
