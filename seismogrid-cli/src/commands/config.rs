//! Configuration management CLI commands.
//!
//! Provides `config show`, `config path`, and `config init` for
//! inspecting and bootstrapping the configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use seismogrid::config::{config_file_path, ConfigFile};

use crate::commands::common;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show the configuration file path
    Path,

    /// Create the configuration file with defaults if it does not exist
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<PathBuf>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_show(config_path.as_deref()),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init => run_init(),
    }
}

/// Show the effective configuration, defaults filled in.
fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = common::load_config(config_path)?;

    println!("Configuration Settings");
    println!("======================");
    println!();
    println!("[general]");
    println!("  workers = {}", config.general.workers);
    println!("  log_dir = {}", display_path(&config.general.log_dir));
    println!();
    println!("[region]");
    println!("  lower_left_longitude = {}", config.region.lower_left_longitude);
    println!("  lower_left_latitude = {}", config.region.lower_left_latitude);
    println!("  upper_right_longitude = {}", config.region.upper_right_longitude);
    println!("  upper_right_latitude = {}", config.region.upper_right_latitude);
    println!("  cell_size = {}", config.region.cell_size);
    println!();
    println!("[interval]");
    println!("  steps = {}", config.interval.steps);
    println!();
    println!("[cache]");
    println!("  backend = {}", config.cache.backend);
    println!("  host = {}", config.cache.host);
    println!("  port = {}", config.cache.port);
    println!("  ttl_secs = {}", config.cache.ttl_secs);
    println!();
    println!("[compute]");
    println!("  mode = {}", config.compute.mode);
    println!("  poe = {}", config.compute.poe);
    println!(
        "  vulnerability_file = {}",
        display_path(&config.compute.vulnerability_file)
    );
    println!("  hazard_file = {}", display_path(&config.compute.hazard_file));
    println!("  exposure_file = {}", display_path(&config.compute.exposure_file));
    println!("  intensity_file = {}", display_path(&config.compute.intensity_file));
    println!("  country_file = {}", display_path(&config.compute.country_file));
    println!();
    println!("[output]");
    println!("  path = {}", config.output.path.display());
    println!("  nodata = {}", config.output.nodata);

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Create the configuration file with defaults if missing.
fn run_init() -> Result<(), CliError> {
    let path = ConfigFile::ensure_exists().map_err(|e| CliError::Config(e.to_string()))?;
    println!("Configuration file: {}", path.display());
    Ok(())
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "(not set)".to_string(),
    }
}
