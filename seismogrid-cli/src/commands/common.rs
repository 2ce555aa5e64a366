//! Common utilities shared across CLI commands.

use std::path::Path;

use seismogrid::config::ConfigFile;

use crate::error::CliError;

/// Loads the configuration from an explicit path or the user path.
/// A missing file yields the defaults either way.
pub fn load_config(config_path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}
