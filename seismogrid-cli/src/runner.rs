//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers share one startup path.

use std::path::Path;

use tracing::info;

use seismogrid::config::ConfigFile;
use seismogrid::logging::{default_log_dir, init_logging, LoggingGuard};

use crate::commands::common::load_config;
use crate::error::CliError;

/// Runner that holds the loaded configuration and keeps logging alive.
pub struct CliRunner {
    /// Logging guard - keeps the file appender flushing while the
    /// runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Creates a runner: loads the config file (or the defaults when no
    /// file exists) and initializes logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Explicit config file, or `None` for the user path
    /// * `verbose` - When true, log output is mirrored to stdout
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let log_dir = config
            .general
            .log_dir
            .clone()
            .unwrap_or_else(default_log_dir);
        let logging_guard = init_logging(&log_dir, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("SeismoGrid v{}", seismogrid::VERSION);
        info!("SeismoGrid CLI: {} command", command);
    }
}
