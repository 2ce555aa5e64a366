//! Buffer management CLI commands.

use std::path::PathBuf;

use clap::Subcommand;

use crate::commands::common;
use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show buffer statistics for the configured backend
    Stats,
    /// Flush all entries from the configured backend.
    ///
    /// Memoized loss-ratio-exceedance matrices are recomputed on the
    /// next run, so flushing is safe at any time between computations.
    Flush,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = common::load_config(config_path.as_deref())?;
    let buffer = config.cache.build()?;

    match action {
        CacheAction::Stats => {
            let stats = buffer.stats();
            println!("Buffer backend: {}", buffer.backend());
            println!("  Hits:     {}", stats.hits);
            println!("  Misses:   {}", stats.misses);
            println!("  Sets:     {}", stats.sets);
            println!("  Flushes:  {}", stats.flushes);
            println!("  Hit rate: {:.1}%", stats.hit_rate() * 100.0);
            Ok(())
        }
        CacheAction::Flush => {
            println!("Flushing {} buffer...", buffer.backend());
            buffer.flush().map_err(CliError::Cache)?;
            println!("Done.");
            Ok(())
        }
    }
}
