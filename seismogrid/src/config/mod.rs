//! INI configuration for the command line and embedding callers.
//!
//! One `config.ini` describes a whole run: the region, the interval,
//! the buffer backend, the computation mode with its input files, and
//! the output grid. Missing files and sections fall back to defaults;
//! invalid values fail loading with a typed error.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_CONDITIONAL_POE, DEFAULT_INTERVAL_STEPS,
    DEFAULT_MEMCACHED_HOST, DEFAULT_MEMCACHED_PORT, DEFAULT_OUTPUT_FILE, DEFAULT_WORKERS,
};
pub use file::{config_directory, config_file_path, ConfigError};
pub use settings::{
    CacheBackend, CacheSettings, ComputeMode, ComputeSettings, ConfigFile, GeneralSettings,
    IntervalSettings, OutputSettings, RegionSettings,
};
