//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::output::DEFAULT_NODATA;

/// Default worker thread count. Single-threaded keeps cell order
/// deterministic; raise it for large regions.
pub const DEFAULT_WORKERS: usize = 1;

/// Default number of loss-ratio interval subdivisions.
pub const DEFAULT_INTERVAL_STEPS: usize = 10;

/// Default probability of exceedance for the conditional loss.
pub const DEFAULT_CONDITIONAL_POE: f64 = 0.1;

/// Default memcached host.
pub const DEFAULT_MEMCACHED_HOST: &str = "127.0.0.1";

/// Default memcached port.
pub const DEFAULT_MEMCACHED_PORT: u16 = 11211;

/// Default buffer entry time-to-live (0 = no expiry).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 0;

/// Default result grid file name.
pub const DEFAULT_OUTPUT_FILE: &str = "losses.asc";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            general: GeneralSettings {
                workers: DEFAULT_WORKERS,
                log_dir: None,
            },
            region: RegionSettings {
                lower_left_longitude: 0.0,
                lower_left_latitude: 0.0,
                upper_right_longitude: 2.0,
                upper_right_latitude: 2.0,
                cell_size: 1.0,
            },
            interval: IntervalSettings {
                steps: DEFAULT_INTERVAL_STEPS,
            },
            cache: CacheSettings {
                backend: CacheBackend::Memory,
                host: DEFAULT_MEMCACHED_HOST.to_string(),
                port: DEFAULT_MEMCACHED_PORT,
                ttl_secs: DEFAULT_CACHE_TTL_SECS,
            },
            compute: ComputeSettings {
                mode: ComputeMode::Classical,
                poe: DEFAULT_CONDITIONAL_POE,
                vulnerability_file: None,
                hazard_file: None,
                exposure_file: None,
                intensity_file: None,
                country_file: None,
            },
            output: OutputSettings {
                path: PathBuf::from(DEFAULT_OUTPUT_FILE),
                nodata: DEFAULT_NODATA,
            },
        }
    }
}
