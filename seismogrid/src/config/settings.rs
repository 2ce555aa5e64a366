//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, CacheError, MemcachedCache, MemcachedConfig, MemoryCache, NoOpCache};
use crate::geo::{GeoError, Region, Site};
use crate::stats::Interval;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Run-wide settings
    pub general: GeneralSettings,
    /// The grid to compute over
    pub region: RegionSettings,
    /// Loss-ratio threshold settings
    pub interval: IntervalSettings,
    /// Cross-cell buffer settings
    pub cache: CacheSettings,
    /// Computation mode and inputs
    pub compute: ComputeSettings,
    /// Result grid settings
    pub output: OutputSettings,
}

/// Run-wide configuration.
#[derive(Debug, Clone)]
pub struct GeneralSettings {
    /// Worker threads for distributing row bands. 1 runs everything on
    /// the calling thread.
    pub workers: usize,
    /// Log file directory. Unset falls back to ~/.seismogrid/logs.
    pub log_dir: Option<PathBuf>,
}

/// Region configuration. Corner order does not matter; the region
/// normalizes to its bounding box.
#[derive(Debug, Clone)]
pub struct RegionSettings {
    pub lower_left_longitude: f64,
    pub lower_left_latitude: f64,
    pub upper_right_longitude: f64,
    pub upper_right_latitude: f64,
    /// Cell size in decimal degrees.
    pub cell_size: f64,
}

impl RegionSettings {
    /// Builds the domain region from the configured corners.
    pub fn to_region(&self) -> Result<Region, GeoError> {
        let lower_left = Site::new(self.lower_left_longitude, self.lower_left_latitude)?;
        let upper_right = Site::new(self.upper_right_longitude, self.upper_right_latitude)?;
        Region::new(lower_left, upper_right, self.cell_size)
    }
}

/// Loss-ratio interval configuration.
#[derive(Debug, Clone)]
pub struct IntervalSettings {
    /// Number of uniform subdivisions of [0, 1].
    pub steps: usize,
}

impl IntervalSettings {
    pub fn to_interval(&self) -> Interval {
        Interval::with_steps(self.steps)
    }
}

/// Cross-cell buffer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process map, dropped when the run ends.
    Memory,
    /// memcached over TCP, shared across runs and processes.
    Memcached,
    /// Stores nothing; every probe misses.
    Disabled,
}

impl FromStr for CacheBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(CacheBackend::Memory),
            "memcached" => Ok(CacheBackend::Memcached),
            "none" => Ok(CacheBackend::Disabled),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackend::Memory => write!(f, "memory"),
            CacheBackend::Memcached => write!(f, "memcached"),
            CacheBackend::Disabled => write!(f, "none"),
        }
    }
}

/// Cross-cell buffer configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// memcached host, ignored by other backends.
    pub host: String,
    /// memcached port, ignored by other backends.
    pub port: u16,
    /// Entry time-to-live in seconds, 0 for no expiry. Only the
    /// memcached backend enforces it.
    pub ttl_secs: u64,
}

impl CacheSettings {
    /// memcached address string.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Constructs the configured backend. The memcached variant connects
    /// eagerly, so an unreachable server fails the run here rather than
    /// mid-computation.
    pub fn build(&self) -> Result<Arc<dyn Cache>, CacheError> {
        match self.backend {
            CacheBackend::Memory => Ok(Arc::new(MemoryCache::new())),
            CacheBackend::Memcached => {
                let config = MemcachedConfig::new(self.address())
                    .with_default_ttl(Duration::from_secs(self.ttl_secs));
                Ok(Arc::new(MemcachedCache::connect(&config)?))
            }
            CacheBackend::Disabled => Ok(Arc::new(NoOpCache::new())),
        }
    }
}

/// Computation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeMode {
    /// Full hazard curves through the loss-ratio-exceedance matrix.
    Classical,
    /// Single ground-motion field, mean loss and deviation per cell.
    Scenario,
}

impl FromStr for ComputeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classical" => Ok(ComputeMode::Classical),
            "scenario" => Ok(ComputeMode::Scenario),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeMode::Classical => write!(f, "classical"),
            ComputeMode::Scenario => write!(f, "scenario"),
        }
    }
}

/// Computation configuration.
#[derive(Debug, Clone)]
pub struct ComputeSettings {
    pub mode: ComputeMode,
    /// Probability of exceedance for the conditional loss (classical
    /// mode only).
    pub poe: f64,
    /// Vulnerability model file (JSON).
    pub vulnerability_file: Option<PathBuf>,
    /// Per-site hazard curve file (JSON, classical mode).
    pub hazard_file: Option<PathBuf>,
    /// Per-site exposure file (JSON).
    pub exposure_file: Option<PathBuf>,
    /// Per-site ground-motion file (JSON, scenario mode).
    pub intensity_file: Option<PathBuf>,
    /// Per-site country file (JSON, optional).
    pub country_file: Option<PathBuf>,
}

/// Result grid configuration.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    /// Where the ASCII grid is written.
    pub path: PathBuf,
    /// Sentinel for cells without a result.
    pub nodata: f64,
}
