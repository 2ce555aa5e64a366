//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let log_dir = config
        .general
        .log_dir
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let vulnerability_file = optional_path(&config.compute.vulnerability_file);
    let hazard_file = optional_path(&config.compute.hazard_file);
    let exposure_file = optional_path(&config.compute.exposure_file);
    let intensity_file = optional_path(&config.compute.intensity_file);
    let country_file = optional_path(&config.compute.country_file);

    format!(
        r#"[general]
; Worker threads for distributing grid row bands (1 = single-threaded)
workers = {}
; Log file directory (empty = ~/.seismogrid/logs)
log_dir = {}

[region]
; Bounding box corners in decimal degrees
lower_left_longitude = {}
lower_left_latitude = {}
upper_right_longitude = {}
upper_right_latitude = {}
; Grid cell size in decimal degrees
cell_size = {}

[interval]
; Uniform subdivisions of the [0, 1] loss-ratio range
steps = {}

[cache]
; Cross-cell buffer backend:
;   memory    - in-process map, dropped when the run ends
;   memcached - shared memcached server
;   none      - disable the buffer (every probe misses)
backend = {}
; memcached server (ignored by other backends)
host = {}
port = {}
; Entry time-to-live in seconds, 0 = no expiry (memcached only)
ttl_secs = {}

[compute]
; Computation mode: classical (hazard curves) or scenario (ground-motion field)
mode = {}
; Probability of exceedance for the conditional loss (classical mode)
poe = {}
; Input model files (JSON)
vulnerability_file = {}
hazard_file = {}
exposure_file = {}
intensity_file = {}
country_file = {}

[output]
; Result grid file (ESRI ASCII)
path = {}
; Sentinel written for cells without a result
nodata = {}
"#,
        config.general.workers,
        log_dir,
        config.region.lower_left_longitude,
        config.region.lower_left_latitude,
        config.region.upper_right_longitude,
        config.region.upper_right_latitude,
        config.region.cell_size,
        config.interval.steps,
        config.cache.backend,
        config.cache.host,
        config.cache.port,
        config.cache.ttl_secs,
        config.compute.mode,
        config.compute.poe,
        vulnerability_file,
        hazard_file,
        exposure_file,
        intensity_file,
        country_file,
        path_to_string(&config.output.path),
        config.output.nodata,
    )
}

fn optional_path(path: &Option<std::path::PathBuf>) -> String {
    path.as_ref().map(|p| path_to_string(p)).unwrap_or_default()
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
