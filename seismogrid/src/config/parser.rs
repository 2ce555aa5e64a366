//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct
//! fields. Unknown sections and keys are ignored.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in
/// the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigError> {
    let mut config = ConfigFile::default();

    // [general] section
    if let Some(section) = ini.section(Some("general")) {
        if let Some(v) = section.get("workers") {
            let workers: usize = v.trim().parse().map_err(|_| invalid(
                "general",
                "workers",
                v,
                "must be a positive integer",
            ))?;
            if workers == 0 {
                return Err(invalid("general", "workers", v, "must be a positive integer"));
            }
            config.general.workers = workers;
        }
        if let Some(v) = section.get("log_dir") {
            config.general.log_dir = optional_path(v);
        }
    }

    // [region] section
    if let Some(section) = ini.section(Some("region")) {
        if let Some(v) = section.get("lower_left_longitude") {
            config.region.lower_left_longitude = parse_float("region", "lower_left_longitude", v)?;
        }
        if let Some(v) = section.get("lower_left_latitude") {
            config.region.lower_left_latitude = parse_float("region", "lower_left_latitude", v)?;
        }
        if let Some(v) = section.get("upper_right_longitude") {
            config.region.upper_right_longitude =
                parse_float("region", "upper_right_longitude", v)?;
        }
        if let Some(v) = section.get("upper_right_latitude") {
            config.region.upper_right_latitude = parse_float("region", "upper_right_latitude", v)?;
        }
        if let Some(v) = section.get("cell_size") {
            let cell_size = parse_float("region", "cell_size", v)?;
            if !(cell_size.is_finite() && cell_size > 0.0) {
                return Err(invalid(
                    "region",
                    "cell_size",
                    v,
                    "must be a positive number of decimal degrees",
                ));
            }
            config.region.cell_size = cell_size;
        }
    }

    // [interval] section
    if let Some(section) = ini.section(Some("interval")) {
        if let Some(v) = section.get("steps") {
            config.interval.steps = v.trim().parse().map_err(|_| invalid(
                "interval",
                "steps",
                v,
                "must be a non-negative integer",
            ))?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("backend") {
            config.cache.backend = v.trim().to_lowercase().parse().map_err(|_| invalid(
                "cache",
                "backend",
                v,
                "must be one of: memory, memcached, none",
            ))?;
        }
        if let Some(v) = section.get("host") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.host = v.to_string();
            }
        }
        if let Some(v) = section.get("port") {
            config.cache.port = v.trim().parse().map_err(|_| invalid(
                "cache",
                "port",
                v,
                "must be a TCP port number",
            ))?;
        }
        if let Some(v) = section.get("ttl_secs") {
            config.cache.ttl_secs = v.trim().parse().map_err(|_| invalid(
                "cache",
                "ttl_secs",
                v,
                "must be a non-negative integer (seconds)",
            ))?;
        }
    }

    // [compute] section
    if let Some(section) = ini.section(Some("compute")) {
        if let Some(v) = section.get("mode") {
            config.compute.mode = v.trim().to_lowercase().parse().map_err(|_| invalid(
                "compute",
                "mode",
                v,
                "must be 'classical' or 'scenario'",
            ))?;
        }
        if let Some(v) = section.get("poe") {
            let poe = parse_float("compute", "poe", v)?;
            if !(0.0..=1.0).contains(&poe) {
                return Err(invalid("compute", "poe", v, "must be between 0 and 1"));
            }
            config.compute.poe = poe;
        }
        if let Some(v) = section.get("vulnerability_file") {
            config.compute.vulnerability_file = optional_path(v);
        }
        if let Some(v) = section.get("hazard_file") {
            config.compute.hazard_file = optional_path(v);
        }
        if let Some(v) = section.get("exposure_file") {
            config.compute.exposure_file = optional_path(v);
        }
        if let Some(v) = section.get("intensity_file") {
            config.compute.intensity_file = optional_path(v);
        }
        if let Some(v) = section.get("country_file") {
            config.compute.country_file = optional_path(v);
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("path") {
            if let Some(path) = optional_path(v) {
                config.output.path = path;
            }
        }
        if let Some(v) = section.get("nodata") {
            config.output.nodata = parse_float("output", "nodata", v)?;
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_float(section: &str, key: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a decimal number"))?;
    if !parsed.is_finite() {
        return Err(invalid(section, key, value, "must be a finite number"));
    }
    Ok(parsed)
}

fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(expand_tilde(value))
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
