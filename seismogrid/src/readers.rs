//! Per-site input sources.
//!
//! Loader filters pull hazard, exposure, and country data through the
//! reader traits here, so the filter chain never knows whether its
//! inputs came from a file, a test fixture, or a remote service.
//! [`SiteTable`] is the in-memory implementation used by the command
//! line and by tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::curve::HazardCurve;
use crate::engine::EngineError;
use crate::geo::Site;

/// Exposed asset at a site: its economic value and the taxonomy used to
/// select a vulnerability function for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetExposure {
    value: f64,
    taxonomy: String,
}

impl AssetExposure {
    /// Creates an exposure record. The value must be finite and
    /// non-negative.
    pub fn new(value: f64, taxonomy: impl Into<String>) -> Result<Self, EngineError> {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "asset value must be finite and non-negative, got {value}"
            )));
        }
        Ok(Self {
            value,
            taxonomy: taxonomy.into(),
        })
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn taxonomy(&self) -> &str {
        &self.taxonomy
    }
}

/// Country owning a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    name: String,
    code: String,
}

impl Country {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Source of per-site hazard data. `T` is a full hazard curve for
/// classical runs and a scalar ground-motion value for scenario runs.
pub trait HazardReader<T>: Send + Sync {
    /// The hazard datum at the site. A site with no datum is a fatal
    /// input error, not an empty result.
    fn read(&self, site: &Site) -> Result<T, EngineError>;
}

/// Source of asset exposure records.
pub trait ExposureReader: Send + Sync {
    fn read(&self, site: &Site) -> Result<AssetExposure, EngineError>;
}

/// Source of site-to-country assignments.
pub trait CountryReader: Send + Sync {
    fn read(&self, site: &Site) -> Result<Country, EngineError>;
}

/// In-memory reader backed by an exact-site map.
///
/// Lookup is by the site's exact coordinates. Inputs are expected to be
/// keyed on the same grid the engine iterates, so there is no nearest
/// neighbour search here.
#[derive(Debug, Clone)]
pub struct SiteTable<T> {
    label: &'static str,
    entries: HashMap<Site, T>,
}

impl<T> SiteTable<T> {
    /// Creates an empty table. The label names the data kind in lookup
    /// errors ("hazard curve", "exposure", ...).
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: HashMap::new(),
        }
    }

    /// Adds an entry, replacing any previous value for the site.
    pub fn insert(&mut self, site: Site, value: T) {
        self.entries.insert(site, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, site: &Site) -> Result<&T, EngineError> {
        self.entries
            .get(site)
            .ok_or_else(|| EngineError::reader(site, format!("no {} for site", self.label)))
    }
}

impl HazardReader<HazardCurve> for SiteTable<HazardCurve> {
    fn read(&self, site: &Site) -> Result<HazardCurve, EngineError> {
        self.lookup(site).cloned()
    }
}

impl HazardReader<f64> for SiteTable<f64> {
    fn read(&self, site: &Site) -> Result<f64, EngineError> {
        self.lookup(site).copied()
    }
}

impl ExposureReader for SiteTable<AssetExposure> {
    fn read(&self, site: &Site) -> Result<AssetExposure, EngineError> {
        self.lookup(site).cloned()
    }
}

impl CountryReader for SiteTable<Country> {
    fn read(&self, site: &Site) -> Result<Country, EngineError> {
        self.lookup(site).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::DiscreteFunction;

    #[test]
    fn test_exposure_rejects_negative_value() {
        assert!(AssetExposure::new(-1.0, "RC").is_err());
        assert!(AssetExposure::new(f64::NAN, "RC").is_err());
        assert!(AssetExposure::new(0.0, "RC").is_ok());
    }

    #[test]
    fn test_site_table_round_trip() {
        let site = Site::new(1.0, 2.0).unwrap();
        let mut table = SiteTable::new("exposure");
        table.insert(site, AssetExposure::new(5000.0, "RC").unwrap());

        let exposure = ExposureReader::read(&table, &site).unwrap();
        assert_eq!(exposure.value(), 5000.0);
        assert_eq!(exposure.taxonomy(), "RC");
    }

    #[test]
    fn test_site_table_missing_site_is_reader_error() {
        let table: SiteTable<f64> = SiteTable::new("intensity");
        let error = table.read(&Site::new(1.0, 2.0).unwrap()).unwrap_err();
        match error {
            EngineError::Reader { message, .. } => {
                assert!(message.contains("no intensity for site"), "got {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_site_table_replaces_entries() {
        let site = Site::new(0.0, 0.0).unwrap();
        let mut table = SiteTable::new("intensity");
        table.insert(site, 0.1);
        table.insert(site, 0.2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.read(&site).unwrap(), 0.2);
    }

    #[test]
    fn test_hazard_table_returns_owned_curve() {
        let site = Site::new(4.0, 4.0).unwrap();
        let mut function = DiscreteFunction::new();
        function.insert(0.1, 0.9).unwrap();
        function.insert(0.2, 0.5).unwrap();
        let mut table = SiteTable::new("hazard curve");
        table.insert(site, HazardCurve::new("PGA", function));

        let curve = table.read(&site).unwrap();
        assert_eq!(curve.imt(), "PGA");
        assert_eq!(curve.probability_at(0.1).unwrap(), 0.9);
    }
}
