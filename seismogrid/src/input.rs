//! JSON model documents read by the command line.
//!
//! Each document type mirrors one input file: vulnerability models,
//! per-site hazard curves, exposure rows, scenario ground motions, and
//! country assignments. Documents convert into the domain types with
//! full validation, so a malformed file fails the run before any cell
//! is computed.

use std::path::Path;

use serde::Deserialize;

use crate::curve::{DiscreteFunction, HazardCurve, VulnerabilityFunction, VulnerabilityRegistry};
use crate::engine::EngineError;
use crate::geo::Site;
use crate::readers::{AssetExposure, Country, SiteTable};

/// Vulnerability model file: a list of functions keyed by identifier.
#[derive(Debug, Deserialize)]
pub struct VulnerabilityDocument {
    pub models: Vec<VulnerabilityModel>,
}

#[derive(Debug, Deserialize)]
pub struct VulnerabilityModel {
    pub identifier: String,
    pub imt: String,
    pub intensities: Vec<f64>,
    pub mean_ratios: Vec<f64>,
    pub covs: Vec<f64>,
}

impl VulnerabilityDocument {
    pub fn into_registry(self) -> Result<VulnerabilityRegistry, EngineError> {
        let mut registry = VulnerabilityRegistry::new();
        for model in self.models {
            let function = VulnerabilityFunction::new(
                &model.identifier,
                &model.imt,
                &model.intensities,
                &model.mean_ratios,
                &model.covs,
            )?;
            registry.register(function)?;
        }
        Ok(registry)
    }
}

/// Hazard curve file: one curve per site.
#[derive(Debug, Deserialize)]
pub struct HazardDocument {
    pub curves: Vec<HazardRow>,
}

#[derive(Debug, Deserialize)]
pub struct HazardRow {
    pub longitude: f64,
    pub latitude: f64,
    pub imt: String,
    /// Intensity levels, strictly increasing.
    pub levels: Vec<f64>,
    /// Probability of exceedance per level.
    pub poes: Vec<f64>,
}

impl HazardDocument {
    pub fn into_table(self) -> Result<SiteTable<HazardCurve>, EngineError> {
        let mut table = SiteTable::new("hazard curve");
        for row in self.curves {
            if row.levels.len() != row.poes.len() {
                return Err(EngineError::InvalidArgument(format!(
                    "hazard curve at ({}, {}) has {} levels but {} poes",
                    row.longitude,
                    row.latitude,
                    row.levels.len(),
                    row.poes.len()
                )));
            }
            let site = Site::new(row.longitude, row.latitude)?;
            let mut function = DiscreteFunction::new();
            for (&level, &poe) in row.levels.iter().zip(&row.poes) {
                function.insert(level, poe)?;
            }
            table.insert(site, HazardCurve::new(row.imt, function));
        }
        Ok(table)
    }
}

/// Exposure file: one asset per site.
#[derive(Debug, Deserialize)]
pub struct ExposureDocument {
    pub assets: Vec<ExposureRow>,
}

#[derive(Debug, Deserialize)]
pub struct ExposureRow {
    pub longitude: f64,
    pub latitude: f64,
    pub value: f64,
    pub taxonomy: String,
}

impl ExposureDocument {
    pub fn into_table(self) -> Result<SiteTable<AssetExposure>, EngineError> {
        let mut table = SiteTable::new("exposure");
        for row in self.assets {
            let site = Site::new(row.longitude, row.latitude)?;
            table.insert(site, AssetExposure::new(row.value, row.taxonomy)?);
        }
        Ok(table)
    }
}

/// Scenario ground-motion file: one intensity per site.
#[derive(Debug, Deserialize)]
pub struct IntensityDocument {
    pub sites: Vec<IntensityRow>,
}

#[derive(Debug, Deserialize)]
pub struct IntensityRow {
    pub longitude: f64,
    pub latitude: f64,
    pub intensity: f64,
}

impl IntensityDocument {
    pub fn into_table(self) -> Result<SiteTable<f64>, EngineError> {
        let mut table = SiteTable::new("ground motion");
        for row in self.sites {
            if !row.intensity.is_finite() || row.intensity < 0.0 {
                return Err(EngineError::InvalidArgument(format!(
                    "ground motion at ({}, {}) must be finite and non-negative, got {}",
                    row.longitude, row.latitude, row.intensity
                )));
            }
            table.insert(Site::new(row.longitude, row.latitude)?, row.intensity);
        }
        Ok(table)
    }
}

/// Country assignment file.
#[derive(Debug, Deserialize)]
pub struct CountryDocument {
    pub sites: Vec<CountryRow>,
}

#[derive(Debug, Deserialize)]
pub struct CountryRow {
    pub longitude: f64,
    pub latitude: f64,
    pub name: String,
    pub code: String,
}

impl CountryDocument {
    pub fn into_table(self) -> Result<SiteTable<Country>, EngineError> {
        let mut table = SiteTable::new("country");
        for row in self.sites {
            let site = Site::new(row.longitude, row.latitude)?;
            table.insert(site, Country::new(row.name, row.code));
        }
        Ok(table)
    }
}

/// Reads and validates a vulnerability model file.
pub fn load_vulnerability(path: &Path) -> Result<VulnerabilityRegistry, EngineError> {
    let document: VulnerabilityDocument = read_json(path)?;
    document.into_registry()
}

/// Reads and validates a hazard curve file.
pub fn load_hazard(path: &Path) -> Result<SiteTable<HazardCurve>, EngineError> {
    let document: HazardDocument = read_json(path)?;
    document.into_table()
}

/// Reads and validates an exposure file.
pub fn load_exposure(path: &Path) -> Result<SiteTable<AssetExposure>, EngineError> {
    let document: ExposureDocument = read_json(path)?;
    document.into_table()
}

/// Reads and validates a scenario ground-motion file.
pub fn load_intensities(path: &Path) -> Result<SiteTable<f64>, EngineError> {
    let document: IntensityDocument = read_json(path)?;
    document.into_table()
}

/// Reads and validates a country assignment file.
pub fn load_countries(path: &Path) -> Result<SiteTable<Country>, EngineError> {
    let document: CountryDocument = read_json(path)?;
    document.into_table()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::{ExposureReader, HazardReader};

    #[test]
    fn test_vulnerability_document_builds_registry() {
        let json = r#"{
            "models": [{
                "identifier": "RC",
                "imt": "PGA",
                "intensities": [0.1, 0.2, 0.3],
                "mean_ratios": [0.05, 0.2, 0.6],
                "covs": [0.3, 0.3, 0.3]
            }]
        }"#;
        let document: VulnerabilityDocument = serde_json::from_str(json).unwrap();
        let registry = document.into_registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("RC").unwrap().imt(), "PGA");
    }

    #[test]
    fn test_mismatched_vulnerability_arrays_rejected() {
        let json = r#"{
            "models": [{
                "identifier": "RC",
                "imt": "PGA",
                "intensities": [0.1, 0.2],
                "mean_ratios": [0.05],
                "covs": [0.3, 0.3]
            }]
        }"#;
        let document: VulnerabilityDocument = serde_json::from_str(json).unwrap();
        assert!(document.into_registry().is_err());
    }

    #[test]
    fn test_hazard_document_builds_site_table() {
        let json = r#"{
            "curves": [{
                "longitude": 1.0,
                "latitude": 2.0,
                "imt": "PGA",
                "levels": [0.1, 0.2],
                "poes": [0.9, 0.5]
            }]
        }"#;
        let document: HazardDocument = serde_json::from_str(json).unwrap();
        let table = document.into_table().unwrap();
        let curve = table.read(&Site::new(1.0, 2.0).unwrap()).unwrap();
        assert_eq!(curve.probability_at(0.2).unwrap(), 0.5);
    }

    #[test]
    fn test_hazard_length_mismatch_rejected() {
        let json = r#"{
            "curves": [{
                "longitude": 1.0,
                "latitude": 2.0,
                "imt": "PGA",
                "levels": [0.1, 0.2],
                "poes": [0.9]
            }]
        }"#;
        let document: HazardDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(
            document.into_table(),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_exposure_document_validates_coordinates() {
        let json = r#"{
            "assets": [{
                "longitude": 1.0,
                "latitude": 999.0,
                "value": 1000.0,
                "taxonomy": "RC"
            }]
        }"#;
        let document: ExposureDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(
            document.into_table(),
            Err(EngineError::Geo(_))
        ));
    }

    #[test]
    fn test_exposure_document_builds_site_table() {
        let json = r#"{
            "assets": [{
                "longitude": 1.0,
                "latitude": 2.0,
                "value": 1000.0,
                "taxonomy": "RC"
            }]
        }"#;
        let document: ExposureDocument = serde_json::from_str(json).unwrap();
        let table = document.into_table().unwrap();
        let asset = table.read(&Site::new(1.0, 2.0).unwrap()).unwrap();
        assert_eq!(asset.value(), 1000.0);
    }

    #[test]
    fn test_negative_ground_motion_rejected() {
        let json = r#"{"sites": [{"longitude": 0.0, "latitude": 0.0, "intensity": -0.1}]}"#;
        let document: IntensityDocument = serde_json::from_str(json).unwrap();
        assert!(document.into_table().is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let error = load_exposure(Path::new("/nonexistent/exposure.json")).unwrap_err();
        assert!(matches!(error, EngineError::Io(_)));
    }
}
