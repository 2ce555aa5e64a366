//! Per-cell computation scratchpad.
//!
//! A [`Pipe`] is created for one grid cell, seeded with the region and
//! the current site, mutated by the filter chain, and discarded when the
//! cell's dispatch finishes. It is never shared across cells and never
//! outlives its dispatch.
//!
//! Filters communicate through well-known keys (the [`keys`] constants)
//! and read them back through typed accessors, so each filter's
//! read/write contract is visible at its call site.

use std::collections::HashMap;
use std::sync::Arc;

use crate::curve::{DiscreteFunction, HazardCurve, VulnerabilityFunction};
use crate::engine::EngineError;
use crate::geo::{Region, Site};
use crate::readers::Country;
use crate::stats::LossRatioExceedanceMatrix;

/// Well-known pipe keys.
pub mod keys {
    /// The region being computed
    pub const REGION: &str = "REGION";
    /// The grid cell this pipe belongs to
    pub const CURRENT_SITE: &str = "CURRENT_SITE";
    /// Hazard curve read for the current site
    pub const HAZARD_CURVE: &str = "HAZARD_CURVE";
    /// Scalar ground-motion intensity for the current site
    pub const INTENSITY: &str = "INTENSITY";
    /// Exposed asset value at the current site
    pub const ASSET_VALUE: &str = "ASSET_VALUE";
    /// Taxonomy of the asset at the current site
    pub const TAXONOMY: &str = "TAXONOMY";
    /// Country owning the current site
    pub const COUNTRY: &str = "COUNTRY";
    /// Vulnerability function selected for the asset
    pub const VULNERABILITY: &str = "VULNERABILITY";
    /// Loss-ratio-exceedance matrix
    pub const LREM: &str = "LREM";
    /// Loss ratio → probability of exceedance
    pub const LOSS_RATIO_CURVE: &str = "LOSS_RATIO_CURVE";
    /// Absolute loss → probability of exceedance
    pub const LOSS_CURVE: &str = "LOSS_CURVE";
    /// Scenario mean loss
    pub const LOSS_MEAN: &str = "LOSS_MEAN";
    /// Scenario loss standard deviation
    pub const LOSS_STDDEV: &str = "LOSS_STDDEV";
    /// Loss at the configured probability of exceedance
    pub const CONDITIONAL_LOSS: &str = "CONDITIONAL_LOSS";
}

/// A value stored in a pipe.
#[derive(Debug, Clone)]
pub enum Value {
    Region(Region),
    Site(Site),
    Scalar(f64),
    Text(String),
    Curve(DiscreteFunction),
    Hazard(HazardCurve),
    Vulnerability(Arc<VulnerabilityFunction>),
    Matrix(Arc<LossRatioExceedanceMatrix>),
    Country(Country),
}

impl Value {
    /// Variant name for mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Region(_) => "region",
            Value::Site(_) => "site",
            Value::Scalar(_) => "scalar",
            Value::Text(_) => "text",
            Value::Curve(_) => "curve",
            Value::Hazard(_) => "hazard curve",
            Value::Vulnerability(_) => "vulnerability function",
            Value::Matrix(_) => "matrix",
            Value::Country(_) => "country",
        }
    }
}

/// String-keyed scratchpad for one grid-cell computation.
#[derive(Debug, Clone)]
pub struct Pipe {
    values: HashMap<String, Value>,
}

impl Pipe {
    /// Creates a pipe for one cell, seeded with [`keys::REGION`] and
    /// [`keys::CURRENT_SITE`].
    pub fn new(region: Region, site: Site) -> Self {
        let mut values = HashMap::new();
        values.insert(keys::REGION.to_string(), Value::Region(region));
        values.insert(keys::CURRENT_SITE.to_string(), Value::Site(site));
        Self { values }
    }

    /// Stores a value, replacing any previous value under the key.
    pub fn put(&mut self, key: &str, value: Value) -> Result<(), EngineError> {
        if key.is_empty() {
            return Err(EngineError::InvalidArgument(
                "pipe keys must not be empty".to_string(),
            ));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Untyped lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether the key holds a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A pipe always carries at least its seed keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn fetch(&self, key: &str) -> Result<&Value, EngineError> {
        self.values
            .get(key)
            .ok_or_else(|| EngineError::MissingPipeData(key.to_string()))
    }

    fn mismatch(key: &str, expected: &'static str, found: &Value) -> EngineError {
        EngineError::PipeTypeMismatch {
            key: key.to_string(),
            expected,
            found: found.kind(),
        }
    }

    /// The region being computed.
    pub fn region(&self) -> Result<&Region, EngineError> {
        match self.fetch(keys::REGION)? {
            Value::Region(region) => Ok(region),
            other => Err(Self::mismatch(keys::REGION, "region", other)),
        }
    }

    /// The grid cell this pipe belongs to.
    pub fn current_site(&self) -> Result<Site, EngineError> {
        match self.fetch(keys::CURRENT_SITE)? {
            Value::Site(site) => Ok(*site),
            other => Err(Self::mismatch(keys::CURRENT_SITE, "site", other)),
        }
    }

    /// A scalar stored under the key.
    pub fn scalar(&self, key: &str) -> Result<f64, EngineError> {
        match self.fetch(key)? {
            Value::Scalar(value) => Ok(*value),
            other => Err(Self::mismatch(key, "scalar", other)),
        }
    }

    /// A text value stored under the key.
    pub fn text(&self, key: &str) -> Result<&str, EngineError> {
        match self.fetch(key)? {
            Value::Text(value) => Ok(value),
            other => Err(Self::mismatch(key, "text", other)),
        }
    }

    /// A discrete function stored under the key.
    pub fn curve(&self, key: &str) -> Result<&DiscreteFunction, EngineError> {
        match self.fetch(key)? {
            Value::Curve(curve) => Ok(curve),
            other => Err(Self::mismatch(key, "curve", other)),
        }
    }

    /// A hazard curve stored under the key.
    pub fn hazard_curve(&self, key: &str) -> Result<&HazardCurve, EngineError> {
        match self.fetch(key)? {
            Value::Hazard(curve) => Ok(curve),
            other => Err(Self::mismatch(key, "hazard curve", other)),
        }
    }

    /// A vulnerability function stored under the key.
    pub fn vulnerability(&self, key: &str) -> Result<Arc<VulnerabilityFunction>, EngineError> {
        match self.fetch(key)? {
            Value::Vulnerability(function) => Ok(Arc::clone(function)),
            other => Err(Self::mismatch(key, "vulnerability function", other)),
        }
    }

    /// A loss-ratio-exceedance matrix stored under the key.
    pub fn matrix(&self, key: &str) -> Result<Arc<LossRatioExceedanceMatrix>, EngineError> {
        match self.fetch(key)? {
            Value::Matrix(matrix) => Ok(Arc::clone(matrix)),
            other => Err(Self::mismatch(key, "matrix", other)),
        }
    }

    /// A country stored under the key.
    pub fn country(&self, key: &str) -> Result<&Country, EngineError> {
        match self.fetch(key)? {
            Value::Country(country) => Ok(country),
            other => Err(Self::mismatch(key, "country", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe() -> Pipe {
        let a = Site::new(1.0, 2.0).unwrap();
        let b = Site::new(2.0, 1.0).unwrap();
        let region = Region::new(a, b, 1.0).unwrap();
        Pipe::new(region, a)
    }

    #[test]
    fn test_new_pipe_is_seeded() {
        let pipe = pipe();
        assert_eq!(pipe.len(), 2);
        assert!(pipe.contains(keys::REGION));
        assert!(pipe.contains(keys::CURRENT_SITE));
        assert_eq!(pipe.current_site().unwrap(), Site::new(1.0, 2.0).unwrap());
        assert_eq!(pipe.region().unwrap().rows(), 2);
    }

    #[test]
    fn test_put_and_read_back_scalar() {
        let mut pipe = pipe();
        pipe.put(keys::ASSET_VALUE, Value::Scalar(5000.0)).unwrap();
        assert_eq!(pipe.scalar(keys::ASSET_VALUE).unwrap(), 5000.0);
    }

    #[test]
    fn test_put_rejects_empty_key() {
        let mut pipe = pipe();
        assert!(matches!(
            pipe.put("", Value::Scalar(1.0)),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_put_replaces_value() {
        let mut pipe = pipe();
        pipe.put(keys::INTENSITY, Value::Scalar(0.1)).unwrap();
        pipe.put(keys::INTENSITY, Value::Scalar(0.2)).unwrap();
        assert_eq!(pipe.scalar(keys::INTENSITY).unwrap(), 0.2);
    }

    #[test]
    fn test_missing_key_is_missing_pipe_data() {
        let pipe = pipe();
        assert!(matches!(
            pipe.scalar(keys::ASSET_VALUE),
            Err(EngineError::MissingPipeData(_))
        ));
    }

    #[test]
    fn test_wrong_variant_is_type_mismatch() {
        let mut pipe = pipe();
        pipe.put(keys::ASSET_VALUE, Value::Text("not a number".to_string()))
            .unwrap();
        let error = pipe.scalar(keys::ASSET_VALUE).unwrap_err();
        match error {
            EngineError::PipeTypeMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, "scalar");
                assert_eq!(found, "text");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_shared_matrix_values_are_cheap_to_clone() {
        use crate::stats::{Interval, LossRatioExceedanceMatrix};

        let vulnerability = crate::curve::VulnerabilityFunction::new(
            "m",
            "PGA",
            &[0.1, 0.2],
            &[0.1, 0.4],
            &[0.3, 0.3],
        )
        .unwrap();
        let matrix = Arc::new(
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(2), &vulnerability)
                .unwrap(),
        );

        let mut pipe = pipe();
        pipe.put(keys::LREM, Value::Matrix(Arc::clone(&matrix))).unwrap();
        let fetched = pipe.matrix(keys::LREM).unwrap();
        assert!(Arc::ptr_eq(&fetched, &matrix));
    }
}
