//! Hazard input loaders.

use std::sync::Arc;

use tracing::debug;

use crate::cache::Cache;
use crate::curve::HazardCurve;
use crate::engine::EngineError;
use crate::filters::Filter;
use crate::pipe::{keys, Pipe, Value};
use crate::readers::HazardReader;

/// Loads the hazard curve for the current site into
/// [`keys::HAZARD_CURVE`].
pub struct HazardCurveLoader {
    reader: Arc<dyn HazardReader<HazardCurve>>,
}

impl HazardCurveLoader {
    pub fn new(reader: Arc<dyn HazardReader<HazardCurve>>) -> Self {
        Self { reader }
    }
}

impl Filter for HazardCurveLoader {
    fn name(&self) -> &str {
        "hazard-curve-loader"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let site = pipe.current_site()?;
        let curve = self.reader.read(&site)?;
        debug!(site = %site, imt = curve.imt(), "loaded hazard curve");
        pipe.put(keys::HAZARD_CURVE, Value::Hazard(curve))
    }
}

/// Loads the scalar ground-motion value for the current site into
/// [`keys::INTENSITY`]. Scenario runs use this instead of a full
/// hazard curve.
pub struct IntensityLoader {
    reader: Arc<dyn HazardReader<f64>>,
}

impl IntensityLoader {
    pub fn new(reader: Arc<dyn HazardReader<f64>>) -> Self {
        Self { reader }
    }
}

impl Filter for IntensityLoader {
    fn name(&self) -> &str {
        "intensity-loader"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let site = pipe.current_site()?;
        let intensity = self.reader.read(&site)?;
        debug!(site = %site, intensity, "loaded ground motion");
        pipe.put(keys::INTENSITY, Value::Scalar(intensity))
    }
}
