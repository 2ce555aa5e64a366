//! Scenario (single ground-motion field) loss filter.

use tracing::debug;

use crate::cache::Cache;
use crate::engine::EngineError;
use crate::filters::Filter;
use crate::pipe::{keys, Pipe, Value};

/// Computes the mean loss and its standard deviation for the cell's
/// asset under the loaded ground motion.
///
/// The vulnerability function's mean ratio and cov are interpolated at
/// [`keys::INTENSITY`]; the mean loss is the ratio scaled by the asset
/// value and the deviation follows the log-normal relation
/// `stddev = mean · cov`.
pub struct ScenarioLossFilter;

impl Filter for ScenarioLossFilter {
    fn name(&self) -> &str {
        "scenario-loss"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let vulnerability = pipe.vulnerability(keys::VULNERABILITY)?;
        let intensity = pipe.scalar(keys::INTENSITY)?;
        let asset = pipe.scalar(keys::ASSET_VALUE)?;

        let mean_ratio = vulnerability.mean_at(intensity)?;
        let cov = vulnerability.cov_at(intensity)?;
        let mean_loss = mean_ratio * asset;
        let stddev = mean_ratio * cov * asset;
        debug!(intensity, mean_loss, stddev, "scenario loss");

        pipe.put(keys::LOSS_MEAN, Value::Scalar(mean_loss))?;
        pipe.put(keys::LOSS_STDDEV, Value::Scalar(stddev))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoOpCache;
    use crate::curve::VulnerabilityFunction;
    use crate::geo::{Region, Site};
    use std::sync::Arc;

    fn pipe_at(intensity: f64) -> Pipe {
        let a = Site::new(0.0, 1.0).unwrap();
        let b = Site::new(1.0, 0.0).unwrap();
        let mut pipe = Pipe::new(Region::new(a, b, 1.0).unwrap(), a);
        let vulnerability = VulnerabilityFunction::new(
            "RC",
            "PGA",
            &[0.1, 0.2, 0.4],
            &[0.05, 0.2, 0.6],
            &[0.3, 0.3, 0.3],
        )
        .unwrap();
        pipe.put(
            keys::VULNERABILITY,
            Value::Vulnerability(Arc::new(vulnerability)),
        )
        .unwrap();
        pipe.put(keys::INTENSITY, Value::Scalar(intensity)).unwrap();
        pipe.put(keys::ASSET_VALUE, Value::Scalar(1000.0)).unwrap();
        pipe
    }

    #[test]
    fn test_scenario_loss_at_known_intensity() {
        let buffer = NoOpCache::new();
        let mut pipe = pipe_at(0.2);

        ScenarioLossFilter.filter(&buffer, &mut pipe).unwrap();
        assert_eq!(pipe.scalar(keys::LOSS_MEAN).unwrap(), 200.0);
        assert_eq!(pipe.scalar(keys::LOSS_STDDEV).unwrap(), 60.0);
    }

    #[test]
    fn test_intensity_below_domain_clamps() {
        let buffer = NoOpCache::new();
        let mut pipe = pipe_at(0.01);

        ScenarioLossFilter.filter(&buffer, &mut pipe).unwrap();
        assert_eq!(pipe.scalar(keys::LOSS_MEAN).unwrap(), 50.0);
    }

    #[test]
    fn test_missing_intensity_reports_missing_data() {
        let buffer = NoOpCache::new();
        let mut pipe = pipe_at(0.2);
        let mut stripped = Pipe::new(
            pipe.region().unwrap().clone(),
            pipe.current_site().unwrap(),
        );
        stripped
            .put(
                keys::VULNERABILITY,
                Value::Vulnerability(pipe.vulnerability(keys::VULNERABILITY).unwrap()),
            )
            .unwrap();

        assert!(matches!(
            ScenarioLossFilter.filter(&buffer, &mut stripped),
            Err(EngineError::MissingPipeData(_))
        ));
    }
}
