//! Hazard curve type.

use super::discrete::{CurveError, DiscreteFunction, Interpolation};

/// A hazard curve: intensity measure level → probability of exceedance.
///
/// Tagged with the intensity measure type it was computed for. The curve
/// is computable once it holds at least one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardCurve {
    imt: String,
    function: DiscreteFunction,
}

impl HazardCurve {
    /// Wraps a discrete function as a hazard curve for the given
    /// intensity measure type.
    pub fn new(imt: impl Into<String>, function: DiscreteFunction) -> Self {
        Self {
            imt: imt.into(),
            function,
        }
    }

    /// Intensity measure type the curve was computed for.
    #[inline]
    pub fn imt(&self) -> &str {
        &self.imt
    }

    /// The underlying IML → PoE function.
    #[inline]
    pub fn function(&self) -> &DiscreteFunction {
        &self.function
    }

    /// Whether the curve holds at least one pair.
    #[inline]
    pub fn is_computable(&self) -> bool {
        !self.function.is_empty()
    }

    /// Probability of exceedance at an intensity level, clamped at the
    /// domain boundaries.
    pub fn probability_at(&self, intensity: f64) -> Result<f64, CurveError> {
        self.function.interpolate(intensity, Interpolation::Clamp)
    }

    /// Probabilities of occurrence over consecutive intensity bins.
    ///
    /// Evaluates the curve at every bin boundary (clamped) and returns
    /// the adjacent differences, one per bin. An empty curve or fewer
    /// than two boundaries yield no bins.
    pub fn ordinate_differences(&self, boundaries: &[f64]) -> Result<Vec<f64>, CurveError> {
        if self.function.is_empty() || boundaries.len() < 2 {
            return Ok(Vec::new());
        }

        let mut values = Vec::with_capacity(boundaries.len());
        for &boundary in boundaries {
            values.push(self.function.interpolate(boundary, Interpolation::Clamp)?);
        }

        Ok(values.windows(2).map(|pair| pair[0] - pair[1]).collect())
    }
}
