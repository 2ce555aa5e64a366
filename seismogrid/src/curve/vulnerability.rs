//! Vulnerability function type.

use super::discrete::{CurveError, DiscreteFunction, Interpolation};

/// A vulnerability function: hazard intensity → expected loss ratio and
/// its variability.
///
/// Holds a mean-loss-ratio curve and a coefficient-of-variation curve
/// over the same intensity axis. Construction validates the model;
/// evaluation clamps at the intensity boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct VulnerabilityFunction {
    identifier: String,
    imt: String,
    mean_curve: DiscreteFunction,
    cov_curve: DiscreteFunction,
}

impl VulnerabilityFunction {
    /// Builds a vulnerability function from parallel value slices.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Stable model identifier (e.g. a taxonomy string)
    /// * `imt` - Intensity measure type of the intensity axis
    /// * `intensities` - Finite, positive, strictly increasing levels
    /// * `mean_ratios` - Mean loss ratios in [0, 1], one per level
    /// * `covs` - Non-negative coefficients of variation, one per level
    pub fn new(
        identifier: impl Into<String>,
        imt: impl Into<String>,
        intensities: &[f64],
        mean_ratios: &[f64],
        covs: &[f64],
    ) -> Result<Self, CurveError> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(CurveError::EmptyModelId);
        }
        if intensities.len() != mean_ratios.len() || intensities.len() != covs.len() {
            return Err(CurveError::LengthMismatch {
                intensities: intensities.len(),
                means: mean_ratios.len(),
                covs: covs.len(),
            });
        }
        for window in intensities.windows(2) {
            if window[1] <= window[0] {
                return Err(CurveError::UnorderedIntensities);
            }
        }
        if intensities.iter().any(|iml| !iml.is_finite() || *iml <= 0.0) {
            return Err(CurveError::UnorderedIntensities);
        }
        for &ratio in mean_ratios {
            if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
                return Err(CurveError::MeanRatioOutOfRange(ratio));
            }
        }
        for &cov in covs {
            if !cov.is_finite() || cov < 0.0 {
                return Err(CurveError::NegativeCov(cov));
            }
        }

        let mut mean_curve = DiscreteFunction::new();
        let mut cov_curve = DiscreteFunction::new();
        for (index, &iml) in intensities.iter().enumerate() {
            mean_curve.insert(iml, mean_ratios[index])?;
            cov_curve.insert(iml, covs[index])?;
        }

        Ok(Self {
            identifier,
            imt: imt.into(),
            mean_curve,
            cov_curve,
        })
    }

    /// Stable model identifier.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Intensity measure type of the intensity axis.
    #[inline]
    pub fn imt(&self) -> &str {
        &self.imt
    }

    /// Mean loss ratio curve over intensity.
    #[inline]
    pub fn mean_curve(&self) -> &DiscreteFunction {
        &self.mean_curve
    }

    /// Coefficient-of-variation curve over intensity.
    #[inline]
    pub fn cov_curve(&self) -> &DiscreteFunction {
        &self.cov_curve
    }

    /// Whether the function holds at least one pair.
    #[inline]
    pub fn is_computable(&self) -> bool {
        !self.mean_curve.is_empty()
    }

    /// Intensity levels in ascending order.
    pub fn intensities(&self) -> impl Iterator<Item = f64> + '_ {
        self.mean_curve.abscissae()
    }

    /// Mean loss ratio at an intensity level, clamped at the boundaries.
    pub fn mean_at(&self, intensity: f64) -> Result<f64, CurveError> {
        self.mean_curve.interpolate(intensity, Interpolation::Clamp)
    }

    /// Coefficient of variation at an intensity level, clamped at the
    /// boundaries.
    pub fn cov_at(&self, intensity: f64) -> Result<f64, CurveError> {
        self.cov_curve.interpolate(intensity, Interpolation::Clamp)
    }

    /// Intensity bin boundaries centered on the levels.
    ///
    /// Boundaries sit halfway between consecutive levels, extended by a
    /// half step on both ends; the first boundary never goes below zero.
    /// One level yields the half-step boundaries of that level alone,
    /// none yields no boundaries.
    pub fn intensity_bins(&self) -> Vec<f64> {
        let levels: Vec<f64> = self.intensities().collect();
        match levels.len() {
            0 => Vec::new(),
            1 => {
                let level = levels[0];
                vec![(level * 0.5).max(0.0), level * 1.5]
            }
            count => {
                let mut bins = Vec::with_capacity(count + 1);
                bins.push((levels[0] - (levels[1] - levels[0]) / 2.0).max(0.0));
                for window in levels.windows(2) {
                    bins.push((window[0] + window[1]) / 2.0);
                }
                bins.push(levels[count - 1] + (levels[count - 1] - levels[count - 2]) / 2.0);
                bins
            }
        }
    }
}
