//! Loss-ratio-exceedance matrix.

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use super::lognormal::LogNormalDistribution;
use super::StatsError;
use crate::curve::VulnerabilityFunction;

/// A matrix of P(loss ratio > threshold | intensity).
///
/// Rows follow the interval thresholds, columns the intensity levels of
/// the vulnerability function the matrix was computed from. Built once,
/// never mutated; serializes for cache persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossRatioExceedanceMatrix {
    thresholds: Vec<f64>,
    intensities: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl LossRatioExceedanceMatrix {
    /// Computes the matrix for an interval and a vulnerability function.
    ///
    /// Each cell holds the survival probability of the row's threshold
    /// under the log-normal distribution parameterized by the column
    /// intensity's mean loss ratio and coefficient of variation. An
    /// empty interval or an empty vulnerability function yields the
    /// empty matrix; a degenerate distribution parameter anywhere fails
    /// the whole computation.
    pub fn compute(
        interval: &Interval,
        vulnerability: &VulnerabilityFunction,
    ) -> Result<Self, StatsError> {
        let intensities: Vec<f64> = vulnerability.intensities().collect();
        if interval.is_empty() || intensities.is_empty() {
            return Ok(Self {
                thresholds: Vec::new(),
                intensities: Vec::new(),
                values: Vec::new(),
            });
        }

        let mut distributions = Vec::with_capacity(intensities.len());
        for &intensity in &intensities {
            let mean = vulnerability.mean_at(intensity)?;
            let cov = vulnerability.cov_at(intensity)?;
            distributions.push(LogNormalDistribution::from_mean_cov(mean, cov)?);
        }

        let thresholds = interval.thresholds().to_vec();
        let values = thresholds
            .iter()
            .map(|&threshold| {
                distributions
                    .iter()
                    .map(|distribution| distribution.survival(threshold))
                    .collect()
            })
            .collect();

        Ok(Self {
            thresholds,
            intensities,
            values,
        })
    }

    /// Number of threshold rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.thresholds.len()
    }

    /// Number of intensity columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.intensities.len()
    }

    /// Whether the matrix holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Threshold axis in ascending order.
    #[inline]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Intensity axis in ascending order.
    #[inline]
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Exceedance probability at a row/column position.
    pub fn probability(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get(row)?.get(column).copied()
    }

    /// Iterator over `(threshold, row values)` pairs.
    pub fn rows_iter(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.thresholds
            .iter()
            .copied()
            .zip(self.values.iter().map(|row| row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vulnerability() -> VulnerabilityFunction {
        VulnerabilityFunction::new(
            "masonry",
            "PGA",
            &[0.1, 0.2, 0.4],
            &[0.05, 0.20, 0.60],
            &[0.30, 0.30, 0.25],
        )
        .unwrap()
    }

    #[test]
    fn test_dimensions_follow_inputs() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(5), &vulnerability())
                .unwrap();
        assert_eq!(matrix.rows(), 6);
        assert_eq!(matrix.columns(), 3);
        assert!(!matrix.is_empty());
    }

    #[test]
    fn test_empty_interval_yields_empty_matrix() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::empty(), &vulnerability()).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.rows(), 0);
        assert_eq!(matrix.columns(), 0);
    }

    #[test]
    fn test_empty_vulnerability_yields_empty_matrix() {
        let empty = VulnerabilityFunction::new("m", "PGA", &[], &[], &[]).unwrap();
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(5), &empty).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_zero_threshold_row_is_certain_exceedance() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(4), &vulnerability())
                .unwrap();
        for column in 0..matrix.columns() {
            assert_eq!(matrix.probability(0, column), Some(1.0));
        }
    }

    #[test]
    fn test_probabilities_fall_as_thresholds_rise() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(10), &vulnerability())
                .unwrap();
        for column in 0..matrix.columns() {
            let mut previous = 1.0;
            for row in 0..matrix.rows() {
                let value = matrix.probability(row, column).unwrap();
                assert!(value <= previous + 1e-9);
                assert!((0.0..=1.0).contains(&value));
                previous = value;
            }
        }
    }

    #[test]
    fn test_higher_intensity_exceeds_more() {
        // Mean loss ratios rise with intensity, so for a fixed positive
        // threshold the exceedance probability must rise across columns.
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(10), &vulnerability())
                .unwrap();
        let row = 3;
        let mut previous = 0.0;
        for column in 0..matrix.columns() {
            let value = matrix.probability(row, column).unwrap();
            assert!(value + 1e-9 >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_degenerate_distribution_fails_computation() {
        let flat = VulnerabilityFunction::new("m", "PGA", &[0.1], &[0.5], &[0.0]).unwrap();
        let result = LossRatioExceedanceMatrix::compute(&Interval::with_steps(2), &flat);
        assert!(matches!(result, Err(StatsError::NonPositiveStdDev(_))));
    }

    #[test]
    fn test_matrix_serializes_for_persistence() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(3), &vulnerability())
                .unwrap();
        let bytes = serde_json::to_vec(&matrix).unwrap();
        let restored: LossRatioExceedanceMatrix = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored, matrix);
    }
}
