//! Classical hazard-to-loss math.
//!
//! Combines a loss-ratio-exceedance matrix with a hazard curve into a
//! loss-ratio curve, and extracts conditional losses from loss curves.

use super::lrem::LossRatioExceedanceMatrix;
use super::StatsError;
use crate::curve::{CurveError, DiscreteFunction, HazardCurve, VulnerabilityFunction};

/// Builds the loss-ratio → probability-of-exceedance curve.
///
/// Each matrix column is scaled by the hazard curve's probability of
/// occurrence over the matching intensity bin of the vulnerability
/// function; row sums become the curve ordinates, the matrix thresholds
/// its abscissae. An empty matrix or a hazard curve yielding no
/// occurrence bins produces the empty curve.
pub fn loss_ratio_curve(
    matrix: &LossRatioExceedanceMatrix,
    hazard: &HazardCurve,
    vulnerability: &VulnerabilityFunction,
) -> Result<DiscreteFunction, StatsError> {
    if matrix.is_empty() {
        return Ok(DiscreteFunction::new());
    }

    let occurrences = hazard.ordinate_differences(&vulnerability.intensity_bins())?;
    if occurrences.is_empty() {
        return Ok(DiscreteFunction::new());
    }
    if occurrences.len() != matrix.columns() {
        return Err(StatsError::DimensionMismatch {
            columns: matrix.columns(),
            bins: occurrences.len(),
        });
    }

    let mut curve = DiscreteFunction::new();
    for (threshold, row) in matrix.rows_iter() {
        let poe: f64 = row
            .iter()
            .zip(&occurrences)
            .map(|(probability, occurrence)| probability * occurrence)
            .sum();
        curve.insert(threshold, poe)?;
    }

    Ok(curve)
}

/// Loss held with the given probability of exceedance.
///
/// Inverse-interpolates the loss curve at the target probability. A
/// probability below every curve ordinate returns the maximum loss on
/// the curve; one above every ordinate returns 0.0. An empty curve is
/// an error.
pub fn conditional_loss(
    loss_curve: &DiscreteFunction,
    probability: f64,
) -> Result<f64, StatsError> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(StatsError::InvalidProbability(probability));
    }
    if loss_curve.is_empty() {
        return Err(CurveError::Empty.into());
    }

    let mut smallest = f64::INFINITY;
    let mut largest = f64::NEG_INFINITY;
    for ordinate in loss_curve.ordinates() {
        smallest = smallest.min(ordinate);
        largest = largest.max(ordinate);
    }

    if probability < smallest {
        return Ok(loss_curve.abscissae().last().unwrap_or(0.0));
    }
    if probability > largest {
        return Ok(0.0);
    }

    Ok(loss_curve.inverse_interpolate(probability)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Interval, LossRatioExceedanceMatrix};

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

    fn hazard() -> HazardCurve {
        let function = DiscreteFunction::from_pairs([
            (0.05, 0.99),
            (0.15, 0.90),
            (0.30, 0.70),
            (0.50, 0.40),
        ])
        .unwrap();
        HazardCurve::new("PGA", function)
    }

    #[test]
    fn test_curve_follows_matrix_thresholds() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(5), &vulnerability())
                .unwrap();
        let curve = loss_ratio_curve(&matrix, &hazard(), &vulnerability()).unwrap();

        let domain: Vec<f64> = curve.abscissae().collect();
        assert_eq!(domain, matrix.thresholds());
    }

    #[test]
    fn test_zero_threshold_collects_all_occurrence_mass() {
        // The zero-ratio row of the matrix is all ones, so its ordinate
        // must equal the summed occurrence probabilities.
        let vulnerability = vulnerability();
        let hazard = hazard();
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(5), &vulnerability)
                .unwrap();
        let curve = loss_ratio_curve(&matrix, &hazard, &vulnerability).unwrap();

        let total: f64 = hazard
            .ordinate_differences(&vulnerability.intensity_bins())
            .unwrap()
            .iter()
            .sum();
        let at_zero = curve.value_at(0.0).unwrap();
        assert!((at_zero - total).abs() < 1e-12);
    }

    #[test]
    fn test_ordinates_fall_as_ratios_rise() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(10), &vulnerability())
                .unwrap();
        let curve = loss_ratio_curve(&matrix, &hazard(), &vulnerability()).unwrap();

        let ordinates: Vec<f64> = curve.ordinates().collect();
        for window in ordinates.windows(2) {
            assert!(window[1] <= window[0] + 1e-9);
        }
    }

    #[test]
    fn test_empty_matrix_yields_empty_curve() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::empty(), &vulnerability()).unwrap();
        let curve = loss_ratio_curve(&matrix, &hazard(), &vulnerability()).unwrap();
        assert!(curve.is_empty());
    }

    #[test]
    fn test_empty_hazard_yields_empty_curve() {
        let matrix =
            LossRatioExceedanceMatrix::compute(&Interval::with_steps(5), &vulnerability())
                .unwrap();
        let empty = HazardCurve::new("PGA", DiscreteFunction::new());
        let curve = loss_ratio_curve(&matrix, &empty, &vulnerability()).unwrap();
        assert!(curve.is_empty());
    }

    #[test]
    fn test_conditional_loss_interpolates() {
        let curve =
            DiscreteFunction::from_pairs([(0.0, 0.8), (100.0, 0.4), (200.0, 0.2)]).unwrap();
        let loss = conditional_loss(&curve, 0.4).unwrap();
        assert!((loss - 100.0).abs() < 1e-9);
        let loss = conditional_loss(&curve, 0.6).unwrap();
        assert!((loss - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_conditional_loss_below_curve_is_maximum_loss() {
        let curve =
            DiscreteFunction::from_pairs([(0.0, 0.8), (100.0, 0.4), (200.0, 0.2)]).unwrap();
        assert_eq!(conditional_loss(&curve, 0.1).unwrap(), 200.0);
    }

    #[test]
    fn test_conditional_loss_above_curve_is_zero() {
        let curve =
            DiscreteFunction::from_pairs([(0.0, 0.8), (100.0, 0.4), (200.0, 0.2)]).unwrap();
        assert_eq!(conditional_loss(&curve, 0.9).unwrap(), 0.0);
    }

    #[test]
    fn test_conditional_loss_rejects_bad_probability() {
        let curve = DiscreteFunction::from_pairs([(0.0, 0.8)]).unwrap();
        assert!(matches!(
            conditional_loss(&curve, 1.5),
            Err(StatsError::InvalidProbability(_))
        ));
        assert!(matches!(
            conditional_loss(&curve, -0.1),
            Err(StatsError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_conditional_loss_on_empty_curve_is_an_error() {
        let curve = DiscreteFunction::new();
        assert!(conditional_loss(&curve, 0.5).is_err());
    }
}
