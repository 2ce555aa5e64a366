//! Discrete function type underlying hazard and vulnerability curves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boundary behavior for interpolation queries outside a function's
/// domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Return the boundary ordinate unchanged
    Clamp,
    /// Extend the boundary segment linearly
    Extend,
}

/// Errors raised by curve construction and evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("curve has no pairs")]
    Empty,

    #[error("no ordinate recorded for abscissa {0}")]
    AbscissaNotFound(f64),

    #[error("{what} value {value} is not finite")]
    NonFinite { what: &'static str, value: f64 },

    #[error("intensity levels must be finite, positive and strictly increasing")]
    UnorderedIntensities,

    #[error("mean loss ratio {0} is outside [0, 1]")]
    MeanRatioOutOfRange(f64),

    #[error("coefficient of variation {0} is negative")]
    NegativeCov(f64),

    #[error("expected {intensities} mean ratios and covs, got {means} and {covs}")]
    LengthMismatch {
        intensities: usize,
        means: usize,
        covs: usize,
    },

    #[error("vulnerability model identifier must not be empty")]
    EmptyModelId,

    #[error("unknown vulnerability model: {0}")]
    UnknownModel(String),
}

/// An ordered mapping of domain values to codomain values.
///
/// Pairs are kept sorted by abscissa and abscissae are unique: inserting
/// an existing abscissa replaces its ordinate. Ordinate iteration order
/// always matches ascending domain order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscreteFunction {
    pairs: Vec<(f64, f64)>,
}

impl DiscreteFunction {
    /// Creates an empty function.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a function from a pair sequence, sorting by abscissa.
    ///
    /// Later duplicates of an abscissa replace earlier ones.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, CurveError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut function = Self::new();
        for (x, y) in pairs {
            function.insert(x, y)?;
        }
        Ok(function)
    }

    /// Inserts a pair, keeping the domain sorted.
    ///
    /// Inserting an abscissa already present replaces its ordinate.
    pub fn insert(&mut self, x: f64, y: f64) -> Result<(), CurveError> {
        if !x.is_finite() {
            return Err(CurveError::NonFinite {
                what: "abscissa",
                value: x,
            });
        }
        if !y.is_finite() {
            return Err(CurveError::NonFinite {
                what: "ordinate",
                value: y,
            });
        }

        match self.pairs.binary_search_by(|(px, _)| px.total_cmp(&x)) {
            Ok(index) => self.pairs[index].1 = y,
            Err(index) => self.pairs.insert(index, (x, y)),
        }
        Ok(())
    }

    /// Exact-point lookup of the ordinate stored for `x`.
    pub fn value_at(&self, x: f64) -> Result<f64, CurveError> {
        self.pairs
            .binary_search_by(|(px, _)| px.total_cmp(&x))
            .map(|index| self.pairs[index].1)
            .map_err(|_| CurveError::AbscissaNotFound(x))
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the function holds no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Domain values in ascending order.
    pub fn abscissae(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|&(x, _)| x)
    }

    /// Codomain values in ascending order of their abscissae.
    pub fn ordinates(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|&(_, y)| y)
    }

    /// Linear interpolation at `x`.
    ///
    /// Queries outside the domain follow the given boundary behavior. An
    /// exact domain point returns its stored ordinate; a single-point
    /// function evaluates to its only ordinate everywhere.
    pub fn interpolate(&self, x: f64, boundary: Interpolation) -> Result<f64, CurveError> {
        if !x.is_finite() {
            return Err(CurveError::NonFinite {
                what: "abscissa",
                value: x,
            });
        }
        if self.pairs.is_empty() {
            return Err(CurveError::Empty);
        }
        Ok(interpolate_sorted(&self.pairs, x, boundary))
    }

    /// Abscissa for an ordinate, by interpolating the inverted pairs.
    ///
    /// The inverted pairs are sorted by ordinate before interpolation;
    /// queries outside the ordinate range clamp to the nearest inverted
    /// boundary.
    pub fn inverse_interpolate(&self, y: f64) -> Result<f64, CurveError> {
        if !y.is_finite() {
            return Err(CurveError::NonFinite {
                what: "ordinate",
                value: y,
            });
        }
        if self.pairs.is_empty() {
            return Err(CurveError::Empty);
        }

        let mut inverted: Vec<(f64, f64)> = self.pairs.iter().map(|&(x, y)| (y, x)).collect();
        inverted.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(interpolate_sorted(&inverted, y, Interpolation::Clamp))
    }

    /// Returns a copy with every abscissa multiplied by `factor`,
    /// ordinates unchanged.
    pub fn rescale_domain(&self, factor: f64) -> Result<Self, CurveError> {
        if !factor.is_finite() {
            return Err(CurveError::NonFinite {
                what: "factor",
                value: factor,
            });
        }

        let mut rescaled = Self::new();
        for &(x, y) in &self.pairs {
            rescaled.insert(x * factor, y)?;
        }
        Ok(rescaled)
    }
}

/// Linear interpolation over pairs sorted by their first element.
///
/// The slice must be non-empty. Zero-width segments evaluate to their
/// left ordinate.
fn interpolate_sorted(pairs: &[(f64, f64)], x: f64, boundary: Interpolation) -> f64 {
    if let Ok(index) = pairs.binary_search_by(|(px, _)| px.total_cmp(&x)) {
        return pairs[index].1;
    }

    let count = pairs.len();
    if count == 1 {
        return pairs[0].1;
    }

    let (first_x, first_y) = pairs[0];
    let (last_x, last_y) = pairs[count - 1];

    if x < first_x {
        return match boundary {
            Interpolation::Clamp => first_y,
            Interpolation::Extend => segment_value(x, pairs[0], pairs[1]),
        };
    }
    if x > last_x {
        return match boundary {
            Interpolation::Clamp => last_y,
            Interpolation::Extend => segment_value(x, pairs[count - 2], pairs[count - 1]),
        };
    }

    let upper = pairs.partition_point(|(px, _)| *px < x);
    segment_value(x, pairs[upper - 1], pairs[upper])
}

fn segment_value(x: f64, (x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
    if x1 == x2 {
        return y1;
    }
    y1 + (y2 - y1) * (x - x1) / (x2 - x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiscreteFunction {
        DiscreteFunction::from_pairs([(0.1, 1.0), (0.3, 3.0), (0.2, 2.0)]).unwrap()
    }

    #[test]
    fn test_pairs_sort_by_abscissa() {
        let function = sample();
        let domain: Vec<f64> = function.abscissae().collect();
        assert_eq!(domain, vec![0.1, 0.2, 0.3]);
        let ordinates: Vec<f64> = function.ordinates().collect();
        assert_eq!(ordinates, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_insert_replaces_existing_abscissa() {
        let mut function = sample();
        function.insert(0.2, 9.0).unwrap();
        assert_eq!(function.len(), 3);
        assert_eq!(function.value_at(0.2).unwrap(), 9.0);
    }

    #[test]
    fn test_insert_rejects_non_finite_values() {
        let mut function = DiscreteFunction::new();
        assert!(function.insert(f64::NAN, 1.0).is_err());
        assert!(function.insert(1.0, f64::INFINITY).is_err());
        assert!(function.is_empty());
    }

    #[test]
    fn test_value_at_is_exact_lookup() {
        let function = sample();
        assert_eq!(function.value_at(0.3).unwrap(), 3.0);
        assert!(matches!(
            function.value_at(0.25),
            Err(CurveError::AbscissaNotFound(_))
        ));
    }

    #[test]
    fn test_interpolate_interior_point() {
        let function = sample();
        let value = function.interpolate(0.15, Interpolation::Clamp).unwrap();
        assert!((value - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_domain_point_returns_stored_ordinate() {
        let function = sample();
        assert_eq!(function.interpolate(0.2, Interpolation::Clamp).unwrap(), 2.0);
    }

    #[test]
    fn test_interpolate_clamps_outside_domain() {
        let function = sample();
        assert_eq!(function.interpolate(0.0, Interpolation::Clamp).unwrap(), 1.0);
        assert_eq!(function.interpolate(0.9, Interpolation::Clamp).unwrap(), 3.0);
    }

    #[test]
    fn test_interpolate_extends_boundary_segment() {
        let function = sample();
        let below = function.interpolate(0.0, Interpolation::Extend).unwrap();
        assert!((below - 0.0).abs() < 1e-12);
        let above = function.interpolate(0.4, Interpolation::Extend).unwrap();
        assert!((above - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_empty_function_is_an_error() {
        let function = DiscreteFunction::new();
        assert!(matches!(
            function.interpolate(0.5, Interpolation::Clamp),
            Err(CurveError::Empty)
        ));
    }

    #[test]
    fn test_interpolate_single_point_is_constant() {
        let function = DiscreteFunction::from_pairs([(1.0, 7.0)]).unwrap();
        assert_eq!(function.interpolate(0.5, Interpolation::Clamp).unwrap(), 7.0);
        assert_eq!(function.interpolate(9.0, Interpolation::Extend).unwrap(), 7.0);
    }

    #[test]
    fn test_inverse_interpolate_on_decreasing_ordinates() {
        // Loss-curve shape: ordinates fall as abscissae rise.
        let function =
            DiscreteFunction::from_pairs([(0.0, 0.8), (0.5, 0.4), (1.0, 0.2)]).unwrap();
        let x = function.inverse_interpolate(0.4).unwrap();
        assert!((x - 0.5).abs() < 1e-12);
        let x = function.inverse_interpolate(0.6).unwrap();
        assert!((x - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_interpolate_clamps_outside_ordinate_range() {
        let function =
            DiscreteFunction::from_pairs([(0.0, 0.8), (1.0, 0.2)]).unwrap();
        assert_eq!(function.inverse_interpolate(0.1).unwrap(), 1.0);
        assert_eq!(function.inverse_interpolate(0.9).unwrap(), 0.0);
    }

    #[test]
    fn test_rescale_domain_multiplies_abscissae_only() {
        let function = sample();
        let rescaled = function.rescale_domain(10.0).unwrap();
        let domain: Vec<f64> = rescaled.abscissae().collect();
        assert_eq!(domain, vec![1.0, 2.0, 3.0]);
        let ordinates: Vec<f64> = rescaled.ordinates().collect();
        assert_eq!(ordinates, vec![1.0, 2.0, 3.0]);
        // Source curve is untouched.
        assert_eq!(function.value_at(0.1).unwrap(), 1.0);
    }
}
