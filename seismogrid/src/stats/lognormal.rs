//! Log-normal distribution parameterized by mean and coefficient of
//! variation.

use super::normal::standard_normal_cdf;
use super::StatsError;

/// A log-normal distribution over loss ratios.
///
/// Constructed from the mean and the coefficient of variation of the
/// underlying (linear-space) variable:
///
/// ```text
/// std_dev = mean * cov
/// zeta    = sqrt(ln(1 + cov^2))
/// lambda  = ln(mean) - zeta^2 / 2
/// ```
///
/// `zeta` and `lambda` are the log-space shape and scale; cumulative
/// queries evaluate the standard normal at `(ln(x) - lambda) / zeta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalDistribution {
    mean: f64,
    cov: f64,
    zeta: f64,
    lambda: f64,
}

impl LogNormalDistribution {
    /// Builds the distribution from mean and coefficient of variation.
    ///
    /// Fails with [`StatsError::NonPositiveMean`] when the mean is not
    /// positive, and with [`StatsError::NonPositiveStdDev`] when the
    /// derived standard deviation (`mean * cov`) is not positive.
    pub fn from_mean_cov(mean: f64, cov: f64) -> Result<Self, StatsError> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(StatsError::NonPositiveMean(mean));
        }
        let std_dev = mean * cov;
        if !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(StatsError::NonPositiveStdDev(std_dev));
        }

        let zeta = (1.0 + cov * cov).ln().sqrt();
        let lambda = mean.ln() - 0.5 * zeta * zeta;

        Ok(Self {
            mean,
            cov,
            zeta,
            lambda,
        })
    }

    /// Distribution code used by vulnerability models.
    #[inline]
    pub fn code(&self) -> &'static str {
        "LN"
    }

    /// Mean of the linear-space variable.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Coefficient of variation of the linear-space variable.
    #[inline]
    pub fn cov(&self) -> f64 {
        self.cov
    }

    /// Standard deviation, `mean * cov`.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.mean * self.cov
    }

    /// Probability that the variable does not exceed `x`.
    ///
    /// Zero for any non-positive `x`; the distribution has no mass
    /// there.
    pub fn cumulative_probability(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        standard_normal_cdf((x.ln() - self.lambda) / self.zeta)
    }

    /// Probability that the variable exceeds `x`.
    pub fn survival(&self, x: f64) -> f64 {
        1.0 - self.cumulative_probability(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev_is_mean_times_cov() {
        let distribution = LogNormalDistribution::from_mean_cov(1.5, 0.5).unwrap();
        assert_eq!(distribution.std_dev(), 0.75);
    }

    #[test]
    fn test_rejects_non_positive_mean() {
        assert!(matches!(
            LogNormalDistribution::from_mean_cov(0.0, 0.5),
            Err(StatsError::NonPositiveMean(_))
        ));
        assert!(matches!(
            LogNormalDistribution::from_mean_cov(-1.0, 0.5),
            Err(StatsError::NonPositiveMean(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_std_dev() {
        assert!(matches!(
            LogNormalDistribution::from_mean_cov(1.5, 0.0),
            Err(StatsError::NonPositiveStdDev(_))
        ));
        assert!(matches!(
            LogNormalDistribution::from_mean_cov(1.5, -0.2),
            Err(StatsError::NonPositiveStdDev(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_parameters() {
        assert!(LogNormalDistribution::from_mean_cov(f64::NAN, 0.5).is_err());
        assert!(LogNormalDistribution::from_mean_cov(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_cumulative_probability_at_median() {
        let distribution = LogNormalDistribution::from_mean_cov(0.3, 0.4).unwrap();
        // The median of a log-normal is exp(lambda).
        let median = (distribution.mean.ln()
            - 0.5 * (1.0 + distribution.cov * distribution.cov).ln())
        .exp();
        let cdf = distribution.cumulative_probability(median);
        assert!((cdf - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_no_mass_at_or_below_zero() {
        let distribution = LogNormalDistribution::from_mean_cov(1.0, 0.5).unwrap();
        assert_eq!(distribution.cumulative_probability(0.0), 0.0);
        assert_eq!(distribution.cumulative_probability(-3.0), 0.0);
        assert_eq!(distribution.survival(0.0), 1.0);
    }

    #[test]
    fn test_cumulative_probability_is_monotone() {
        let distribution = LogNormalDistribution::from_mean_cov(0.5, 0.8).unwrap();
        let mut previous = 0.0;
        let mut x = 0.01;
        while x < 5.0 {
            let value = distribution.cumulative_probability(x);
            assert!(value + 1e-9 >= previous, "not monotone at {}", x);
            previous = value;
            x += 0.05;
        }
    }

    #[test]
    fn test_survival_complements_cumulative() {
        let distribution = LogNormalDistribution::from_mean_cov(0.5, 0.8).unwrap();
        for x in [0.1, 0.5, 1.0, 2.0] {
            let sum = distribution.cumulative_probability(x) + distribution.survival(x);
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_code_is_log_normal() {
        let distribution = LogNormalDistribution::from_mean_cov(1.0, 1.0).unwrap();
        assert_eq!(distribution.code(), "LN");
    }
}
