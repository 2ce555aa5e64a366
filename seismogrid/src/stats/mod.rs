//! Statistical module
//!
//! The numeric core of the risk computation: the log-normal distribution
//! parameterized by mean and coefficient of variation, loss-ratio
//! threshold intervals, the loss-ratio-exceedance matrix built from a
//! vulnerability function, and the classical hazard-to-loss math that
//! combines them.

pub mod classical;
mod interval;
mod lognormal;
mod lrem;
mod normal;

pub use interval::Interval;
pub use lognormal::LogNormalDistribution;
pub use lrem::LossRatioExceedanceMatrix;

use thiserror::Error;

use crate::curve::CurveError;

/// Errors raised by the statistical primitives.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("log-normal mean must be positive, got {0}")]
    NonPositiveMean(f64),

    #[error("log-normal standard deviation must be positive, got {0}")]
    NonPositiveStdDev(f64),

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("matrix has {columns} intensity columns but the hazard curve yields {bins} occurrence bins")]
    DimensionMismatch { columns: usize, bins: usize },

    #[error(transparent)]
    Curve(#[from] CurveError),
}
