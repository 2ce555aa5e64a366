//! Curve module
//!
//! Discrete functions and the domain curves built on them: hazard curves
//! (intensity → probability of exceedance) and vulnerability functions
//! (intensity → loss ratio and variability), plus the registry that
//! indexes vulnerability models by identifier.

mod discrete;
mod hazard;
mod registry;
mod vulnerability;

pub use discrete::{CurveError, DiscreteFunction, Interpolation};
pub use hazard::HazardCurve;
pub use registry::VulnerabilityRegistry;
pub use vulnerability::VulnerabilityFunction;
