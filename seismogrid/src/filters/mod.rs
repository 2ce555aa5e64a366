//! Listener implementations that do the hazard and risk work.
//!
//! Filters are small single-purpose units: each reads a few pipe keys,
//! computes or loads one thing, and writes it back under another key.
//! The caller composes a chain by attaching them, in order, to the
//! engine's per-cell event. [`FilterListener`] adapts a [`Filter`] to
//! the engine's [`Listener`] interface; [`ConditionalFilter`] gates a
//! filter behind a [`Specification`] so cells without the needed data
//! are skipped instead of failing.

mod classical;
mod exposure;
mod hazard;
mod persister;
mod scenario;
mod specification;

pub use classical::{
    ConditionalLossFilter, LossCurveFilter, LossRatioCurveFilter, LremCalculator, LremLoader,
    LremSynchronizer,
};
pub use exposure::{CountryLoader, ExposureLoader, VulnerabilitySelector};
pub use hazard::{HazardCurveLoader, IntensityLoader};
pub use persister::{stored_scalar, ScalarPersister};
pub use scenario::ScenarioLossFilter;
pub use specification::{AlwaysFalse, AlwaysTrue, And, IsDataComputable, Specification};

use std::sync::Arc;

use tracing::debug;

use crate::cache::Cache;
use crate::engine::{EngineError, Listener, Payload};
use crate::pipe::Pipe;

/// One step of a per-cell computation chain.
pub trait Filter: Send + Sync {
    /// Name used in dispatch and skip logs.
    fn name(&self) -> &str;

    /// Runs the step against the cell's pipe and the shared buffer.
    fn filter(&self, buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError>;
}

/// Adapts a [`Filter`] to the engine's [`Listener`] interface.
///
/// The adapter only accepts pipe-carrying events; attaching a filter to
/// a lifecycle event that carries no pipe is a wiring mistake and fails
/// the dispatch.
pub struct FilterListener {
    filter: Box<dyn Filter>,
}

impl FilterListener {
    pub fn new(filter: impl Filter + 'static) -> Self {
        Self {
            filter: Box::new(filter),
        }
    }

    /// Boxes the filter straight into a handle for [`Engine::on`].
    ///
    /// [`Engine::on`]: crate::engine::Engine::on
    pub fn wrap(filter: impl Filter + 'static) -> Arc<dyn Listener> {
        Arc::new(Self::new(filter))
    }
}

impl Listener for FilterListener {
    fn name(&self) -> &str {
        self.filter.name()
    }

    fn process(
        &self,
        event: &str,
        buffer: &dyn Cache,
        payload: &mut Payload<'_>,
    ) -> Result<(), EngineError> {
        match payload {
            Payload::Pipe(pipe) => self.filter.filter(buffer, &mut **pipe),
            other => Err(EngineError::InvalidArgument(format!(
                "filter {} expects a pipe payload on {event}, got {}",
                self.filter.name(),
                other.kind()
            ))),
        }
    }
}

/// Gates a delegate filter behind a specification.
pub struct ConditionalFilter {
    name: String,
    specification: Box<dyn Specification>,
    delegate: Box<dyn Filter>,
}

impl ConditionalFilter {
    pub fn new(
        specification: impl Specification + 'static,
        delegate: impl Filter + 'static,
    ) -> Self {
        Self {
            name: format!("conditional-{}", delegate.name()),
            specification: Box::new(specification),
            delegate: Box::new(delegate),
        }
    }
}

impl Filter for ConditionalFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self, buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        if !self.specification.satisfied_by(pipe) {
            debug!(
                filter = self.delegate.name(),
                specification = self.specification.name(),
                "specification unsatisfied, skipping"
            );
            return Ok(());
        }
        self.delegate.filter(buffer, pipe)
    }
}
