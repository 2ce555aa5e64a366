//! Computation lifecycle.
//!
//! The engine walks a region's grid and drives the event protocol:
//! [`START`] with the region, one [`SITE_LOADED`] per grid cell with
//! that cell's freshly seeded pipe, then [`STOP`]. Everything the
//! computation produces comes from listeners reacting to those events;
//! the engine itself knows nothing about hazard or risk.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::Cache;
use crate::engine::{EngineError, EventSource, Listener, Payload};
use crate::geo::Region;
use crate::pipe::Pipe;

/// Raised once per computation, before any site, with the region.
pub const START: &str = "START";
/// Raised once per grid cell with the cell's pipe.
pub const SITE_LOADED: &str = "SITE_LOADED";
/// Raised once per computation after the last site.
pub const STOP: &str = "STOP";
/// Raised by caching filters when a memoized value is absent, with the
/// current cell's pipe, so a producer can compute it.
pub const CACHE_EMPTY: &str = "CACHE_EMPTY";

/// Event-driven grid computation.
pub struct Engine {
    source: Arc<EventSource>,
    buffer: Arc<dyn Cache>,
}

impl Engine {
    /// Creates an engine over the given cross-cell buffer. The four
    /// lifecycle events are declared up front.
    pub fn new(buffer: Arc<dyn Cache>) -> Self {
        let source = Arc::new(EventSource::new());
        source.can_raise(&[START, SITE_LOADED, STOP, CACHE_EMPTY]);
        Self { source, buffer }
    }

    /// The engine's event source, for declaring further events.
    pub fn source(&self) -> &Arc<EventSource> {
        &self.source
    }

    /// The cross-cell buffer shared with every dispatch.
    pub fn buffer(&self) -> &Arc<dyn Cache> {
        &self.buffer
    }

    /// Attaches a listener to one of the engine's events.
    pub fn on(&self, event: &str, listener: Arc<dyn Listener>) -> Result<(), EngineError> {
        self.source.on(event, listener)
    }

    /// Raises an event with the engine's buffer.
    pub fn raise(&self, event: &str, payload: &mut Payload<'_>) -> Result<(), EngineError> {
        self.source.raise(event, self.buffer.as_ref(), payload)
    }

    /// Runs the full lifecycle over the region's grid.
    ///
    /// Each cell gets a fresh pipe seeded with the region and the
    /// cell's site; pipes never outlive their cell's dispatch. The
    /// first listener error aborts the computation, skipping the
    /// remaining cells and the [`STOP`] event.
    pub fn compute(&self, region: &Region) -> Result<(), EngineError> {
        info!(
            rows = region.rows(),
            columns = region.columns(),
            "starting grid computation"
        );
        self.raise(START, &mut Payload::Region(region))?;
        for site in region.sites() {
            debug!(site = %site, "computing cell");
            let mut pipe = Pipe::new(region.clone(), site);
            self.raise(SITE_LOADED, &mut Payload::Pipe(&mut pipe))?;
        }
        self.raise(STOP, &mut Payload::Empty)?;
        info!("grid computation finished");
        Ok(())
    }
}
