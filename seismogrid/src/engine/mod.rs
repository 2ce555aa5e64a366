//! Event-dispatched grid computation.
//!
//! The engine raises lifecycle events over an [`EventSource`]; filters
//! attached as [`Listener`]s do the actual hazard and risk work, one
//! grid cell at a time, accumulating results in the cell's pipe and in
//! the shared cross-cell buffer. [`WorkerPool`] spreads independent
//! row bands of a region over threads.

mod core;
mod error;
mod event;
mod pool;

pub use self::core::{Engine, CACHE_EMPTY, SITE_LOADED, START, STOP};
pub use error::EngineError;
pub use event::{EventSource, Listener, Payload};
pub use pool::WorkerPool;
