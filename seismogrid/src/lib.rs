//! SeismoGrid - Event-driven seismic risk computation over geographic grids
//!
//! This library computes per-site loss estimates from hazard and
//! vulnerability inputs. A region is walked cell by cell; each cell's
//! computation is assembled from small filters attached to lifecycle
//! events, with a shared buffer memoizing intermediate results across
//! cells.
//!
//! # Wiring a computation
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use seismogrid::cache::MemoryCache;
//! use seismogrid::engine::{Engine, SITE_LOADED};
//! use seismogrid::filters::{FilterListener, ScenarioLossFilter};
//!
//! let engine = Engine::new(Arc::new(MemoryCache::new()));
//! engine.on(SITE_LOADED, FilterListener::wrap(ScenarioLossFilter))?;
//! engine.compute(&region)?;
//! ```
//!
//! `compute` raises START, one SITE_LOADED per grid cell, then STOP;
//! every result the run produces comes out of listeners reacting to
//! those events.

pub mod cache;
pub mod config;
pub mod curve;
pub mod engine;
pub mod filters;
pub mod geo;
pub mod input;
pub mod logging;
pub mod output;
pub mod pipe;
pub mod readers;
pub mod stats;

/// Version of the SeismoGrid library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
