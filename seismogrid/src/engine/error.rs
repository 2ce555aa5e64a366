//! Engine error taxonomy.

use thiserror::Error;

use crate::cache::CacheError;
use crate::curve::CurveError;
use crate::geo::{GeoError, Site};
use crate::stats::StatsError;

/// Errors propagated out of dispatch and computation.
///
/// Nothing here is caught and retried: the first error aborts the
/// dispatch that raised it and propagates out of the enclosing
/// `compute` call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("unknown listener {name:?} for event {event:?}")]
    UnknownListener { event: String, name: String },

    #[error("no pipe data under key {0:?}")]
    MissingPipeData(String),

    #[error("pipe data under key {key:?} is {found}, expected {expected}")]
    PipeTypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("reader failed at site {site}: {message}")]
    Reader { site: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl EngineError {
    /// Builds a reader failure for a site.
    pub fn reader(site: &Site, message: impl Into<String>) -> Self {
        Self::Reader {
            site: site.to_string(),
            message: message.into(),
        }
    }
}
