//! Per-site result persistence.

use tracing::debug;

use crate::cache::Cache;
use crate::engine::EngineError;
use crate::filters::Filter;
use crate::geo::Site;
use crate::pipe::Pipe;

/// Copies one pipe scalar into the buffer under a site-qualified key,
/// so results survive the cell's pipe and can be collected after the
/// computation.
///
/// Cells whose chain never produced the scalar are skipped; the result
/// grid reports them as no-data.
pub struct ScalarPersister {
    name: String,
    key: String,
    prefix: String,
}

impl ScalarPersister {
    /// `key` is the pipe key to read, `prefix` the buffer namespace to
    /// write under.
    pub fn new(key: impl Into<String>, prefix: impl Into<String>) -> Self {
        let key = key.into();
        let prefix = prefix.into();
        Self {
            name: format!("persist-{prefix}"),
            key,
            prefix,
        }
    }

    /// Buffer key for one site's value.
    pub fn site_key(prefix: &str, site: &Site) -> String {
        format!("{}:{}:{}", prefix, site.longitude(), site.latitude())
    }
}

impl Filter for ScalarPersister {
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self, buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        if !pipe.contains(&self.key) {
            debug!(key = %self.key, "nothing to persist for cell");
            return Ok(());
        }
        let value = pipe.scalar(&self.key)?;
        let site = pipe.current_site()?;
        let site_key = Self::site_key(&self.prefix, &site);
        buffer.set(&site_key, value.to_string().as_bytes())?;
        debug!(key = %site_key, value, "persisted cell result");
        Ok(())
    }
}

/// Reads back a persisted scalar for a site. A site that was never
/// persisted reads as `None`.
pub fn stored_scalar(
    buffer: &dyn Cache,
    prefix: &str,
    site: &Site,
) -> Result<Option<f64>, EngineError> {
    let key = ScalarPersister::site_key(prefix, site);
    match buffer.get(&key)? {
        None => Ok(None),
        Some(bytes) => {
            let text = String::from_utf8(bytes).map_err(|_| {
                EngineError::InvalidArgument(format!("stored value under {key:?} is not UTF-8"))
            })?;
            let value = text.parse().map_err(|_| {
                EngineError::InvalidArgument(format!(
                    "stored value under {key:?} is not a number: {text:?}"
                ))
            })?;
            Ok(Some(value))
        }
    }
}
