//! Exposure and portfolio loaders.

use std::sync::Arc;

use tracing::debug;

use crate::cache::Cache;
use crate::curve::VulnerabilityRegistry;
use crate::engine::EngineError;
use crate::filters::Filter;
use crate::pipe::{keys, Pipe, Value};
use crate::readers::{CountryReader, ExposureReader};

/// Loads the asset exposed at the current site into
/// [`keys::ASSET_VALUE`] and [`keys::TAXONOMY`].
pub struct ExposureLoader {
    reader: Arc<dyn ExposureReader>,
}

impl ExposureLoader {
    pub fn new(reader: Arc<dyn ExposureReader>) -> Self {
        Self { reader }
    }
}

impl Filter for ExposureLoader {
    fn name(&self) -> &str {
        "exposure-loader"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let site = pipe.current_site()?;
        let exposure = self.reader.read(&site)?;
        debug!(
            site = %site,
            value = exposure.value(),
            taxonomy = exposure.taxonomy(),
            "loaded exposure"
        );
        pipe.put(keys::ASSET_VALUE, Value::Scalar(exposure.value()))?;
        pipe.put(
            keys::TAXONOMY,
            Value::Text(exposure.taxonomy().to_string()),
        )
    }
}

/// Loads the country owning the current site into [`keys::COUNTRY`].
pub struct CountryLoader {
    reader: Arc<dyn CountryReader>,
}

impl CountryLoader {
    pub fn new(reader: Arc<dyn CountryReader>) -> Self {
        Self { reader }
    }
}

impl Filter for CountryLoader {
    fn name(&self) -> &str {
        "country-loader"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let site = pipe.current_site()?;
        let country = self.reader.read(&site)?;
        debug!(site = %site, code = country.code(), "assigned country");
        pipe.put(keys::COUNTRY, Value::Country(country))
    }
}

/// Resolves the pipe's taxonomy against a vulnerability registry and
/// stores the matching function under [`keys::VULNERABILITY`].
pub struct VulnerabilitySelector {
    registry: Arc<VulnerabilityRegistry>,
}

impl VulnerabilitySelector {
    pub fn new(registry: Arc<VulnerabilityRegistry>) -> Self {
        Self { registry }
    }
}

impl Filter for VulnerabilitySelector {
    fn name(&self) -> &str {
        "vulnerability-selector"
    }

    fn filter(&self, _buffer: &dyn Cache, pipe: &mut Pipe) -> Result<(), EngineError> {
        let taxonomy = pipe.text(keys::TAXONOMY)?.to_string();
        let function = self.registry.lookup(&taxonomy)?;
        pipe.put(keys::VULNERABILITY, Value::Vulnerability(function))
    }
}
