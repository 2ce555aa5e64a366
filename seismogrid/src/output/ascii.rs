//! ESRI ASCII grid writer.
//!
//! The format is a six-line header (`ncols`, `nrows`, `xllcorner`,
//! `yllcorner`, `cellsize`, `NODATA_value`) followed by one line per
//! grid row, north row first, values separated by tabs. GIS tools read
//! it directly.

use std::io::Write;

use tracing::debug;

use crate::engine::EngineError;
use crate::geo::{Region, Site};

/// Sentinel for cells without a value.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// Writes a region's per-site scalars as an ESRI ASCII grid.
#[derive(Debug, Clone, Copy)]
pub struct AsciiGridWriter {
    nodata: f64,
}

impl Default for AsciiGridWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiGridWriter {
    pub fn new() -> Self {
        Self {
            nodata: DEFAULT_NODATA,
        }
    }

    /// Overrides the no-data sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = nodata;
        self
    }

    /// Writes the grid. The lookup supplies each site's value; `None`
    /// writes the sentinel.
    pub fn write<W, F>(
        &self,
        out: &mut W,
        region: &Region,
        mut lookup: F,
    ) -> Result<(), EngineError>
    where
        W: Write,
        F: FnMut(&Site) -> Result<Option<f64>, EngineError>,
    {
        writeln!(out, "ncols {}", region.columns())?;
        writeln!(out, "nrows {}", region.rows())?;
        writeln!(out, "xllcorner {}", region.lower_left().longitude())?;
        writeln!(out, "yllcorner {}", region.lower_left().latitude())?;
        writeln!(out, "cellsize {}", region.cell_size())?;
        writeln!(out, "NODATA_value {}", self.nodata)?;

        let columns = region.columns();
        let mut cells = Vec::with_capacity(columns);
        for site in region.sites() {
            let value = lookup(&site)?.unwrap_or(self.nodata);
            cells.push(value.to_string());
            if cells.len() == columns {
                writeln!(out, "{}", cells.join("\t"))?;
                cells.clear();
            }
        }
        debug!(
            rows = region.rows(),
            columns,
            "wrote ascii grid"
        );
        Ok(())
    }
}
