//! Geographic primitive types

use std::fmt;
use std::hash::{Hash, Hasher};

/// Valid latitude range in decimal degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in decimal degrees
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A single grid-cell location on the geographic grid.
///
/// Sites compare and hash by the bit patterns of their coordinates, so
/// they can key lookup tables. The constructor rejects non-finite values,
/// which keeps the bitwise equality well defined.
#[derive(Debug, Clone, Copy)]
pub struct Site {
    longitude: f64,
    latitude: f64,
}

impl Site {
    /// Creates a site from a longitude/latitude pair in decimal degrees.
    ///
    /// # Arguments
    ///
    /// * `longitude` - West-east position (-180.0 to 180.0)
    /// * `latitude` - South-north position (-90.0 to 90.0)
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }

        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// West-east position in decimal degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// South-north position in decimal degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Self) -> bool {
        self.longitude.to_bits() == other.longitude.to_bits()
            && self.latitude.to_bits() == other.latitude.to_bits()
    }
}

impl Eq for Site {}

impl Hash for Site {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.longitude.to_bits().hash(state);
        self.latitude.to_bits().hash(state);
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

/// A grid matrix position within a region.
///
/// Row 0 is the southernmost row, column 0 the westernmost column,
/// matching the lower-left anchored translation arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    /// Row index counted northward from the lower-left corner
    pub row: usize,
    /// Column index counted eastward from the lower-left corner
    pub column: usize,
}

/// Errors that can occur during geographic construction or translation.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude is outside the valid range (-90.0 to 90.0) or not finite
    InvalidLatitude(f64),
    /// Longitude is outside the valid range (-180.0 to 180.0) or not finite
    InvalidLongitude(f64),
    /// Cell size must be finite and strictly positive
    InvalidCellSize(f64),
    /// Site does not fall within the region bounds
    SiteOutsideRegion { longitude: f64, latitude: f64 },
    /// Grid index does not address a cell of the region
    IndexOutOfRange {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    /// Row-band partitioning needs at least one band
    InvalidBandCount(usize),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            GeoError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            GeoError::InvalidCellSize(size) => {
                write!(
                    f,
                    "Invalid cell size: {} (must be finite and greater than zero)",
                    size
                )
            }
            GeoError::SiteOutsideRegion {
                longitude,
                latitude,
            } => {
                write!(
                    f,
                    "Site ({}, {}) is not within the region bounds",
                    longitude, latitude
                )
            }
            GeoError::IndexOutOfRange {
                row,
                column,
                rows,
                columns,
            } => {
                write!(
                    f,
                    "Grid index ({}, {}) is outside the {}x{} grid",
                    row, column, rows, columns
                )
            }
            GeoError::InvalidBandCount(bands) => {
                write!(f, "Invalid band count: {} (must be at least 1)", bands)
            }
        }
    }
}

impl std::error::Error for GeoError {}
