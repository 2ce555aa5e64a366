//! Geographic grid module
//!
//! Provides the region/site grid the engine walks: rectangular regions
//! defined by two corner sites and a cell size, with translation between
//! geographic coordinates and grid matrix positions.

mod types;

pub use types::{GeoError, GridPoint, Site, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// A rectangular geographic grid.
///
/// The constructor accepts any two opposite corners and normalizes them
/// into a lower-left / upper-right bounding box. Grid dimensions derive
/// from the corner span and the cell size; a degenerate region whose
/// corners coincide is a single cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    lower_left: Site,
    upper_right: Site,
    cell_size: f64,
}

impl Region {
    /// Creates a region from two opposite corner sites and a cell size.
    ///
    /// # Arguments
    ///
    /// * `a` - One corner of the region
    /// * `b` - The opposite corner
    /// * `cell_size` - Grid spacing in decimal degrees (> 0)
    pub fn new(a: Site, b: Site, cell_size: f64) -> Result<Self, GeoError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GeoError::InvalidCellSize(cell_size));
        }

        let lower_left = Site::new(
            a.longitude().min(b.longitude()),
            a.latitude().min(b.latitude()),
        )?;
        let upper_right = Site::new(
            a.longitude().max(b.longitude()),
            a.latitude().max(b.latitude()),
        )?;

        Ok(Self {
            lower_left,
            upper_right,
            cell_size,
        })
    }

    /// The south-west corner of the region.
    #[inline]
    pub fn lower_left(&self) -> Site {
        self.lower_left
    }

    /// The north-east corner of the region.
    #[inline]
    pub fn upper_right(&self) -> Site {
        self.upper_right
    }

    /// Grid spacing in decimal degrees.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of grid rows spanned by the region.
    pub fn rows(&self) -> usize {
        self.latitude_to_row(self.upper_right.latitude()) + 1
    }

    /// Number of grid columns spanned by the region.
    pub fn columns(&self) -> usize {
        (self.longitude_to_column(self.upper_right.longitude()) + 1) as usize
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.rows() * self.columns()
    }

    /// Whether the site falls within the region bounds (closed interval).
    pub fn contains(&self, site: &Site) -> bool {
        site.longitude() >= self.lower_left.longitude()
            && site.longitude() <= self.upper_right.longitude()
            && site.latitude() >= self.lower_left.latitude()
            && site.latitude() <= self.upper_right.latitude()
    }

    /// Translates latitude into a row index anchored at the lower-left
    /// corner.
    ///
    /// Takes the absolute value of the latitude offset, so a latitude
    /// south of the anchor folds back onto the grid instead of going
    /// negative. The column translation below keeps its sign. Callers
    /// reach this only through [`grid_point`](Self::grid_point), which
    /// bounds-checks first; the raw behavior is pinned by regression
    /// tests.
    fn latitude_to_row(&self, latitude: f64) -> usize {
        let offset = (latitude - self.lower_left.latitude()).abs();
        (offset / self.cell_size).round() as usize
    }

    /// Translates longitude into a signed column offset anchored at the
    /// lower-left corner.
    fn longitude_to_column(&self, longitude: f64) -> i64 {
        let offset = longitude - self.lower_left.longitude();
        (offset / self.cell_size).round() as i64
    }

    // The clamp absorbs floating-point drift when a corner sits on the
    // coordinate range boundary.
    fn row_to_latitude(&self, row: usize) -> f64 {
        (self.lower_left.latitude() + row as f64 * self.cell_size).clamp(MIN_LAT, MAX_LAT)
    }

    fn column_to_longitude(&self, column: usize) -> f64 {
        (self.lower_left.longitude() + column as f64 * self.cell_size).clamp(MIN_LON, MAX_LON)
    }

    /// Translates a site into its grid matrix position.
    ///
    /// Fails with [`GeoError::SiteOutsideRegion`] when the site is not
    /// contained by the region.
    pub fn grid_point(&self, site: &Site) -> Result<GridPoint, GeoError> {
        if !self.contains(site) {
            return Err(GeoError::SiteOutsideRegion {
                longitude: site.longitude(),
                latitude: site.latitude(),
            });
        }

        Ok(GridPoint {
            row: self.latitude_to_row(site.latitude()),
            column: self.longitude_to_column(site.longitude()) as usize,
        })
    }

    /// Constructs the site at the given grid matrix position.
    ///
    /// Fails with [`GeoError::IndexOutOfRange`] when the position does
    /// not address a cell of this region.
    pub fn site_at(&self, point: GridPoint) -> Result<Site, GeoError> {
        let rows = self.rows();
        let columns = self.columns();
        if point.row >= rows || point.column >= columns {
            return Err(GeoError::IndexOutOfRange {
                row: point.row,
                column: point.column,
                rows,
                columns,
            });
        }

        Site::new(
            self.column_to_longitude(point.column),
            self.row_to_latitude(point.row),
        )
    }

    /// Returns an iterator over all grid sites in row-major order.
    ///
    /// Iteration starts at the upper-left corner: rows run north to
    /// south, columns west to east within each row. The iterator is
    /// restartable by calling this method again.
    pub fn sites(&self) -> SitesIterator {
        SitesIterator {
            north_latitude: self.upper_right.latitude(),
            west_longitude: self.lower_left.longitude(),
            cell_size: self.cell_size,
            columns: self.columns(),
            total: self.cell_count(),
            current: 0,
        }
    }

    /// Partitions the region into at most `bands` horizontal row bands.
    ///
    /// Bands are returned north to south and share the parent's cell
    /// size and column extent, so concatenating their [`sites`](Self::sites)
    /// sequences reproduces the parent's sequence. Fewer bands are
    /// returned when the region has fewer rows than requested.
    pub fn split_rows(&self, bands: usize) -> Result<Vec<Region>, GeoError> {
        if bands == 0 {
            return Err(GeoError::InvalidBandCount(bands));
        }

        let rows = self.rows();
        let bands = bands.min(rows);
        let base = rows / bands;
        let remainder = rows % bands;

        let mut regions = Vec::with_capacity(bands);
        let mut next_row = 0usize;
        for band in 0..bands {
            let height = if band < remainder { base + 1 } else { base };
            let first = next_row;
            let last = first + height - 1;
            next_row = last + 1;

            // Band rows counted from the north edge.
            let north =
                (self.upper_right.latitude() - first as f64 * self.cell_size).clamp(MIN_LAT, MAX_LAT);
            let south =
                (self.upper_right.latitude() - last as f64 * self.cell_size).clamp(MIN_LAT, MAX_LAT);
            let a = Site::new(self.lower_left.longitude(), south)?;
            let b = Site::new(self.upper_right.longitude(), north)?;
            regions.push(Region::new(a, b, self.cell_size)?);
        }

        Ok(regions)
    }
}

/// Iterator over the grid sites of a region.
///
/// Yields `rows * columns` sites in row-major order, upper-left first.
#[derive(Debug, Clone)]
pub struct SitesIterator {
    north_latitude: f64,
    west_longitude: f64,
    cell_size: f64,
    columns: usize,
    total: usize,
    current: usize,
}

impl Iterator for SitesIterator {
    type Item = Site;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total {
            return None;
        }

        let row = self.current / self.columns;
        let column = self.current % self.columns;
        self.current += 1;

        let longitude =
            (self.west_longitude + column as f64 * self.cell_size).clamp(MIN_LON, MAX_LON);
        let latitude =
            (self.north_latitude - row as f64 * self.cell_size).clamp(MIN_LAT, MAX_LAT);

        // Corner validation already ran and the clamp absorbs drift, so
        // construction cannot fail here.
        let site = Site::new(longitude, latitude);
        debug_assert!(site.is_ok());
        site.ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SitesIterator {
    fn len(&self) -> usize {
        self.total - self.current
    }
}
