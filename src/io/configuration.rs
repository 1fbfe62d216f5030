//! Grid constants and runtime configuration defaults

use clap::ValueEnum;
use std::fmt;

/// Default lattice spacing in working CRS units (1 km in a metric projection)
pub const DEFAULT_CELL_SIZE: f64 = 1000.0;

// Safety limit to prevent runaway enumeration for tiny cells over large regions
/// Maximum number of candidate cells in one lattice
pub const MAX_LATTICE_CELLS: usize = 500_000_000;

/// Clipped pieces below this fraction of a full cell are treated as boundary contact
pub const MIN_AREA_FRACTION: f64 = 1e-9;

/// Cells covering at least this fraction of a full cell count as full in the report
pub const FULL_CELL_FRACTION: f64 = 1.0 - 1e-9;

/// Maximum preview image dimension in pixels (one pixel per lattice cell)
pub const MAX_PREVIEW_DIMENSION: usize = 10_000;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_fishnet";
/// Extension of written feature collections
pub const OUTPUT_EXTENSION: &str = "geojson";
/// Suffix of the coverage preview image
pub const PREVIEW_SUFFIX: &str = "_preview.png";
/// Suffix of the centroid task list
pub const CENTROIDS_SUFFIX: &str = "_centroids.csv";
/// Input file extensions recognised as region boundaries
pub const INPUT_EXTENSIONS: [&str; 2] = ["geojson", "json"];

/// Square meters in one hectare
pub const SQUARE_METERS_PER_HECTARE: f64 = 1e4;
/// Square meters in one square kilometer
pub const SQUARE_METERS_PER_SQUARE_KILOMETER: f64 = 1e6;

/// Unit used when reporting cell areas
///
/// Areas are always computed in squared working CRS units; the reporting unit
/// is a fixed scalar applied afterwards and assumes a metric working CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AreaUnit {
    /// Square meters (native units)
    #[value(name = "m2")]
    SquareMeters,
    /// Hectares
    #[value(name = "ha")]
    Hectares,
    /// Square kilometers
    #[default]
    #[value(name = "km2")]
    SquareKilometers,
}

impl AreaUnit {
    /// Convert an area in square working units into this unit
    pub const fn convert(self, square_meters: f64) -> f64 {
        match self {
            Self::SquareMeters => square_meters,
            Self::Hectares => square_meters / SQUARE_METERS_PER_HECTARE,
            Self::SquareKilometers => square_meters / SQUARE_METERS_PER_SQUARE_KILOMETER,
        }
    }

    /// Short label used in log output and properties
    pub const fn label(self) -> &'static str {
        match self {
            Self::SquareMeters => "m2",
            Self::Hectares => "ha",
            Self::SquareKilometers => "km2",
        }
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
