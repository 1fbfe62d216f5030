//! Error types and context management for fishnet operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all fishnet operations
#[derive(Debug)]
pub enum FishnetError {
    /// Failed to parse a region boundary file
    RegionLoad {
        /// Path to the boundary file
        path: PathBuf,
        /// Underlying GeoJSON parsing error
        source: geojson::Error,
    },

    /// Region does not meet materializer requirements
    ///
    /// Raised when the region:
    /// - Has no polygonal features or only empty geometries
    /// - Has zero area or non-finite coordinates
    /// - Is topologically invalid and repair was not requested or failed
    /// - Is expressed in angular units where linear units are required
    InvalidRegion {
        /// Description of what's wrong with the region
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Coordinate transformation between two reference systems failed
    Projection {
        /// Source reference system
        from: String,
        /// Target reference system
        to: String,
        /// Description of the failure
        reason: String,
    },

    /// Failed to serialize the output feature collection
    GeometryExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
    },

    /// Failed to save the coverage preview image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for FishnetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegionLoad { path, source } => {
                write!(f, "Failed to load region '{}': {source}", path.display())
            }
            Self::InvalidRegion { reason } => {
                write!(f, "Invalid region: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Projection { from, to, reason } => {
                write!(f, "Cannot transform from {from} to {to}: {reason}")
            }
            Self::GeometryExport { path, source } => {
                write!(
                    f,
                    "Failed to export features to '{}': {source}",
                    path.display()
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for FishnetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RegionLoad { source, .. } => Some(source),
            Self::GeometryExport { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for fishnet results
pub type Result<T> = std::result::Result<T, FishnetError>;

/// Attaches the file being worked on to I/O failures
pub trait WithPath<T> {
    /// Replace an unknown path and operation with the given ones
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T, E> WithPath<T> for std::result::Result<T, E>
where
    E: Into<FishnetError>,
{
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|e| match e.into() {
            FishnetError::FileSystem { source, .. } => FishnetError::FileSystem {
                path: path.to_path_buf(),
                operation,
                source,
            },
            FishnetError::RegionLoad { source, .. } => FishnetError::RegionLoad {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }
}

impl From<geojson::Error> for FishnetError {
    fn from(err: geojson::Error) -> Self {
        Self::RegionLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for FishnetError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> FishnetError {
    FishnetError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid region error
pub fn invalid_region(reason: &impl ToString) -> FishnetError {
    FishnetError::InvalidRegion {
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> FishnetError {
    FishnetError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
