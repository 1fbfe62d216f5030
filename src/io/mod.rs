//! Input/output operations and error handling

/// Cell centroid task lists in geographic coordinates
pub mod centroids;
/// Command-line interface and batch processing
pub mod cli;
/// Configuration constants and reporting units
pub mod configuration;
/// Error types for fishnet operations
pub mod error;
/// Structured logging setup
pub mod logging;
/// Coverage preview rendering
pub mod preview;
/// Progress tracking for batch runs
pub mod progress;
/// GeoJSON reading and writing
pub mod vector;
