//! Spatial data structures and reference systems
//!
//! This module contains spatial-related functionality including:
//! - The geometry capability interface used by the grid algorithm
//! - Region features, validation and repair
//! - Coordinate reference systems and transforms

/// Coordinate reference systems and transformations
pub mod crs;
/// Region of interest and its boundary features
pub mod region;
/// Geometry capability interface
pub mod shape;

pub use crs::Crs;
pub use region::{Region, RegionFeature};
pub use shape::Shape;
