//! Clipped fishnet grid generation over region boundaries
//!
//! A region's bounding box is covered by a regular lattice of square cells.
//! Cells are first screened against the union of the region with a cheap
//! intersects test, then the survivors are clipped against the original
//! features, numbered in scan order and annotated with their area.

#![forbid(unsafe_code)]

/// Lattice construction, coarse filtering, clipping and orchestration
pub mod algorithm;
/// Run statistics and coverage analysis of materialized grids
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Map projection mathematics
pub mod math;
/// Regions, geometry capabilities and reference systems
pub mod spatial;

pub use algorithm::materializer::{ClippedCell, Fishnet, GridConfig, Materializer, materialize};
pub use io::error::{FishnetError, Result};
pub use spatial::{Crs, Region, RegionFeature, Shape};
