//! Cell centroid task list in WGS84 longitude/latitude
//!
//! Imagery capture works from one centre point per cell. Centroids are taken
//! in the working system, where they are exact, and only then converted.

use crate::algorithm::materializer::Fishnet;
use crate::io::error::{Result, WithPath, computation_error};
use crate::io::vector::write_atomic;
use crate::spatial::crs::{Crs, Transform};
use geo::Centroid;
use std::io::Write;
use std::path::Path;

/// Centre of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellCentroid {
    /// Cell identifier
    pub id: usize,
    /// Longitude in degrees
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
}

/// Geographic centroid of every cell in identifier order
///
/// # Errors
///
/// Returns a projection error if the working system cannot be related to
/// WGS84, or a computation error for a cell without a centroid
pub fn cell_centroids(fishnet: &Fishnet) -> Result<Vec<CellCentroid>> {
    let transform = Transform::new(fishnet.crs, Crs::Geographic)?;
    fishnet
        .cells
        .iter()
        .map(|cell| {
            let centre = cell.geometry.centroid().ok_or_else(|| {
                computation_error("centroid", &format!("cell {} has no centroid", cell.id))
            })?;
            let (longitude, latitude) = transform.point(centre.x(), centre.y())?;
            Ok(CellCentroid {
                id: cell.id,
                longitude,
                latitude,
            })
        })
        .collect()
}

/// Write `id,longitude,latitude` rows to a CSV file
///
/// # Errors
///
/// Returns an error if centroids cannot be computed or the file cannot be written
pub fn write_centroids(path: &Path, fishnet: &Fishnet) -> Result<()> {
    let centroids = cell_centroids(fishnet)?;
    write_atomic(path, |writer| {
        writeln!(writer, "id,longitude,latitude").with_path(path, "write centroids")?;
        for centroid in &centroids {
            writeln!(
                writer,
                "{},{:.7},{:.7}",
                centroid.id, centroid.longitude, centroid.latitude
            )
            .with_path(path, "write centroids")?;
        }
        Ok(())
    })
}
