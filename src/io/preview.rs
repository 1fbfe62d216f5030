//! PNG preview of lattice coverage, one pixel per candidate cell

use crate::algorithm::materializer::Fishnet;
use crate::analysis::coverage::coverage_fractions;
use crate::io::configuration::MAX_PREVIEW_DIMENSION;
use crate::io::error::{FishnetError, Result, invalid_parameter};
use crate::io::vector::write_atomic;
use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};
use ndarray::Array2;
use std::path::Path;

/// Colour of covered cells; coverage fraction drives the alpha channel
const COVERED_RGB: [u8; 3] = [34, 139, 34];

/// Render a coverage raster with north up
///
/// Empty cells are transparent. Any cell with non-zero coverage gets at least
/// alpha 1 so slivers stay visible.
///
/// # Errors
///
/// Returns `InvalidParameter` if either dimension is zero or exceeds
/// [`MAX_PREVIEW_DIMENSION`]
pub fn render_coverage(coverage: &Array2<f64>) -> Result<RgbaImage> {
    let (rows, columns) = coverage.dim();
    if rows == 0 || columns == 0 || rows > MAX_PREVIEW_DIMENSION || columns > MAX_PREVIEW_DIMENSION
    {
        return Err(invalid_parameter(
            "preview",
            &format!("{columns}x{rows}"),
            &format!("lattice must be between 1 and {MAX_PREVIEW_DIMENSION} cells per side"),
        ));
    }

    let mut img = ImageBuffer::new(columns as u32, rows as u32);
    for ((row, column), &fraction) in coverage.indexed_iter() {
        let alpha = if fraction > 0.0 {
            (fraction.clamp(0.0, 1.0) * 255.0).round().max(1.0) as u8
        } else {
            0
        };
        let color = Rgba([COVERED_RGB[0], COVERED_RGB[1], COVERED_RGB[2], alpha]);
        // Raster rows run south to north; image rows run top to bottom
        let pixel_y = (rows - 1 - row) as u32;
        img.put_pixel(column as u32, pixel_y, color);
    }
    Ok(img)
}

/// Save the coverage preview of a fishnet as PNG
///
/// The image is encoded into a temporary sibling file renamed into place, so
/// an interrupted run never leaves a truncated preview.
///
/// # Errors
///
/// Returns an error if the lattice is too large to preview, the parent
/// directory cannot be created or the image cannot be encoded or saved
pub fn export_preview(fishnet: &Fishnet, output_path: &Path) -> Result<()> {
    let img = render_coverage(&coverage_fractions(fishnet))?;

    write_atomic(output_path, |writer| {
        img.write_to(writer, ImageFormat::Png)
            .map_err(|source| FishnetError::ImageExport {
                path: output_path.to_path_buf(),
                source,
            })
    })
}
