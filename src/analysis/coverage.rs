//! Coverage fraction raster over the candidate lattice

use crate::algorithm::materializer::Fishnet;
use ndarray::Array2;

/// Fraction of each lattice cell inside the region
///
/// The array is indexed `[row, column]` with both offsets counted from the
/// south-west corner of the lattice. Per-feature records falling in the same
/// cell are summed; values are clamped to 1.
pub fn coverage_fractions<S>(fishnet: &Fishnet<S>) -> Array2<f64> {
    let lattice = &fishnet.lattice;
    let mut coverage = Array2::<f64>::zeros((lattice.rows(), lattice.columns()));
    let cell_area = lattice.cell_area();

    for cell in &fishnet.cells {
        let row = (cell.row - lattice.first_row()) as usize;
        let column = (cell.column - lattice.first_column()) as usize;
        if let Some(value) = coverage.get_mut([row, column]) {
            *value = (*value + cell.area / cell_area).min(1.0);
        }
    }
    coverage
}
