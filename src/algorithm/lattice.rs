//! Candidate cell lattice over a region's bounding box
//!
//! Cell origins are always computed as `origin + index * cell_size` from an
//! integer index rather than by repeated addition, so the lattice stays
//! aligned no matter how many cells it spans. Candidates are enumerated
//! x-major: all rows of the westmost column by increasing y, then the next
//! column east.

use crate::io::configuration::MAX_LATTICE_CELLS;
use crate::io::error::{Result, invalid_parameter};
use geo::{Coord, Rect};
use num_traits::ToPrimitive;

/// Where the lattice is anchored
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OriginAlignment {
    /// Anchor at the region's bounding-box minimum corner
    #[default]
    BoundingBox,
    /// Anchor at an external point so several regions share one lattice
    Fixed {
        /// Easting of a lattice node
        x: f64,
        /// Northing of a lattice node
        y: f64,
    },
}

/// A candidate cell before any intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position in scan order (0-based)
    pub index: usize,
    /// Absolute column index relative to the lattice origin
    pub column: i64,
    /// Absolute row index relative to the lattice origin
    pub row: i64,
    /// Cell footprint
    pub rect: Rect<f64>,
}

/// Finite lattice of square cells covering a bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    origin: Coord<f64>,
    cell_size: f64,
    first_column: i64,
    first_row: i64,
    columns: usize,
    rows: usize,
}

impl Lattice {
    /// Build the smallest lattice whose cells cover `bounds`
    ///
    /// Cell origins start at or below the box minimum and stop before the box
    /// maximum; the last cell in each direction may extend past it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if:
    /// - `cell_size` is non-positive or non-finite
    /// - A fixed origin is non-finite
    /// - The lattice would exceed [`MAX_LATTICE_CELLS`] candidates
    pub fn covering(bounds: Rect<f64>, cell_size: f64, alignment: OriginAlignment) -> Result<Self> {
        validate_cell_size(cell_size)?;

        let origin = match alignment {
            OriginAlignment::BoundingBox => bounds.min(),
            OriginAlignment::Fixed { x, y } => {
                if !(x.is_finite() && y.is_finite()) {
                    return Err(invalid_parameter(
                        "origin",
                        &format!("{x},{y}"),
                        &"must be finite",
                    ));
                }
                Coord { x, y }
            }
        };

        let (first_column, columns) =
            axis_span(origin.x, bounds.min().x, bounds.max().x, cell_size)?;
        let (first_row, rows) = axis_span(origin.y, bounds.min().y, bounds.max().y, cell_size)?;

        let total = columns.checked_mul(rows).unwrap_or(usize::MAX);
        if total > MAX_LATTICE_CELLS {
            return Err(invalid_parameter(
                "cell_size",
                &cell_size,
                &format!(
                    "lattice of {columns}x{rows} cells exceeds the limit of {MAX_LATTICE_CELLS}"
                ),
            ));
        }

        Ok(Self {
            origin,
            cell_size,
            first_column,
            first_row,
            columns,
            rows,
        })
    }

    /// Lattice anchor point
    pub const fn origin(&self) -> Coord<f64> {
        self.origin
    }

    /// Cell edge length
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Area of one full cell
    pub const fn cell_area(&self) -> f64 {
        self.cell_size * self.cell_size
    }

    /// Number of columns (x direction)
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows (y direction)
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Absolute index of the westmost column
    pub const fn first_column(&self) -> i64 {
        self.first_column
    }

    /// Absolute index of the southmost row
    pub const fn first_row(&self) -> i64 {
        self.first_row
    }

    /// Total number of candidate cells
    pub const fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Whether the lattice has no cells
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Footprint of the cell at absolute lattice indices
    pub fn cell_rect(&self, column: i64, row: i64) -> Rect<f64> {
        let x0 = self.origin.x + column as f64 * self.cell_size;
        let y0 = self.origin.y + row as f64 * self.cell_size;
        // Far edges come from the next index so neighbours share edges exactly
        let x1 = self.origin.x + (column + 1) as f64 * self.cell_size;
        let y1 = self.origin.y + (row + 1) as f64 * self.cell_size;
        Rect::new((x0, y0), (x1, y1))
    }

    /// Candidate at a scan-order position
    pub fn candidate(&self, index: usize) -> Option<Candidate> {
        (index < self.len()).then(|| self.candidate_unchecked(index))
    }

    fn candidate_unchecked(&self, index: usize) -> Candidate {
        let column = self.first_column + (index / self.rows) as i64;
        let row = self.first_row + (index % self.rows) as i64;
        Candidate {
            index,
            column,
            row,
            rect: self.cell_rect(column, row),
        }
    }

    /// Every candidate in scan order
    pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
        (0..self.len()).map(|index| self.candidate_unchecked(index))
    }

    /// Candidates of one column, `offset` counted from the westmost column
    pub fn column(&self, offset: usize) -> impl Iterator<Item = Candidate> + '_ {
        let start = offset.min(self.columns) * self.rows;
        let end = if offset < self.columns {
            start + self.rows
        } else {
            start
        };
        (start..end).map(|index| self.candidate_unchecked(index))
    }

    /// Scan-order position of absolute lattice indices, if inside the lattice
    pub fn index_of(&self, column: i64, row: i64) -> Option<usize> {
        let c = column.checked_sub(self.first_column)?.to_usize()?;
        let r = row.checked_sub(self.first_row)?.to_usize()?;
        (c < self.columns && r < self.rows).then_some(c * self.rows + r)
    }
}

/// Reject non-positive or non-finite cell sizes
///
/// # Errors
///
/// Returns `InvalidParameter` naming `cell_size`
pub fn validate_cell_size(cell_size: f64) -> Result<()> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(invalid_parameter(
            "cell_size",
            &cell_size,
            &"must be a positive finite number",
        ))
    }
}

// First absolute index and count of cells along one axis so that the first
// cell starts at or below `min` and the last one starts strictly below `max`.
fn axis_span(origin: f64, min: f64, max: f64, size: f64) -> Result<(i64, usize)> {
    let overflow =
        || invalid_parameter("cell_size", &size, &"lattice index does not fit in 64 bits");
    let to_index = |value: f64| value.to_i64().ok_or_else(overflow);

    let mut first = to_index(((min - origin) / size).floor())?;
    if origin + first as f64 * size > min {
        first = first.checked_sub(1).ok_or_else(overflow)?;
    }

    let after_first = first.checked_add(1).ok_or_else(overflow)?;
    let mut end = to_index(((max - origin) / size).ceil())?.max(after_first);
    while end - 1 > first && origin + (end - 1) as f64 * size >= max {
        end -= 1;
    }

    let count = end
        .checked_sub(first)
        .and_then(|span| ToPrimitive::to_usize(&span))
        .ok_or_else(overflow)?;
    Ok((first, count))
}
