//! Grid materializer: filter-then-clip generation of a clipped fishnet
//!
//! A run unions the region once, scans the bounding-box lattice with a cheap
//! boolean test against that union, and clips only the survivors against the
//! original features. Identifiers follow scan order, so the same region and
//! configuration always yield the same ids.

use crate::algorithm::clip::{ClipMode, Piece, clip_candidate};
use crate::algorithm::filter::{candidate_survives, coarse_filter};
use crate::algorithm::lattice::{Candidate, Lattice, OriginAlignment, validate_cell_size};
use crate::algorithm::observer::{Phase, ProgressObserver, Silent};
use crate::analysis::statistics::RunStats;
use crate::io::configuration::{
    AreaUnit, DEFAULT_CELL_SIZE, FULL_CELL_FRACTION, MIN_AREA_FRACTION,
};
use crate::io::error::{Result, computation_error, invalid_region};
use crate::spatial::crs::Crs;
use crate::spatial::region::Region;
use crate::spatial::shape::Shape;
use geo::MultiPolygon;
use rayon::prelude::*;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Parameters of one materializer run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Cell edge length in working CRS units
    pub cell_size: f64,
    /// Lattice anchor
    pub alignment: OriginAlignment,
    /// Reporting of cells covering several features
    pub clip_mode: ClipMode,
    /// Evaluate filter and clip on the rayon pool
    pub parallel: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl GridConfig {
    /// Configuration with the given cell size and default options
    pub const fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            alignment: OriginAlignment::BoundingBox,
            clip_mode: ClipMode::Dissolve,
            parallel: true,
        }
    }

    /// Check the configuration before any work is done
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the cell size is non-positive or non-finite
    pub fn validate(&self) -> Result<()> {
        validate_cell_size(self.cell_size)
    }
}

/// A lattice cell clipped to the region
#[derive(Debug, Clone)]
pub struct ClippedCell<S = MultiPolygon<f64>> {
    /// Sequential identifier in scan order
    pub id: usize,
    /// Absolute lattice column
    pub column: i64,
    /// Absolute lattice row
    pub row: i64,
    /// Source features covered by this cell
    pub features: Vec<usize>,
    /// Clipped geometry, never empty
    pub geometry: S,
    /// Area in squared working CRS units, always positive
    pub area: f64,
}

impl<S> ClippedCell<S> {
    /// Area converted to a reporting unit
    pub const fn area_in(&self, unit: AreaUnit) -> f64 {
        unit.convert(self.area)
    }
}

/// Complete result of a materializer run
#[derive(Debug, Clone)]
pub struct Fishnet<S = MultiPolygon<f64>> {
    /// Cells in identifier order
    pub cells: Vec<ClippedCell<S>>,
    /// Lattice the cells were drawn from
    pub lattice: Lattice,
    /// Working reference system of geometries and areas
    pub crs: Crs,
    /// Counters and timings
    pub stats: RunStats,
}

impl<S> Fishnet<S> {
    /// Number of cells
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell intersects the region
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of cell areas in squared working units
    pub fn total_area(&self) -> f64 {
        self.cells.iter().map(|cell| cell.area).sum()
    }
}

/// Prepared generator for one region and configuration
pub struct Materializer<'r, S: Shape = MultiPolygon<f64>> {
    region: &'r Region<S>,
    config: GridConfig,
    lattice: Lattice,
    union: S,
    min_area: f64,
    union_time: Duration,
    observer: &'r dyn ProgressObserver,
}

impl<'r, S: Shape> Materializer<'r, S> {
    /// Validate inputs, build the lattice and union the region
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `InvalidParameter` for a bad cell size or origin, or an oversized lattice
    /// - `InvalidRegion` if the region is empty, invalid, has zero area or is
    ///   not in linear units
    pub fn new(region: &'r Region<S>, config: GridConfig) -> Result<Self> {
        Self::with_observer(region, config, &Silent)
    }

    /// As [`Materializer::new`], reporting progress to `observer`
    ///
    /// # Errors
    ///
    /// See [`Materializer::new`]
    pub fn with_observer(
        region: &'r Region<S>,
        config: GridConfig,
        observer: &'r dyn ProgressObserver,
    ) -> Result<Self> {
        config.validate()?;
        region.check()?;
        region.require_linear()?;

        let bounds = region
            .bounds()
            .ok_or_else(|| invalid_region(&"region has no extent"))?;
        let lattice = Lattice::covering(bounds, config.cell_size, config.alignment)?;
        debug!(
            origin_x = lattice.origin().x,
            origin_y = lattice.origin().y,
            columns = lattice.columns(),
            rows = lattice.rows(),
            candidates = lattice.len(),
            width = bounds.width(),
            height = bounds.height(),
            "lattice prepared"
        );

        observer.phase_started(Phase::Union, region.features().len());
        let start = Instant::now();
        let union = region.union();
        let union_time = start.elapsed();
        observer.advance(Phase::Union, region.features().len());
        observer.phase_finished(Phase::Union, union_time);
        debug!(
            features = region.features().len(),
            elapsed_ms = union_time.as_millis() as u64,
            "region union created"
        );

        Ok(Self {
            region,
            config,
            lattice,
            union,
            min_area: MIN_AREA_FRACTION * config.cell_size * config.cell_size,
            union_time,
            observer,
        })
    }

    /// Candidate lattice of this run
    pub const fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Unioned region used by the coarse filter
    pub const fn union(&self) -> &S {
        &self.union
    }

    /// Configuration of this run
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Lazily generate cells one candidate at a time
    ///
    /// Each call starts a fresh scan and yields exactly the cells of
    /// [`Materializer::materialize`] in the same order with the same ids, or
    /// the same error.
    pub fn cells(&self) -> Cells<'_, 'r, S> {
        Cells {
            materializer: self,
            next_index: 0,
            next_id: 0,
            pending: VecDeque::new(),
        }
    }

    fn clip(&self, candidate: &Candidate) -> Vec<Piece<S>> {
        clip_candidate(self.region, candidate, self.min_area, self.config.clip_mode)
    }

    /// Generate every cell in one all-or-nothing batch
    ///
    /// # Errors
    ///
    /// Returns a computation error if any clipped area is not finite; no
    /// partial result is returned
    pub fn materialize(&self) -> Result<Fishnet<S>> {
        let observer = self.observer;

        observer.phase_started(Phase::Filter, self.lattice.columns());
        let start = Instant::now();
        let mask = coarse_filter(&self.union, &self.lattice, self.config.parallel, observer);
        let filter_time = start.elapsed();
        observer.phase_finished(Phase::Filter, filter_time);

        let survivors: Vec<Candidate> = mask
            .iter_ones()
            .filter_map(|index| self.lattice.candidate(index))
            .collect();
        info!(
            candidates = self.lattice.len(),
            survivors = survivors.len(),
            elapsed_ms = filter_time.as_millis() as u64,
            "coarse filter complete"
        );

        observer.phase_started(Phase::Clip, survivors.len());
        let start = Instant::now();
        let clip_one = |candidate: &Candidate| {
            let pieces = self.clip(candidate);
            observer.advance(Phase::Clip, 1);
            (*candidate, pieces)
        };
        let clipped: Vec<(Candidate, Vec<Piece<S>>)> = if self.config.parallel {
            survivors.par_iter().map(clip_one).collect()
        } else {
            survivors.iter().map(clip_one).collect()
        };
        let clip_time = start.elapsed();
        observer.phase_finished(Phase::Clip, clip_time);

        let occupied_cells = clipped.iter().filter(|(_, pieces)| !pieces.is_empty()).count();
        let mut cells = Vec::with_capacity(clipped.len());
        for (candidate, pieces) in clipped {
            for piece in pieces {
                cells.push(annotate(cells.len(), &candidate, piece)?);
            }
        }
        info!(
            cells = cells.len(),
            elapsed_ms = clip_time.as_millis() as u64,
            "precise clip complete"
        );

        let full_area = FULL_CELL_FRACTION * self.lattice.cell_area();
        let stats = RunStats {
            candidates: self.lattice.len(),
            coarse_survivors: survivors.len(),
            occupied_cells,
            full_cells: cells.iter().filter(|cell| cell.area >= full_area).count(),
            cells: cells.len(),
            union_time: self.union_time,
            filter_time,
            clip_time,
        };

        Ok(Fishnet {
            cells,
            lattice: self.lattice.clone(),
            crs: self.region.crs(),
            stats,
        })
    }
}

fn annotate<S>(id: usize, candidate: &Candidate, piece: Piece<S>) -> Result<ClippedCell<S>> {
    if !piece.area.is_finite() {
        return Err(computation_error(
            "cell area",
            &format!(
                "cell at column {} row {} has area {}",
                candidate.column, candidate.row, piece.area
            ),
        ));
    }
    Ok(ClippedCell {
        id,
        column: candidate.column,
        row: candidate.row,
        features: piece.features,
        geometry: piece.geometry,
        area: piece.area,
    })
}

/// Lazy, restartable scan producing clipped cells in identifier order
///
/// Items carry the same checks as the batch run; after the first error the
/// scan ends.
pub struct Cells<'m, 'r, S: Shape> {
    materializer: &'m Materializer<'r, S>,
    next_index: usize,
    next_id: usize,
    pending: VecDeque<ClippedCell<S>>,
}

impl<S: Shape> Iterator for Cells<'_, '_, S> {
    type Item = Result<ClippedCell<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cell) = self.pending.pop_front() {
                return Some(Ok(cell));
            }
            let candidate = self.materializer.lattice.candidate(self.next_index)?;
            self.next_index += 1;

            if !candidate_survives(&self.materializer.union, candidate.rect) {
                continue;
            }
            for piece in self.materializer.clip(&candidate) {
                match annotate(self.next_id, &candidate, piece) {
                    Ok(cell) => self.pending.push_back(cell),
                    Err(error) => {
                        self.pending.clear();
                        self.next_index = self.materializer.lattice.len();
                        return Some(Err(error));
                    }
                }
                self.next_id += 1;
            }
        }
    }
}

/// Validate, prepare and materialize in one call
///
/// # Errors
///
/// See [`Materializer::new`] and [`Materializer::materialize`]
pub fn materialize<S: Shape>(region: &Region<S>, config: GridConfig) -> Result<Fishnet<S>> {
    Materializer::new(region, config)?.materialize()
}
