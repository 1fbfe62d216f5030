//! Run statistics and cell area summaries for the quality report

use crate::io::configuration::AreaUnit;
use std::time::Duration;
use tracing::info;

/// Counters and timings collected during one materializer run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Candidate cells in the bounding-box lattice
    pub candidates: usize,
    /// Candidates passing the coarse filter
    pub coarse_survivors: usize,
    /// Lattice cells with at least one clipped record
    pub occupied_cells: usize,
    /// Records covering a whole lattice cell
    pub full_cells: usize,
    /// Clipped cells emitted
    pub cells: usize,
    /// Time spent unioning region features
    pub union_time: Duration,
    /// Time spent in the coarse filter
    pub filter_time: Duration,
    /// Time spent clipping survivors
    pub clip_time: Duration,
}

impl RunStats {
    /// Candidates discarded by the coarse filter
    pub const fn eliminated(&self) -> usize {
        self.candidates.saturating_sub(self.coarse_survivors)
    }

    /// Share of candidates discarded by the coarse filter (0 when empty)
    pub fn eliminated_fraction(&self) -> f64 {
        if self.candidates == 0 {
            0.0
        } else {
            self.eliminated() as f64 / self.candidates as f64
        }
    }

    /// Survivors rejected by the precise clip for zero-area contact
    pub const fn boundary_only(&self) -> usize {
        self.coarse_survivors.saturating_sub(self.occupied_cells)
    }

    /// Share of candidates holding part of the region (0 when empty)
    pub fn occupancy(&self) -> f64 {
        if self.candidates == 0 {
            0.0
        } else {
            self.occupied_cells as f64 / self.candidates as f64
        }
    }

    /// Wall time of all phases
    pub fn total_time(&self) -> Duration {
        self.union_time + self.filter_time + self.clip_time
    }

    /// Emit the run counters as a structured event
    pub fn log(&self) {
        info!(
            candidates = self.candidates,
            survivors = self.coarse_survivors,
            eliminated = self.eliminated(),
            eliminated_pct = self.eliminated_fraction() * 100.0,
            boundary_only = self.boundary_only(),
            occupied = self.occupied_cells,
            occupancy_pct = self.occupancy() * 100.0,
            full_cells = self.full_cells,
            partial_cells = self.cells.saturating_sub(self.full_cells),
            cells = self.cells,
            union_ms = self.union_time.as_millis() as u64,
            filter_ms = self.filter_time.as_millis() as u64,
            clip_ms = self.clip_time.as_millis() as u64,
            total_ms = self.total_time().as_millis() as u64,
            "fishnet run statistics"
        );
    }
}

/// Count, total, mean and extremes of cell areas in a reporting unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSummary {
    /// Unit of every area value
    pub unit: AreaUnit,
    /// Number of cells
    pub count: usize,
    /// Sum of areas
    pub total: f64,
    /// Mean area
    pub mean: f64,
    /// Smallest area
    pub min: f64,
    /// Largest area
    pub max: f64,
}

impl AreaSummary {
    /// Summarise areas given in squared working units, `None` when empty
    pub fn from_areas(areas: impl IntoIterator<Item = f64>, unit: AreaUnit) -> Option<Self> {
        let mut count = 0_usize;
        let mut total = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for area in areas {
            let value = unit.convert(area);
            count += 1;
            total += value;
            min = min.min(value);
            max = max.max(value);
        }

        (count > 0).then(|| Self {
            unit,
            count,
            total,
            mean: total / count as f64,
            min,
            max,
        })
    }

    /// Emit the summary as a structured event
    pub fn log(&self) {
        info!(
            cells = self.count,
            unit = self.unit.label(),
            mean = self.mean,
            min = self.min,
            max = self.max,
            total = self.total,
            "cell area summary"
        );
    }
}
