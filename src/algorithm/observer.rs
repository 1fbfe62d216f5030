//! Progress callbacks decoupled from the grid algorithm

use std::fmt;
use std::time::Duration;

/// Stage of a materializer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Unioning region features into one filter geometry
    Union,
    /// Boolean intersection test of every candidate, counted in lattice columns
    Filter,
    /// Exact clipping of surviving candidates, counted in candidates
    Clip,
}

impl Phase {
    /// Human readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Filter => "coarse filter",
            Self::Clip => "precise clip",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives progress events from a materializer run
///
/// Callbacks may arrive from worker threads when parallel evaluation is
/// enabled, so implementations must be `Sync`.
pub trait ProgressObserver: Sync {
    /// A phase began with `total` units of work
    fn phase_started(&self, _phase: Phase, _total: usize) {}

    /// `units` more units of work completed
    fn advance(&self, _phase: Phase, _units: usize) {}

    /// A phase completed
    fn phase_finished(&self, _phase: Phase, _elapsed: Duration) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ProgressObserver for Silent {}
