//! Post-run analysis of materialized grids

/// Per-cell coverage fractions over the lattice
pub mod coverage;
/// Run counters and area summaries
pub mod statistics;
