/// Precise clipping of candidates against region features
pub mod clip;
/// Coarse boolean filter over the candidate lattice
pub mod filter;
/// Candidate lattice construction and scan order
pub mod lattice;
/// Grid materializer orchestration and output records
pub mod materializer;
/// Progress reporting callbacks
pub mod observer;
