//! Coarse intersection filter over the candidate lattice
//!
//! Each candidate box is tested against the single unioned region geometry.
//! The test only answers yes or no, so it is far cheaper than clipping and
//! discards most of the bounding box for irregular regions.

use crate::algorithm::lattice::Lattice;
use crate::algorithm::observer::{Phase, ProgressObserver};
use crate::spatial::shape::Shape;
use bitvec::vec::BitVec;
use rayon::prelude::*;

/// Whether one candidate box touches or overlaps the union
pub fn candidate_survives<S: Shape>(union: &S, rect: geo::Rect<f64>) -> bool {
    union.intersects(&S::from_rect(rect))
}

fn column_hits<S: Shape>(union: &S, lattice: &Lattice, offset: usize) -> Vec<bool> {
    lattice
        .column(offset)
        .map(|candidate| candidate_survives(union, candidate.rect))
        .collect()
}

/// Scan-order bitmask of candidates intersecting `union`
///
/// Columns are independent, so with `parallel` they are evaluated on the
/// rayon pool and reassembled in scan order; the mask is identical either way.
/// The observer advances by one unit per finished column.
pub fn coarse_filter<S: Shape>(
    union: &S,
    lattice: &Lattice,
    parallel: bool,
    observer: &dyn ProgressObserver,
) -> BitVec {
    let evaluate = |offset: usize| {
        let hits = column_hits(union, lattice, offset);
        observer.advance(Phase::Filter, 1);
        hits
    };

    let columns: Vec<Vec<bool>> = if parallel {
        (0..lattice.columns()).into_par_iter().map(evaluate).collect()
    } else {
        (0..lattice.columns()).map(evaluate).collect()
    };

    let mut mask = BitVec::with_capacity(lattice.len());
    for column in columns {
        mask.extend(column);
    }
    mask
}
