//! Precise clipping of surviving candidates against the original features
//!
//! Clipping runs against each boundary feature rather than the union, so
//! every piece knows which feature it came from.

use crate::algorithm::lattice::Candidate;
use crate::spatial::region::Region;
use crate::spatial::shape::Shape;
use geo::{Intersects, Rect};

/// How pieces from several features inside one cell are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// One record per lattice cell; pieces are unioned and areas combined
    #[default]
    Dissolve,
    /// One record per (cell, feature) pair, like an overlay intersection
    PerFeature,
}

/// Part of a candidate cell inside the region
#[derive(Debug, Clone)]
pub struct Piece<S> {
    /// Indices of the source features covered by this piece
    pub features: Vec<usize>,
    /// Clipped geometry, possibly multi-part
    pub geometry: S,
    /// Area in squared CRS units
    pub area: f64,
}

/// Clip one candidate against every feature whose envelope it touches
///
/// A feature containing the whole cell yields the cell rectangle itself;
/// only partially covered cells go through the overlay. Pieces whose area
/// does not exceed `min_area` are boundary contact only and are dropped. A
/// cell cut into several disjoint parts by a concave boundary stays one
/// multi-part piece. No piece extends past the candidate rectangle.
pub fn clip_candidate<S: Shape>(
    region: &Region<S>,
    candidate: &Candidate,
    min_area: f64,
    mode: ClipMode,
) -> Vec<Piece<S>> {
    let cell = S::from_rect(candidate.rect);
    let cell_area = cell.area();

    let pieces: Vec<Piece<S>> = region
        .features()
        .iter()
        .filter(|feature| {
            feature
                .geometry
                .bounds()
                .is_some_and(|envelope| envelope.intersects(&candidate.rect))
        })
        .filter_map(|feature| {
            let (geometry, area) = if feature.geometry.contains(&cell) {
                (cell.clone(), cell_area)
            } else {
                let clipped = feature.geometry.clip_to_rect(candidate.rect);
                let area = clipped.area();
                (clipped, area)
            };
            (area > min_area).then(|| Piece {
                features: vec![feature.index],
                geometry,
                area,
            })
        })
        .collect();

    match mode {
        ClipMode::PerFeature => pieces,
        ClipMode::Dissolve => dissolve(pieces, candidate.rect, min_area),
    }
}

fn dissolve<S: Shape>(mut pieces: Vec<Piece<S>>, rect: Rect<f64>, min_area: f64) -> Vec<Piece<S>> {
    if pieces.len() <= 1 {
        return pieces;
    }
    pieces.sort_by_key(|piece| piece.features.first().copied());
    let features = pieces
        .iter()
        .flat_map(|piece| piece.features.iter().copied())
        .collect();
    let parts: Vec<S> = pieces.into_iter().map(|piece| piece.geometry).collect();
    let geometry = S::union_all(&parts).clip_to_rect(rect);
    let area = geometry.area();
    if area > min_area {
        vec![Piece {
            features,
            geometry,
            area,
        }]
    } else {
        Vec::new()
    }
}
