//! Minimal geometry capability interface used by the grid algorithm
//!
//! The lattice scan, coarse filter and precise clip only ever ask a handful of
//! questions of a geometry. Keeping them behind [`Shape`] lets the algorithm
//! stay independent of the geometry library that answers them.

use geo::{
    Area, BooleanOps, BoundingRect, Contains, Coord, Intersects, MapCoords, MultiPolygon, Polygon,
    Rect, Validation, unary_union,
};

/// Geometry operations required by the materializer
pub trait Shape: Clone + Send + Sync + Sized {
    /// Shape covering exactly an axis-aligned rectangle
    fn from_rect(rect: Rect<f64>) -> Self;

    /// Unsigned planar area in squared coordinate units
    fn area(&self) -> f64;

    /// Axis-aligned bounding box, `None` when empty
    fn bounds(&self) -> Option<Rect<f64>>;

    /// Whether the shape has no parts
    fn is_empty(&self) -> bool;

    /// Boolean intersection test, true for boundary contact
    fn intersects(&self, other: &Self) -> bool;

    /// Whether `other` lies inside this shape, boundary contact allowed
    fn contains(&self, other: &Self) -> bool;

    /// Exact overlay intersection
    fn intersection(&self, other: &Self) -> Self;

    /// Part of the shape inside `rect`, with no coordinate outside it
    fn clip_to_rect(&self, rect: Rect<f64>) -> Self;

    /// Whether the shape is topologically valid
    fn is_valid(&self) -> bool;

    /// Union of many shapes into one
    fn union_all(parts: &[Self]) -> Self;

    /// Valid shape covering the same filled area, resolving self-intersections
    fn repaired(&self) -> Self;

    /// Whether every coordinate is finite
    fn is_finite(&self) -> bool;
}

impl Shape for MultiPolygon<f64> {
    fn from_rect(rect: Rect<f64>) -> Self {
        Self::new(vec![rect.to_polygon()])
    }

    fn area(&self) -> f64 {
        self.unsigned_area()
    }

    fn bounds(&self) -> Option<Rect<f64>> {
        self.bounding_rect()
    }

    fn is_empty(&self) -> bool {
        self.0.iter().all(|polygon| polygon.exterior().0.is_empty())
    }

    fn intersects(&self, other: &Self) -> bool {
        let (Some(a), Some(b)) = (self.bounding_rect(), other.bounding_rect()) else {
            return false;
        };
        if !a.intersects(&b) {
            return false;
        }
        // Per-part envelope pruning before the exact test
        self.0.iter().any(|part| {
            part.bounding_rect().is_some_and(|envelope| envelope.intersects(&b))
                && other.0.iter().any(|candidate| polygons_intersect(part, candidate))
        })
    }

    fn contains(&self, other: &Self) -> bool {
        !other.0.is_empty()
            && other
                .0
                .iter()
                .all(|inner| self.0.iter().any(|part| part.contains(inner)))
    }

    fn intersection(&self, other: &Self) -> Self {
        BooleanOps::intersection(self, other)
    }

    fn clip_to_rect(&self, rect: Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        // The overlay rounds to its own precision grid; pull vertices back inside
        BooleanOps::intersection(self, &Self::from_rect(rect)).map_coords(|c| Coord {
            x: c.x.clamp(min.x, max.x),
            y: c.y.clamp(min.y, max.y),
        })
    }

    fn is_valid(&self) -> bool {
        Validation::is_valid(self)
    }

    fn union_all(parts: &[Self]) -> Self {
        unary_union(parts.iter())
    }

    fn repaired(&self) -> Self {
        unary_union(self.0.iter())
    }

    fn is_finite(&self) -> bool {
        self.0.iter().all(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .all(|ring| ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite()))
        })
    }
}

fn polygons_intersect(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    match (a.bounding_rect(), b.bounding_rect()) {
        (Some(ra), Some(rb)) => ra.intersects(&rb) && a.intersects(b),
        _ => false,
    }
}
