//! Tests for the coarse intersects filter and its scan-order mask

#[cfg(test)]
mod tests {
    use fishnet::algorithm::filter::{candidate_survives, coarse_filter};
    use fishnet::algorithm::lattice::{Lattice, OriginAlignment};
    use fishnet::algorithm::observer::{Phase, ProgressObserver, Silent};
    use geo::{MultiPolygon, Rect, polygon};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn triangle() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 3000.0, y: 0.0),
            (x: 0.0, y: 3000.0),
        ]])
    }

    fn triangle_lattice() -> Lattice {
        Lattice::covering(
            Rect::new((0.0, 0.0), (3000.0, 3000.0)),
            1000.0,
            OriginAlignment::BoundingBox,
        )
        .unwrap()
    }

    #[derive(Default)]
    struct Counter {
        units: AtomicUsize,
    }

    impl ProgressObserver for Counter {
        fn advance(&self, phase: Phase, units: usize) {
            assert_eq!(phase, Phase::Filter);
            self.units.fetch_add(units, Ordering::Relaxed);
        }
    }

    // Tests boxes sharing only an edge with the union still survive
    // Verified by requiring positive overlap area
    #[test]
    fn test_boundary_contact_survives() {
        let square = MultiPolygon::new(vec![
            Rect::new((0.0, 0.0), (1000.0, 1000.0)).to_polygon(),
        ]);

        assert!(candidate_survives(
            &square,
            Rect::new((1000.0, 0.0), (2000.0, 1000.0))
        ));
        assert!(candidate_survives(
            &square,
            Rect::new((250.0, 250.0), (750.0, 750.0))
        ));
        assert!(!candidate_survives(
            &square,
            Rect::new((1500.0, 0.0), (2500.0, 1000.0))
        ));
    }

    // Tests the mask marks exactly the candidates touching the triangle
    // Verified by reversing column order when assembling the mask
    #[test]
    fn test_mask_follows_scan_order() {
        let lattice = triangle_lattice();
        let mask = coarse_filter(&triangle(), &lattice, false, &Silent);

        assert_eq!(mask.len(), lattice.len());
        // Only the north-east corner lies entirely beyond the hypotenuse
        let corner = lattice.index_of(2, 2).unwrap();
        for candidate in lattice.candidates() {
            assert_eq!(mask[candidate.index], candidate.index != corner);
        }
    }

    // Tests parallel evaluation yields the same mask as sequential
    // Verified by collecting parallel columns without preserving order
    #[test]
    fn test_parallel_matches_sequential() {
        let lattice = Lattice::covering(
            Rect::new((0.0, 0.0), (3000.0, 3000.0)),
            100.0,
            OriginAlignment::BoundingBox,
        )
        .unwrap();

        let sequential = coarse_filter(&triangle(), &lattice, false, &Silent);
        let parallel = coarse_filter(&triangle(), &lattice, true, &Silent);
        assert_eq!(sequential, parallel);
        assert!(sequential.count_ones() < lattice.len());
    }

    // Tests progress advances once per lattice column
    // Verified by advancing once per candidate
    #[test]
    fn test_progress_counts_columns() {
        let lattice = triangle_lattice();
        let counter = Counter::default();

        coarse_filter(&triangle(), &lattice, true, &counter);
        assert_eq!(counter.units.load(Ordering::Relaxed), lattice.columns());
    }
}
