//! Tests for lattice construction, scan order and index mapping

#[cfg(test)]
mod tests {
    use fishnet::FishnetError;
    use fishnet::algorithm::lattice::{Lattice, OriginAlignment, validate_cell_size};
    use geo::Rect;

    fn bounds(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect<f64> {
        Rect::new((x0, y0), (x1, y1))
    }

    // Tests exact multiples of the cell size produce no extra column or row
    // Verified by letting the last cell start at the box maximum
    #[test]
    fn test_exact_multiple_has_no_extra_cells() {
        let lattice = Lattice::covering(
            bounds(0.0, 0.0, 2000.0, 2000.0),
            1000.0,
            OriginAlignment::BoundingBox,
        )
        .unwrap();

        assert_eq!(lattice.columns(), 2);
        assert_eq!(lattice.rows(), 2);
        assert_eq!(lattice.len(), 4);
        assert!(!lattice.is_empty());
        assert!((lattice.cell_area() - 1e6).abs() < 1e-9);
    }

    // Tests partial coverage rounds up to cover the whole box
    // Verified by flooring the column count
    #[test]
    fn test_partial_extent_rounds_up() {
        let lattice = Lattice::covering(
            bounds(0.0, 0.0, 2500.0, 900.0),
            1000.0,
            OriginAlignment::BoundingBox,
        )
        .unwrap();

        assert_eq!(lattice.columns(), 3);
        assert_eq!(lattice.rows(), 1);
        let last = lattice.candidate(lattice.len() - 1).unwrap();
        assert!(last.rect.max().x >= 2500.0);
        assert!(last.rect.max().y >= 900.0);
    }

    // Tests candidates are enumerated x-major with y varying fastest
    // Verified by swapping the division and remainder in the index mapping
    #[test]
    fn test_scan_order_is_x_major() {
        let lattice = Lattice::covering(
            bounds(0.0, 0.0, 2000.0, 3000.0),
            1000.0,
            OriginAlignment::BoundingBox,
        )
        .unwrap();

        let order: Vec<(i64, i64)> = lattice.candidates().map(|c| (c.column, c.row)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
        for (position, candidate) in lattice.candidates().enumerate() {
            assert_eq!(candidate.index, position);
        }
    }

    // Tests neighbouring cells share edges exactly
    // Verified by computing the far edge as origin plus size
    #[test]
    fn test_neighbouring_cells_share_edges() {
        let lattice = Lattice::covering(
            bounds(0.1, 0.2, 10.0, 10.0),
            0.3,
            OriginAlignment::BoundingBox,
        )
        .unwrap();

        for column in 0..5 {
            let left = lattice.cell_rect(column, 0);
            let right = lattice.cell_rect(column + 1, 0);
            assert_eq!(left.max().x.to_bits(), right.min().x.to_bits());
            let above = lattice.cell_rect(column, 1);
            assert_eq!(left.max().y.to_bits(), above.min().y.to_bits());
        }
    }

    // Tests fixed origins produce absolute indices that can be negative
    // Verified by anchoring at the bounding box regardless of alignment
    #[test]
    fn test_fixed_origin_uses_absolute_indices() {
        let lattice = Lattice::covering(
            bounds(1500.0, -500.0, 3500.0, 500.0),
            1000.0,
            OriginAlignment::Fixed { x: 0.0, y: 0.0 },
        )
        .unwrap();

        assert_eq!(lattice.first_column(), 1);
        assert_eq!(lattice.first_row(), -1);
        assert_eq!(lattice.columns(), 3);
        assert_eq!(lattice.rows(), 2);

        let first = lattice.candidate(0).unwrap();
        assert_eq!((first.column, first.row), (1, -1));
        assert!((first.rect.min().x - 1000.0).abs() < 1e-9);
        assert!((first.rect.min().y + 1000.0).abs() < 1e-9);
    }

    // Tests index_of inverts the scan order and rejects outside indices
    // Verified by omitting the bounds check
    #[test]
    fn test_index_of_round_trips_candidates() {
        let lattice = Lattice::covering(
            bounds(1500.0, -500.0, 3500.0, 500.0),
            1000.0,
            OriginAlignment::Fixed { x: 0.0, y: 0.0 },
        )
        .unwrap();

        for candidate in lattice.candidates() {
            assert_eq!(
                lattice.index_of(candidate.column, candidate.row),
                Some(candidate.index)
            );
        }
        assert_eq!(lattice.index_of(0, 0), None);
        assert_eq!(lattice.index_of(4, 0), None);
        assert_eq!(lattice.index_of(1, 1), None);
        assert!(lattice.candidate(lattice.len()).is_none());
    }

    // Tests column iteration yields one column's rows and nothing past the end
    // Verified by iterating rows instead of columns
    #[test]
    fn test_column_iteration() {
        let lattice = Lattice::covering(
            bounds(0.0, 0.0, 3000.0, 2000.0),
            1000.0,
            OriginAlignment::BoundingBox,
        )
        .unwrap();

        let middle: Vec<usize> = lattice.column(1).map(|c| c.index).collect();
        assert_eq!(middle, vec![2, 3]);
        assert!(lattice.column(1).all(|c| c.column == 1));
        assert_eq!(lattice.column(3).count(), 0);
    }

    // Tests a degenerate box still yields one candidate per axis
    // Verified by returning zero columns for zero width
    #[test]
    fn test_degenerate_bounds_yield_one_cell() {
        let lattice = Lattice::covering(
            bounds(5.0, 5.0, 5.0, 5.0),
            1.0,
            OriginAlignment::BoundingBox,
        )
        .unwrap();

        assert_eq!(lattice.len(), 1);
    }

    // Tests non-positive and non-finite cell sizes are rejected
    // Verified by accepting zero as a cell size
    #[test]
    fn test_invalid_cell_size_rejected() {
        for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = validate_cell_size(size);
            assert!(matches!(
                result,
                Err(FishnetError::InvalidParameter {
                    parameter: "cell_size",
                    ..
                })
            ));
            assert!(
                Lattice::covering(
                    bounds(0.0, 0.0, 1.0, 1.0),
                    size,
                    OriginAlignment::BoundingBox
                )
                .is_err()
            );
        }
        assert!(validate_cell_size(0.5).is_ok());
    }

    // Tests oversized lattices are rejected before enumeration
    // Verified by removing the candidate limit
    #[test]
    fn test_oversized_lattice_rejected() {
        let result = Lattice::covering(
            bounds(0.0, 0.0, 1e6, 1e6),
            0.01,
            OriginAlignment::BoundingBox,
        );
        assert!(matches!(
            result,
            Err(FishnetError::InvalidParameter { .. })
        ));
    }

    // Tests spans wider than a 64-bit index range fail instead of overflowing
    // Verified by subtracting the index bounds unchecked
    #[test]
    fn test_index_span_overflow_rejected() {
        let result = Lattice::covering(
            bounds(-5e18, 0.0, 5e18, 1.0),
            1.0,
            OriginAlignment::Fixed { x: 0.0, y: 0.0 },
        );
        assert!(matches!(
            result,
            Err(FishnetError::InvalidParameter {
                parameter: "cell_size",
                ..
            })
        ));

        let lattice = Lattice::covering(
            bounds(0.0, 0.0, 2.0, 2.0),
            1.0,
            OriginAlignment::Fixed { x: -10.0, y: -10.0 },
        )
        .unwrap();
        assert_eq!(lattice.first_column(), 10);
        assert_eq!(lattice.index_of(i64::MIN, 10), None);
        assert_eq!(lattice.index_of(10, i64::MIN), None);
        assert_eq!(lattice.index_of(10, 10), Some(0));
    }

    // Tests non-finite fixed origins are rejected
    // Verified by skipping the origin check
    #[test]
    fn test_non_finite_origin_rejected() {
        let result = Lattice::covering(
            bounds(0.0, 0.0, 10.0, 10.0),
            1.0,
            OriginAlignment::Fixed {
                x: f64::NAN,
                y: 0.0,
            },
        );
        assert!(matches!(
            result,
            Err(FishnetError::InvalidParameter {
                parameter: "origin",
                ..
            })
        ));
    }
}
