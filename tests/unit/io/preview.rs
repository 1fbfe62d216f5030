//! Tests for coverage preview rendering and export

#[cfg(test)]
mod tests {
    use fishnet::FishnetError;
    use fishnet::algorithm::materializer::{GridConfig, materialize};
    use fishnet::io::preview::{export_preview, render_coverage};
    use fishnet::spatial::{Crs, Region};
    use geo::{MultiPolygon, Rect};
    use ndarray::{Array2, array};

    // Tests the south row of the raster lands at the bottom of the image
    // Verified by writing raster rows top to bottom
    #[test]
    fn test_render_is_north_up() {
        let coverage = array![[1.0], [0.0]];
        let img = render_coverage(&coverage).unwrap();

        assert_eq!(img.dimensions(), (1, 2));
        assert_eq!(img.get_pixel(0, 1).0[3], 255);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    // Tests slivers stay visible and partial cells are translucent
    // Verified by rounding tiny fractions to transparent
    #[test]
    fn test_alpha_follows_fraction() {
        let coverage = array![[1e-6, 0.5]];
        let img = render_coverage(&coverage).unwrap();

        assert_eq!(img.get_pixel(0, 0).0[3], 1);
        assert_eq!(img.get_pixel(1, 0).0[3], 128);
    }

    // Tests empty rasters are rejected
    // Verified by creating a zero-sized image
    #[test]
    fn test_empty_raster_rejected() {
        let result = render_coverage(&Array2::zeros((0, 3)));
        assert!(matches!(result, Err(FishnetError::InvalidParameter { .. })));
    }

    // Tests the preview is written as a PNG with one pixel per candidate
    // Verified by encoding straight into the final path
    #[test]
    fn test_export_preview_writes_png() {
        let region = Region::from_shape(
            MultiPolygon::new(vec![
                Rect::new((0.0, 0.0), (3000.0, 2000.0)).to_polygon(),
            ]),
            Crs::Utm {
                zone: 43,
                north: true,
            },
        );
        let fishnet = materialize(&region, GridConfig::new(1000.0)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preview.png");

        export_preview(&fishnet, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert!(!path.with_extension("png.partial").exists());
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }
}
