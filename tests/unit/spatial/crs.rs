//! Tests for reference system parsing and coordinate transforms

#[cfg(test)]
mod tests {
    use fishnet::FishnetError;
    use fishnet::spatial::crs::{Crs, Transform};
    use geo::{MultiPolygon, Rect, polygon};

    const UTM_43N: Crs = Crs::Utm {
        zone: 43,
        north: true,
    };

    // Tests the accepted spellings of reference systems
    // Verified by requiring the EPSG prefix
    #[test]
    fn test_parse_spellings() {
        assert_eq!(Crs::parse("EPSG:4326").unwrap(), Crs::Geographic);
        assert_eq!(Crs::parse("epsg:32643").unwrap(), UTM_43N);
        assert_eq!(Crs::parse("32643").unwrap(), UTM_43N);
        assert_eq!(Crs::parse("urn:ogc:def:crs:EPSG::32643").unwrap(), UTM_43N);
        assert_eq!(
            Crs::parse("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(),
            Crs::Geographic
        );
        assert_eq!(
            Crs::parse(" EPSG:32743 ").unwrap(),
            Crs::Utm {
                zone: 43,
                north: false
            }
        );
        assert_eq!(Crs::parse("EPSG:3857").unwrap(), Crs::WebMercator);
    }

    // Tests malformed system names are rejected as parameters
    // Verified by defaulting unparsable names to WGS84
    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["wgs84", "", "EPSG:"] {
            assert!(matches!(
                Crs::parse(text),
                Err(FishnetError::InvalidParameter { parameter: "crs", .. })
            ));
        }
    }

    // Tests codes outside the supported systems are refused whatever their units
    // Verified by treating unknown codes as linear projected systems
    #[test]
    fn test_unknown_codes_rejected() {
        // CGCS2000 and NAD83 are geographic; 27700 is projected but not transformable
        for text in ["EPSG:4490", "urn:ogc:def:crs:EPSG::4269", "EPSG:27700", "EPSG:0", "32661"] {
            assert!(matches!(
                Crs::parse(text),
                Err(FishnetError::InvalidRegion { .. })
            ));
        }
    }

    // Tests EPSG codes, units and URNs of each kind of system
    // Verified by swapping the north and south code bases
    #[test]
    fn test_codes_and_units() {
        assert_eq!(UTM_43N.epsg(), 32643);
        assert_eq!(Crs::local_utm(72.6, -23.0).epsg(), 32743);
        assert_eq!(Crs::local_utm(72.6, 23.0), UTM_43N);
        assert!(UTM_43N.is_linear());
        assert!(!Crs::Geographic.is_linear());
        assert_eq!(UTM_43N.to_string(), "EPSG:32643");
        assert_eq!(UTM_43N.urn(), "urn:ogc:def:crs:EPSG::32643");
        assert_eq!(Crs::Geographic.urn(), "urn:ogc:def:crs:OGC:1.3:CRS84");
        assert_eq!(Crs::parse(&UTM_43N.urn()).unwrap(), UTM_43N);
    }

    // Tests identical systems produce an identity transform
    // Verified by projecting through geographic coordinates anyway
    #[test]
    fn test_identity_transform() {
        let transform = Transform::new(UTM_43N, UTM_43N).unwrap();
        assert!(transform.is_identity());
        assert_eq!(transform.point(1.5, 2.5).unwrap(), (1.5, 2.5));
        assert_eq!(transform.source(), UTM_43N);
        assert_eq!(transform.target(), UTM_43N);
    }

    // Tests geographic to UTM and back restores the input
    // Verified by applying the forward projection twice
    #[test]
    fn test_geographic_round_trip() {
        let forward = Transform::new(Crs::Geographic, UTM_43N).unwrap();
        let inverse = Transform::new(UTM_43N, Crs::Geographic).unwrap();

        let (easting, northing) = forward.point(75.0, 0.0).unwrap();
        assert!((easting - 500_000.0).abs() < 1e-6);
        assert!(northing.abs() < 1e-6);

        let (x, y) = forward.point(71.25, 23.1).unwrap();
        let (lon, lat) = inverse.point(x, y).unwrap();
        assert!((lon - 71.25).abs() < 1e-8);
        assert!((lat - 23.1).abs() < 1e-8);
    }

    // Tests zone-to-zone transforms pass through geographic coordinates
    // Verified by copying coordinates between zones unchanged
    #[test]
    fn test_zone_to_zone() {
        let to_42 = Transform::new(
            UTM_43N,
            Crs::Utm {
                zone: 42,
                north: true,
            },
        )
        .unwrap();
        let (easting, _) = to_42.point(500_000.0, 2_500_000.0).unwrap();

        // 75E lies 6 degrees east of zone 42's central meridian
        assert!(easting > 1_000_000.0);
    }

    // Tests web Mercator inputs reach UTM through geographic coordinates
    // Verified by copying web Mercator meters into the UTM zone unchanged
    #[test]
    fn test_web_mercator_to_utm() {
        let to_geographic = Transform::new(Crs::WebMercator, Crs::Geographic).unwrap();
        let (lon, lat) = to_geographic.point(0.0, 0.0).unwrap();
        assert!(lon.abs() < 1e-12 && lat.abs() < 1e-12);

        let from_geographic = Transform::new(Crs::Geographic, Crs::WebMercator).unwrap();
        let (x, y) = from_geographic.point(75.0, 23.0).unwrap();
        let to_utm = Transform::new(Crs::WebMercator, UTM_43N).unwrap();
        let (easting, _) = to_utm.point(x, y).unwrap();
        assert!((easting - 500_000.0).abs() < 1e-3);
        assert_eq!(Crs::WebMercator.epsg(), 3857);
        assert!(Crs::WebMercator.is_linear());
    }

    // Tests non-finite output is reported with the offending position
    // Verified by returning NaN coordinates silently
    #[test]
    fn test_non_finite_output_rejected() {
        let forward = Transform::new(Crs::Geographic, UTM_43N).unwrap();
        assert!(forward.point(f64::NAN, 10.0).is_err());

        let broken = MultiPolygon::new(vec![polygon![
            (x: f64::NAN, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
        ]]);
        assert!(matches!(
            forward.apply(&broken),
            Err(FishnetError::Projection { .. })
        ));
    }

    // Tests whole geometries are transformed vertex by vertex
    // Verified by transforming only exterior rings
    #[test]
    fn test_apply_to_geometry() {
        let forward = Transform::new(Crs::Geographic, UTM_43N).unwrap();
        let cell = MultiPolygon::new(vec![
            Rect::new((74.9, 22.0), (75.1, 22.2)).to_polygon(),
        ]);
        let projected = forward.apply(&cell).unwrap();

        let bounds = geo::BoundingRect::bounding_rect(&projected).unwrap();
        assert!(bounds.min().x < 500_000.0 && bounds.max().x > 500_000.0);
        assert!(bounds.min().y > 2_400_000.0 && bounds.max().y < 2_500_000.0);
    }
}
