//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use fishnet::FishnetError;
    use fishnet::io::error::{
        Result, WithPath, computation_error, invalid_parameter, invalid_region,
    };
    use std::error::Error;
    use std::path::{Path, PathBuf};

    // Tests error source chaining works correctly
    // Verified by breaking source chain
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = FishnetError::FileSystem {
            path: "/tmp/region.geojson".into(),
            operation: "read",
            source: io_error,
        };

        assert!(error.source().is_some());
        assert!(invalid_region(&"empty").source().is_none());
    }

    // Tests InvalidParameter error contains all fields
    // Verified by omitting value from message
    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("cell_size", &-1.0, &"must be positive");

        let message = error.to_string();
        assert!(message.contains("cell_size"));
        assert!(message.contains("-1"));
        assert!(message.contains("must be positive"));
    }

    // Tests region and computation helpers keep their reasons
    // Verified by dropping the reason from the message
    #[test]
    fn test_helper_messages() {
        let region = invalid_region(&"region area is 0");
        assert!(matches!(region, FishnetError::InvalidRegion { .. }));
        assert!(region.to_string().contains("region area is 0"));

        let computation = computation_error("cell area", &"NaN");
        assert!(computation.to_string().contains("cell area"));
        assert!(computation.to_string().contains("NaN"));
    }

    // Tests projection errors name both systems
    // Verified by omitting the target system
    #[test]
    fn test_projection_error() {
        let error = FishnetError::Projection {
            from: "EPSG:4326".to_string(),
            to: "EPSG:3857".to_string(),
            reason: "unsupported".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("EPSG:4326"));
        assert!(message.contains("EPSG:3857"));
    }

    // Tests file context replaces the unknown path of converted errors
    // Verified by keeping the placeholder path
    #[test]
    fn test_with_path_attaches_context() {
        let failing: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let result: Result<()> = failing.with_path(Path::new("out/grid.geojson"), "write file");

        match result {
            Err(FishnetError::FileSystem {
                path, operation, ..
            }) => {
                assert_eq!(path, PathBuf::from("out/grid.geojson"));
                assert_eq!(operation, "write file");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    // Tests GeoJSON parse failures become region load errors with a path
    // Verified by converting them into file system errors
    #[test]
    fn test_geojson_error_conversion() {
        let parsed: std::result::Result<geojson::GeoJson, geojson::Error> = "{".parse();
        let result = parsed.with_path(Path::new("bad.geojson"), "parse region");

        match result {
            Err(error @ FishnetError::RegionLoad { .. }) => {
                assert!(error.to_string().contains("bad.geojson"));
                assert!(error.source().is_some());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    // Tests non-file errors pass through path context unchanged
    // Verified by wrapping every error as a file system error
    #[test]
    fn test_with_path_preserves_other_errors() {
        let failing: Result<()> = Err(invalid_region(&"no features"));
        let result = failing.with_path(Path::new("x.geojson"), "read region");

        assert!(matches!(result, Err(FishnetError::InvalidRegion { .. })));
    }
}
