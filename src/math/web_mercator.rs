//! Spherical (pseudo) Mercator used by web map tiles, EPSG:3857.
//!
//! Longitude/latitude in degrees on the WGS84 datum are projected onto a
//! sphere of the WGS84 semi-major axis. Distances are only true at the
//! equator; areas grow with `sec²(latitude)`.

use crate::math::transverse_mercator::WGS84_SEMI_MAJOR_AXIS;
use std::f64::consts::FRAC_PI_4;

/// Latitude limit of the square world map in degrees
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Project longitude/latitude in degrees to x/y in meters.
///
/// Latitudes at or beyond the poles give non-finite output.
pub fn forward(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let x = WGS84_SEMI_MAJOR_AXIS * lon_deg.to_radians();
    if lat_deg.abs() >= 90.0 {
        return (x, f64::NAN);
    }
    let y = WGS84_SEMI_MAJOR_AXIS * (FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Unproject x/y in meters to longitude/latitude in degrees.
pub fn inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = x / WGS84_SEMI_MAJOR_AXIS;
    let lat = 2.0 * (y / WGS84_SEMI_MAJOR_AXIS).exp().atan() - 2.0 * FRAC_PI_4;
    (lon.to_degrees(), lat.to_degrees())
}
