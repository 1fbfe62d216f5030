//! Map projection mathematics

/// UTM forward and inverse projection on the WGS84 ellipsoid
pub mod transverse_mercator;
/// Spherical Mercator of web map tiles
pub mod web_mercator;
