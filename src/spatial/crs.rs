//! Coordinate reference systems and transformations between them
//!
//! Only the systems the grid pipeline can both measure and transform are
//! accepted: geographic WGS84 for boundary files and imagery task lists, UTM
//! zones as working projections, and web Mercator. Any other code is refused
//! rather than gridded in units the pipeline cannot verify.

use crate::io::error::{FishnetError, Result, invalid_parameter, invalid_region};
use crate::math::transverse_mercator::{TransverseMercator, utm_zone};
use crate::math::web_mercator;
use geo::{Coord, CoordsIter, MapCoords, MultiPolygon};
use std::fmt;

const WGS84_CODE: u32 = 4326;
const WEB_MERCATOR_CODE: u32 = 3857;
const UTM_NORTH_BASE: u32 = 32600;
const UTM_SOUTH_BASE: u32 = 32700;

/// A coordinate reference system known to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// WGS84 longitude/latitude in degrees (EPSG:4326, OGC CRS84)
    Geographic,
    /// WGS84 UTM zone in meters (EPSG:326xx north, EPSG:327xx south)
    Utm {
        /// Zone number (1-60)
        zone: u8,
        /// Northern hemisphere zone
        north: bool,
    },
    /// WGS84 spherical web Mercator in meters (EPSG:3857)
    WebMercator,
}

impl Crs {
    /// Parse `EPSG:n`, a bare code, an OGC URN or `CRS84`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the text carries no numeric code, and
    /// `InvalidRegion` if the code is not a supported system
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let upper = trimmed.to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Ok(Self::Geographic);
        }

        let code_text = upper.rsplit(':').next().unwrap_or_default();
        let code: u32 = code_text.parse().ok().ok_or_else(|| {
            invalid_parameter("crs", &trimmed, &"expected EPSG:<code> or an OGC URN")
        })?;
        Self::from_epsg(code)
    }

    /// Build from an EPSG code
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` for any code other than WGS84, a WGS84 UTM
    /// zone or web Mercator, since its units cannot be verified
    pub fn from_epsg(code: u32) -> Result<Self> {
        match code {
            WGS84_CODE => Ok(Self::Geographic),
            WEB_MERCATOR_CODE => Ok(Self::WebMercator),
            c if (UTM_NORTH_BASE + 1..=UTM_NORTH_BASE + 60).contains(&c) => Ok(Self::Utm {
                zone: (c - UTM_NORTH_BASE) as u8,
                north: true,
            }),
            c if (UTM_SOUTH_BASE + 1..=UTM_SOUTH_BASE + 60).contains(&c) => Ok(Self::Utm {
                zone: (c - UTM_SOUTH_BASE) as u8,
                north: false,
            }),
            other => Err(invalid_region(&format!(
                "EPSG:{other} is not supported; use EPSG:4326, a WGS84 UTM zone \
                 (EPSG:326xx or 327xx) or EPSG:3857"
            ))),
        }
    }

    /// UTM zone containing a geographic position
    pub fn local_utm(lon_deg: f64, lat_deg: f64) -> Self {
        Self::Utm {
            zone: utm_zone(lon_deg),
            north: lat_deg >= 0.0,
        }
    }

    /// EPSG code of this system
    pub const fn epsg(&self) -> u32 {
        match *self {
            Self::Geographic => WGS84_CODE,
            Self::Utm { zone, north: true } => UTM_NORTH_BASE + zone as u32,
            Self::Utm { zone, north: false } => UTM_SOUTH_BASE + zone as u32,
            Self::WebMercator => WEB_MERCATOR_CODE,
        }
    }

    /// Whether coordinates are in linear (distance) units
    pub const fn is_linear(&self) -> bool {
        !matches!(self, Self::Geographic)
    }

    /// OGC URN used in the legacy GeoJSON `crs` member
    pub fn urn(&self) -> String {
        match self {
            Self::Geographic => "urn:ogc:def:crs:OGC:1.3:CRS84".to_string(),
            other => format!("urn:ogc:def:crs:EPSG::{}", other.epsg()),
        }
    }

    fn projection(&self) -> Option<Projection> {
        match *self {
            Self::Geographic => None,
            Self::Utm { zone, north } => Some(Projection::Utm(TransverseMercator::utm(zone, north))),
            Self::WebMercator => Some(Projection::WebMercator),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[derive(Debug, Clone)]
enum Projection {
    Utm(TransverseMercator),
    WebMercator,
}

impl Projection {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Self::Utm(tm) => tm.forward(lon, lat),
            Self::WebMercator => web_mercator::forward(lon, lat),
        }
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Self::Utm(tm) => tm.inverse(x, y),
            Self::WebMercator => web_mercator::inverse(x, y),
        }
    }
}

#[derive(Debug, Clone)]
enum Stage {
    Identity,
    Forward(Projection),
    Inverse(Projection),
    Through(Projection, Projection),
}

/// A resolved transformation between two reference systems
#[derive(Debug, Clone)]
pub struct Transform {
    from: Crs,
    to: Crs,
    stage: Stage,
}

impl Transform {
    /// Resolve the transformation from one system to another
    ///
    /// # Errors
    ///
    /// Returns a projection error if neither side has a projection, which
    /// cannot happen for two distinct supported systems
    pub fn new(from: Crs, to: Crs) -> Result<Self> {
        let stage = if from == to {
            Stage::Identity
        } else {
            match (from, to) {
                (Crs::Geographic, target) => Stage::Forward(Self::projection_of(from, target)?),
                (source, Crs::Geographic) => Stage::Inverse(Self::projection_of(source, to)?),
                (source, target) => {
                    let inverse = Self::projection_of(source, target)?;
                    let forward = Self::projection_of(target, source)?;
                    Stage::Through(inverse, forward)
                }
            }
        };
        Ok(Self { from, to, stage })
    }

    fn projection_of(side: Crs, other: Crs) -> Result<Projection> {
        let target = if side == Crs::Geographic { other } else { side };
        target.projection().ok_or_else(|| FishnetError::Projection {
            from: side.to_string(),
            to: other.to_string(),
            reason: format!("{target} has no projection from geographic coordinates"),
        })
    }

    /// Whether the transform leaves coordinates unchanged
    pub const fn is_identity(&self) -> bool {
        matches!(self.stage, Stage::Identity)
    }

    /// Source system
    pub const fn source(&self) -> Crs {
        self.from
    }

    /// Target system
    pub const fn target(&self) -> Crs {
        self.to
    }

    fn apply_coord(&self, c: Coord<f64>) -> Coord<f64> {
        let (x, y) = match &self.stage {
            Stage::Identity => (c.x, c.y),
            Stage::Forward(tm) => tm.forward(c.x, c.y),
            Stage::Inverse(tm) => tm.inverse(c.x, c.y),
            Stage::Through(inverse, forward) => {
                let (lon, lat) = inverse.inverse(c.x, c.y);
                forward.forward(lon, lat)
            }
        };
        Coord { x, y }
    }

    /// Transform a single position
    ///
    /// # Errors
    ///
    /// Returns a projection error if the result is not finite
    pub fn point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let out = self.apply_coord(Coord { x, y });
        if out.x.is_finite() && out.y.is_finite() {
            Ok((out.x, out.y))
        } else {
            Err(self.domain_error(x, y))
        }
    }

    /// Transform every vertex of a multi-polygon
    ///
    /// # Errors
    ///
    /// Returns a projection error if any vertex falls outside the domain
    pub fn apply(&self, geometry: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        if self.is_identity() {
            return Ok(geometry.clone());
        }
        let projected = geometry.map_coords(|c| self.apply_coord(c));
        let bad = geometry
            .coords_iter()
            .zip(projected.coords_iter())
            .find(|(_, out)| !(out.x.is_finite() && out.y.is_finite()));
        match bad {
            Some((input, _)) => Err(self.domain_error(input.x, input.y)),
            None => Ok(projected),
        }
    }

    fn domain_error(&self, x: f64, y: f64) -> FishnetError {
        FishnetError::Projection {
            from: self.from.to_string(),
            to: self.to.to_string(),
            reason: format!("position ({x}, {y}) is outside the projection domain"),
        }
    }
}
