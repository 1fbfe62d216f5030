//! Region of interest: boundary features, validation and reprojection

use crate::io::error::{Result, invalid_region};
use crate::spatial::crs::{Crs, Transform};
use crate::spatial::shape::Shape;
use geo::{MultiPolygon, Rect};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// One boundary feature of a region with its source attributes
#[derive(Debug, Clone)]
pub struct RegionFeature<S = MultiPolygon<f64>> {
    /// Position of the feature in the source collection
    pub index: usize,
    /// Attributes carried from the source feature
    pub properties: Map<String, Value>,
    /// Feature geometry in the region's reference system
    pub geometry: S,
}

impl<S> RegionFeature<S> {
    /// Feature with no attributes
    pub fn new(index: usize, geometry: S) -> Self {
        Self {
            index,
            properties: Map::new(),
            geometry,
        }
    }
}

/// Immutable area of interest made of one or more boundary features
///
/// Features are kept separate so clipping can attribute pieces to the
/// feature they came from; the union is computed on demand.
#[derive(Debug, Clone)]
pub struct Region<S = MultiPolygon<f64>> {
    features: Vec<RegionFeature<S>>,
    crs: Crs,
}

impl<S: Shape> Region<S> {
    /// Create a region from features without validating them
    pub const fn new(features: Vec<RegionFeature<S>>, crs: Crs) -> Self {
        Self { features, crs }
    }

    /// Region made of a single unattributed feature
    pub fn from_shape(shape: S, crs: Crs) -> Self {
        Self::new(vec![RegionFeature::new(0, shape)], crs)
    }

    /// Boundary features in source order
    pub fn features(&self) -> &[RegionFeature<S>] {
        &self.features
    }

    /// Reference system of all feature coordinates
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// Bounding box of all features
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|feature| feature.geometry.bounds())
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }

    /// Sum of feature areas in squared CRS units
    pub fn area(&self) -> f64 {
        self.features
            .iter()
            .map(|feature| feature.geometry.area())
            .sum()
    }

    /// Single geometry covering every feature
    pub fn union(&self) -> S {
        let parts: Vec<S> = self
            .features
            .iter()
            .map(|feature| feature.geometry.clone())
            .collect();
        S::union_all(&parts)
    }

    /// Check the region is non-empty, finite, valid and has positive area
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` describing the first failed check
    pub fn check(&self) -> Result<()> {
        if self.features.iter().all(|feature| feature.geometry.is_empty()) {
            return Err(invalid_region(&"region has no polygonal geometry"));
        }
        for feature in &self.features {
            if !feature.geometry.is_finite() {
                return Err(invalid_region(&format!(
                    "feature {} has non-finite coordinates",
                    feature.index
                )));
            }
            if !feature.geometry.is_empty() && !feature.geometry.is_valid() {
                return Err(invalid_region(&format!(
                    "feature {} is not a valid polygon (self-intersection or bad ring); \
                     enable repair to resolve it explicitly",
                    feature.index
                )));
            }
        }
        let area = self.area();
        if !(area.is_finite() && area > 0.0) {
            return Err(invalid_region(&format!("region area is {area}")));
        }
        Ok(())
    }

    /// Require linear coordinate units for gridding
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` if the region is in a geographic system
    pub fn require_linear(&self) -> Result<()> {
        if self.crs.is_linear() {
            Ok(())
        } else {
            Err(invalid_region(&format!(
                "region is in {} (degrees); reproject to a linear-unit system first",
                self.crs
            )))
        }
    }

    /// Drop empty features, optionally repair invalid ones, then check
    ///
    /// Repair replaces an invalid feature with the union of its own parts,
    /// which resolves self-intersections. Every repair is logged with the
    /// area before and after so a changed extent never goes unnoticed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` if the region fails [`Region::check`] after
    /// the optional repair
    pub fn validated(self, repair: bool) -> Result<Self> {
        let total = self.features.len();
        let mut features: Vec<RegionFeature<S>> = self
            .features
            .into_iter()
            .filter(|feature| !feature.geometry.is_empty())
            .collect();
        if features.len() < total {
            debug!(dropped = total - features.len(), "dropped empty features");
        }

        if repair {
            for feature in &mut features {
                if feature.geometry.is_finite() && !feature.geometry.is_valid() {
                    let before = feature.geometry.area();
                    feature.geometry = feature.geometry.repaired();
                    warn!(
                        feature = feature.index,
                        area_before = before,
                        area_after = feature.geometry.area(),
                        "repaired invalid feature geometry"
                    );
                }
            }
        }

        let region = Self::new(features, self.crs);
        region.check()?;
        Ok(region)
    }
}

impl Region<MultiPolygon<f64>> {
    /// Transform every feature into another reference system
    ///
    /// # Errors
    ///
    /// Returns a projection error if the systems cannot be related or a
    /// vertex falls outside the projection domain
    pub fn reprojected(&self, target: Crs) -> Result<Self> {
        let transform = Transform::new(self.crs, target)?;
        let features = self
            .features
            .iter()
            .map(|feature| {
                Ok(RegionFeature {
                    index: feature.index,
                    properties: feature.properties.clone(),
                    geometry: transform.apply(&feature.geometry)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(features, target))
    }

    /// Working system to grid in when none is configured
    ///
    /// Projected regions are gridded in their own system; geographic regions
    /// use the UTM zone of their bounding-box centre.
    pub fn suggested_working_crs(&self) -> Crs {
        match (self.crs, self.bounds()) {
            (Crs::Geographic, Some(bounds)) => {
                let centre = bounds.center();
                Crs::local_utm(centre.x, centre.y)
            }
            (crs, _) => crs,
        }
    }
}
