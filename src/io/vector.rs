//! GeoJSON region loading and fishnet feature collection export

use crate::algorithm::materializer::{ClippedCell, Fishnet};
use crate::io::configuration::AreaUnit;
use crate::io::error::{FishnetError, Result, WithPath};
use crate::spatial::crs::{Crs, Transform};
use crate::spatial::region::{Region, RegionFeature};
use geo::{MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, feature::Id};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options controlling how a fishnet is serialized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteOptions {
    /// Unit of the `area` property
    pub unit: AreaUnit,
    /// Reference system of written geometries
    pub output_crs: Crs,
    /// Copy source feature attributes onto single-feature cells
    pub carry_properties: bool,
}

/// Load a region from a GeoJSON file
///
/// See [`parse_region`] for how the reference system is chosen.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid GeoJSON
pub fn read_region(path: &Path, fallback_crs: Option<Crs>) -> Result<Region> {
    let text = fs::read_to_string(path).with_path(path, "read region")?;
    parse_region(&text, fallback_crs).with_path(path, "parse region")
}

/// Parse a region from GeoJSON text
///
/// Accepts a feature collection, a single feature or a bare geometry.
/// Polygonal geometries become region features in source order; points and
/// lines carry no area and are skipped. The reference system comes from the
/// legacy `crs` member when present, else `fallback_crs`, else WGS84.
///
/// # Errors
///
/// Returns an error for malformed GeoJSON or an unrecognised `crs` member
pub fn parse_region(text: &str, fallback_crs: Option<Crs>) -> Result<Region> {
    let geojson: GeoJson = text.parse()?;

    let (members, features) = match geojson {
        GeoJson::FeatureCollection(collection) => {
            (collection.foreign_members, collection.features)
        }
        GeoJson::Feature(feature) => (feature.foreign_members.clone(), vec![feature]),
        GeoJson::Geometry(geometry) => {
            let members = geometry.foreign_members.clone();
            let feature = Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            };
            (members, vec![feature])
        }
    };

    let declared = members.as_ref().map(declared_crs).transpose()?.flatten();
    let crs = declared.or(fallback_crs).unwrap_or(Crs::Geographic);

    let mut region_features = Vec::with_capacity(features.len());
    for (index, feature) in features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            debug!(feature = index, "skipping feature without geometry");
            continue;
        };
        let polygons = polygons_of(geo::Geometry::<f64>::try_from(geometry)?);
        if polygons.is_empty() {
            debug!(feature = index, "skipping non-polygonal feature");
            continue;
        }
        region_features.push(RegionFeature {
            index,
            properties: feature.properties.unwrap_or_default(),
            geometry: MultiPolygon::new(polygons),
        });
    }

    Ok(Region::new(region_features, crs))
}

fn declared_crs(members: &JsonObject) -> Result<Option<Crs>> {
    let Some(crs) = members.get("crs") else {
        return Ok(None);
    };
    let name = crs
        .get("properties")
        .and_then(|properties| properties.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| FishnetError::InvalidParameter {
            parameter: "crs",
            value: crs.to_string(),
            reason: "only named crs members are supported".to_string(),
        })?;
    Crs::parse(name).map(Some)
}

fn polygons_of(geometry: geo::Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        geo::Geometry::Polygon(polygon) => vec![polygon],
        geo::Geometry::MultiPolygon(multi) => multi.0,
        geo::Geometry::Rect(rect) => vec![rect.to_polygon()],
        geo::Geometry::Triangle(triangle) => vec![triangle.to_polygon()],
        geo::Geometry::GeometryCollection(collection) => {
            collection.0.into_iter().flat_map(polygons_of).collect()
        }
        _ => Vec::new(),
    }
}

fn crs_member(crs: Crs) -> JsonObject {
    let mut properties = Map::new();
    properties.insert("name".to_string(), Value::from(crs.urn()));
    let mut member = Map::new();
    member.insert("type".to_string(), Value::from("name"));
    member.insert("properties".to_string(), Value::Object(properties));
    let mut members = Map::new();
    members.insert("crs".to_string(), Value::Object(member));
    members
}

fn cell_feature(
    cell: &ClippedCell,
    geometry: &MultiPolygon<f64>,
    region: &Region,
    options: &WriteOptions,
) -> Feature {
    let mut properties = Map::new();
    if options.carry_properties
        && let [source] = cell.features.as_slice()
        && let Some(feature) = region.features().iter().find(|f| f.index == *source)
    {
        properties.extend(feature.properties.clone());
    }
    properties.insert("id".to_string(), Value::from(cell.id));
    properties.insert("area".to_string(), Value::from(cell.area_in(options.unit)));
    properties.insert("area_unit".to_string(), Value::from(options.unit.label()));
    properties.insert("column".to_string(), Value::from(cell.column));
    properties.insert("row".to_string(), Value::from(cell.row));
    properties.insert(
        "features".to_string(),
        Value::from(cell.features.clone()),
    );

    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(geometry))),
        id: Some(Id::Number(cell.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Build the output feature collection, reprojecting geometries if needed
///
/// Areas keep their working-CRS values whatever the output system.
///
/// # Errors
///
/// Returns a projection error if the output system cannot be reached
pub fn feature_collection(
    fishnet: &Fishnet,
    region: &Region,
    options: &WriteOptions,
) -> Result<FeatureCollection> {
    let transform = Transform::new(fishnet.crs, options.output_crs)?;
    let features = fishnet
        .cells
        .iter()
        .map(|cell| {
            let geometry = transform.apply(&cell.geometry)?;
            Ok(cell_feature(cell, &geometry, region, options))
        })
        .collect::<Result<Vec<_>>>()?;

    let foreign_members =
        (options.output_crs != Crs::Geographic).then(|| crs_member(options.output_crs));

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    })
}

/// Write through a temporary sibling file renamed into place on success
///
/// # Errors
///
/// Returns a file system error if the directory, file or rename fails, or
/// whatever `write` returns
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }

    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let result = File::create(&partial)
        .with_path(&partial, "create file")
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush().with_path(&partial, "write file")
        })
        .and_then(|()| fs::rename(&partial, path).with_path(path, "rename file"));

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

/// Serialize a fishnet as a GeoJSON feature collection
///
/// # Errors
///
/// Returns an error if reprojection, serialization or file output fails
pub fn write_fishnet(
    path: &Path,
    fishnet: &Fishnet,
    region: &Region,
    options: &WriteOptions,
) -> Result<()> {
    let collection = feature_collection(fishnet, region, options)?;
    write_atomic(path, |writer| {
        serde_json::to_writer(writer, &collection).map_err(|source| {
            FishnetError::GeometryExport {
                path: path.to_path_buf(),
                source,
            }
        })
    })
}
