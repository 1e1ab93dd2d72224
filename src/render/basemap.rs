//! GeoJSON land polygons for the static scatters.

use std::fs;
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};

/// A closed ring of `(lon, lat)` pairs.
pub type Ring = Vec<(f64, f64)>;

/// A polygon: exterior ring first, holes after.
pub type Polygon = Vec<Ring>;

/// Country or land outlines, loaded from a GeoJSON `FeatureCollection`.
///
/// Only `Polygon` and `MultiPolygon` geometries are kept; other geometry
/// types are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basemap {
    features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq)]
struct Feature {
    properties: serde_json::Map<String, Value>,
    polygons: Vec<Polygon>,
}

impl Basemap {
    /// Load a basemap from a GeoJSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_geojson(&content)
    }

    /// Parse a GeoJSON `FeatureCollection`.
    pub fn from_geojson(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let features = root
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Render("basemap is not a GeoJSON FeatureCollection".into()))?;

        let mut parsed = Vec::with_capacity(features.len());
        for feature in features {
            let properties = feature
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            let polygons = match feature.get("geometry") {
                Some(geometry) => parse_geometry(geometry)?,
                None => Vec::new(),
            };
            if !polygons.is_empty() {
                parsed.push(Feature {
                    properties,
                    polygons,
                });
            }
        }

        debug!("Loaded basemap with {} features", parsed.len());
        Ok(Self { features: parsed })
    }

    /// Keep only features whose property `key` equals `value`.
    pub fn filter(&self, key: &str, value: &str) -> Self {
        let features = self
            .features
            .iter()
            .filter(|f| f.properties.get(key).and_then(Value::as_str) == Some(value))
            .cloned()
            .collect();
        Self { features }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if the basemap has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over every polygon.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.features.iter().flat_map(|f| f.polygons.iter())
    }
}

fn parse_geometry(geometry: &Value) -> Result<Vec<Polygon>> {
    let coordinates = geometry.get("coordinates");
    match (geometry.get("type").and_then(Value::as_str), coordinates) {
        (Some("Polygon"), Some(coords)) => Ok(vec![parse_polygon(coords)?]),
        (Some("MultiPolygon"), Some(coords)) => coords
            .as_array()
            .ok_or_else(|| invalid("MultiPolygon coordinates"))?
            .iter()
            .map(parse_polygon)
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn parse_polygon(value: &Value) -> Result<Polygon> {
    value
        .as_array()
        .ok_or_else(|| invalid("polygon"))?
        .iter()
        .map(|ring| -> Result<Ring> {
            ring.as_array()
                .ok_or_else(|| invalid("ring"))?
                .iter()
                .map(parse_position)
                .collect()
        })
        .collect()
}

fn parse_position(value: &Value) -> Result<(f64, f64)> {
    let pair = value.as_array().ok_or_else(|| invalid("position"))?;
    match (
        pair.first().and_then(Value::as_f64),
        pair.get(1).and_then(Value::as_f64),
    ) {
        (Some(lon), Some(lat)) => Ok((lon, lat)),
        _ => Err(invalid("position")),
    }
}

fn invalid(what: &str) -> Error {
    Error::Render(format!("invalid basemap {}", what))
}
