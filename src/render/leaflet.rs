//! Interactive Leaflet map with clustered circle markers.

use quick_xml::escape::escape;
use serde::Serialize;

use super::options::DEFAULT_TITLE;
use super::MapRenderer;
use crate::error::Result;
use crate::model::MapPoint;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>__TITLE__</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map', {worldCopyJump: true});
L.tileLayer(__TILE_URL__, {attribution: __ATTRIBUTION__, subdomains: 'abcd', maxZoom: 20}).addTo(map);
var points = __POINTS__;
var layer = __CLUSTER__ ? L.markerClusterGroup() : L.layerGroup();
points.forEach(function (p) {
  L.circleMarker([p.lat, p.lon], {radius: p.radius, fill: true, weight: 1})
    .bindPopup(p.popup)
    .addTo(layer);
});
layer.addTo(map);
if (points.length > 0) {
  map.fitBounds(points.map(function (p) { return [p.lat, p.lon]; }), {padding: [20, 20]});
} else {
  map.setView([50, 10], 3);
}
</script>
</body>
</html>
"#;

/// CartoDB Positron tiles.
pub const POSITRON_TILES: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";

const POSITRON_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

#[derive(Serialize)]
struct Marker<'a> {
    name: &'a str,
    lat: f64,
    lon: f64,
    count: u64,
    radius: f64,
    popup: String,
}

/// Renders an HTML page with one circle marker per location.
///
/// Marker radius equals the count, and the popup shows location and count.
/// Nearby markers are clustered unless clustering is disabled.
#[derive(Debug, Clone)]
pub struct LeafletRenderer {
    title: String,
    tile_url: String,
    attribution: String,
    cluster: bool,
    max_radius: Option<f64>,
}

impl Default for LeafletRenderer {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            tile_url: POSITRON_TILES.to_string(),
            attribution: POSITRON_ATTRIBUTION.to_string(),
            cluster: true,
            max_radius: None,
        }
    }
}

impl LeafletRenderer {
    /// Create a renderer with Positron tiles and clustering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Use a different tile layer.
    pub fn with_tiles(mut self, url: impl Into<String>, attribution: impl Into<String>) -> Self {
        self.tile_url = url.into();
        self.attribution = attribution.into();
        self
    }

    /// Enable or disable marker clustering.
    pub fn with_clustering(mut self, cluster: bool) -> Self {
        self.cluster = cluster;
        self
    }

    /// Cap the marker radius in pixels.
    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = Some(max_radius);
        self
    }

    fn popup(point: &MapPoint) -> String {
        format!(
            "Location: {}<br>\nCount: {}<br>",
            escape(point.name.as_str()),
            point.count
        )
    }
}

/// Serialize a value for inline embedding in a `<script>` element.
pub(crate) fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

impl MapRenderer for LeafletRenderer {
    fn name(&self) -> &str {
        "leaflet"
    }

    fn file_name(&self) -> &str {
        "leaflet_map.html"
    }

    fn render(&self, points: &[MapPoint]) -> Result<String> {
        let markers: Vec<Marker<'_>> = points
            .iter()
            .map(|p| {
                let radius = p.count as f64;
                Marker {
                    name: &p.name,
                    lat: p.lat,
                    lon: p.lon,
                    count: p.count,
                    radius: self.max_radius.map_or(radius, |max| radius.min(max)),
                    popup: Self::popup(p),
                }
            })
            .collect();

        Ok(TEMPLATE
            .replace("__TITLE__", &escape(self.title.as_str()))
            .replace("__TILE_URL__", &script_json(&self.tile_url)?)
            .replace("__ATTRIBUTION__", &script_json(&self.attribution)?)
            .replace("__CLUSTER__", if self.cluster { "true" } else { "false" })
            .replace("__POINTS__", &script_json(&markers)?))
    }
}
