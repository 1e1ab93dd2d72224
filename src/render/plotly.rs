//! Interactive plotly.js scatter-mapbox page.

use quick_xml::escape::escape;
use serde_json::{json, Value};

use super::colormap::Colormap;
use super::leaflet::script_json;
use super::options::DEFAULT_TITLE;
use super::MapRenderer;
use crate::error::Result;
use crate::model::MapPoint;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders a scatter-mapbox page: marker area and color follow the count.
#[derive(Debug, Clone)]
pub struct PlotlyRenderer {
    title: String,
    colormap: Colormap,
    map_style: String,
    zoom: f64,
    size_max: f64,
}

impl Default for PlotlyRenderer {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            colormap: Colormap::IceFire,
            map_style: "carto-positron".to_string(),
            zoom: 2.0,
            size_max: 15.0,
        }
    }
}

impl PlotlyRenderer {
    /// Create a renderer with the default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the marker colormap.
    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Set the initial zoom level.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the diameter of the largest marker in pixels.
    pub fn with_size_max(mut self, size_max: f64) -> Self {
        self.size_max = size_max.max(1.0);
        self
    }

    fn figure(&self, points: &[MapPoint]) -> (Value, Value) {
        let max_count = points.iter().map(|p| p.count).max().unwrap_or(1).max(1) as f64;
        let (center_lat, center_lon) = if points.is_empty() {
            (0.0, 0.0)
        } else {
            let n = points.len() as f64;
            (
                points.iter().map(|p| p.lat).sum::<f64>() / n,
                points.iter().map(|p| p.lon).sum::<f64>() / n,
            )
        };
        let colorscale: Vec<Value> = self
            .colormap
            .stops(16)
            .into_iter()
            .map(|(t, color)| json!([t, color]))
            .collect();

        let trace = json!({
            "type": "scattermapbox",
            "mode": "markers",
            "lat": points.iter().map(|p| p.lat).collect::<Vec<_>>(),
            "lon": points.iter().map(|p| p.lon).collect::<Vec<_>>(),
            "text": points.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "customdata": points.iter().map(|p| p.count).collect::<Vec<_>>(),
            "hovertemplate": "<b>%{text}</b><br>count=%{customdata}<extra></extra>",
            "marker": {
                "size": points.iter().map(|p| p.count).collect::<Vec<_>>(),
                "sizemode": "area",
                "sizeref": 2.0 * max_count / (self.size_max * self.size_max),
                "color": points.iter().map(|p| p.count).collect::<Vec<_>>(),
                "colorscale": colorscale,
                "cmin": 0,
                "cmax": max_count,
                "showscale": true,
                "colorbar": {"title": {"text": "count"}}
            }
        });
        let layout = json!({
            "title": {"text": self.title},
            "mapbox": {
                "style": self.map_style,
                "zoom": self.zoom,
                "center": {"lat": center_lat, "lon": center_lon}
            },
            "margin": {"t": 40, "r": 0, "b": 0, "l": 0}
        });
        (json!([trace]), layout)
    }
}

impl MapRenderer for PlotlyRenderer {
    fn name(&self) -> &str {
        "plotly"
    }

    fn file_name(&self) -> &str {
        "plotly_map.html"
    }

    fn render(&self, points: &[MapPoint]) -> Result<String> {
        let (data, layout) = self.figure(points);
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
Plotly.newPlot('map', {data}, {layout}, {{responsive: true}});
</script>
</body>
</html>
"#,
            title = escape(self.title.as_str()),
            cdn = PLOTLY_CDN,
            data = script_json(&data)?,
            layout = script_json(&layout)?,
        ))
    }
}
