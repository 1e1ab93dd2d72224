//! Options for the static scatter renderer.

use serde::{Deserialize, Serialize};

use super::basemap::Basemap;
use super::colormap::Colormap;
use crate::model::MapPoint;

/// Default title of the static scatters.
pub const DEFAULT_TITLE: &str = "Locations from the letters by count";

/// A longitude/latitude window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Western edge
    pub lon_min: f64,
    /// Eastern edge
    pub lon_max: f64,
    /// Southern edge
    pub lat_min: f64,
    /// Northern edge
    pub lat_max: f64,
}

impl Extent {
    /// The world window of the world scatter.
    pub const WORLD: Extent = Extent::new(-150.0, 180.0, -60.0, 90.0);

    /// The European window of the Europe scatter.
    pub const EUROPE: Extent = Extent::new(-20.0, 35.0, 35.0, 73.0);

    /// Create an extent from its edges.
    pub const fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Smallest extent holding every point, padded by `padding` degrees.
    ///
    /// Returns `None` for an empty slice. A single point (or a degenerate
    /// span) still gets a non-empty window.
    pub fn around(points: &[MapPoint], padding: f64) -> Option<Self> {
        let first = points.first()?;
        let mut extent = Extent::new(first.lon, first.lon, first.lat, first.lat);
        for p in &points[1..] {
            extent.lon_min = extent.lon_min.min(p.lon);
            extent.lon_max = extent.lon_max.max(p.lon);
            extent.lat_min = extent.lat_min.min(p.lat);
            extent.lat_max = extent.lat_max.max(p.lat);
        }
        let padding = padding.max(0.5);
        Some(Extent::new(
            (extent.lon_min - padding).max(-180.0),
            (extent.lon_max + padding).min(180.0),
            (extent.lat_min - padding).max(-90.0),
            (extent.lat_max + padding).min(90.0),
        ))
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Check whether a coordinate lies inside (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lon_min..=self.lon_max).contains(&lon) && (self.lat_min..=self.lat_max).contains(&lat)
    }
}

/// Options for [`ScatterRenderer`](super::ScatterRenderer).
#[derive(Debug, Clone)]
pub struct ScatterOptions {
    /// Plot title
    pub title: String,

    /// Visible window; `None` fits the points
    pub extent: Option<Extent>,

    /// Marker colormap, scaled from 0 to the highest count
    pub colormap: Colormap,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Marker fill opacity
    pub alpha: f64,

    /// Marker radius per square root of the count
    pub marker_scale: f64,

    /// Optional land polygons drawn below the markers
    pub basemap: Option<Basemap>,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            extent: None,
            colormap: Colormap::Autumn,
            width: 1200,
            height: 700,
            alpha: 0.6,
            marker_scale: 1.5,
            basemap: None,
        }
    }
}

impl ScatterOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a fixed extent.
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Set the colormap.
    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    /// Set the image size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(200);
        self.height = height.max(150);
        self
    }

    /// Set the marker opacity.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Set the marker scale.
    pub fn with_marker_scale(mut self, scale: f64) -> Self {
        self.marker_scale = scale.max(0.0);
        self
    }

    /// Draw a basemap below the markers.
    pub fn with_basemap(mut self, basemap: Basemap) -> Self {
        self.basemap = Some(basemap);
        self
    }
}
