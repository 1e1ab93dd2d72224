//! Static SVG scatter maps.
//!
//! Points are drawn on an equirectangular projection of the configured
//! [`Extent`], sized by the square root of their count and colored on a
//! continuous scale from zero to the highest count. Points outside the extent
//! are not drawn.

use log::debug;
use quick_xml::escape::escape;

use super::colormap::Colormap;
use super::options::{Extent, ScatterOptions};
use super::MapRenderer;
use crate::error::{Error, Result};
use crate::model::MapPoint;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 130.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const COLORBAR_WIDTH: f64 = 18.0;
const FONT: &str = "font-family=\"sans-serif\" fill=\"#333333\"";

/// Renders a static scatter plot as SVG.
#[derive(Debug, Clone)]
pub struct ScatterRenderer {
    name: String,
    file_name: String,
    options: ScatterOptions,
}

impl ScatterRenderer {
    /// Create a scatter renderer.
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, options: ScatterOptions) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            options,
        }
    }

    /// World scatter with the autumn colormap.
    pub fn world() -> Self {
        Self::new(
            "scatter_world",
            "scatter_world.svg",
            ScatterOptions::new().with_extent(Extent::WORLD),
        )
    }

    /// European scatter with the autumn colormap.
    pub fn europe() -> Self {
        Self::new(
            "scatter_europe",
            "scatter_europe.svg",
            ScatterOptions::new().with_extent(Extent::EUROPE),
        )
    }

    /// Scatter fitted to the points, with the IceFire colormap.
    pub fn overview() -> Self {
        Self::new(
            "scatter_overview",
            "scatter_overview.svg",
            ScatterOptions::new().with_colormap(Colormap::IceFire),
        )
    }

    /// Get the options.
    pub fn options(&self) -> &ScatterOptions {
        &self.options
    }

    /// Replace the options.
    pub fn with_options(mut self, options: ScatterOptions) -> Self {
        self.options = options;
        self
    }
}

impl MapRenderer for ScatterRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn render(&self, points: &[MapPoint]) -> Result<String> {
        let extent = self
            .options
            .extent
            .or_else(|| Extent::around(points, 2.0))
            .unwrap_or(Extent::WORLD);
        if !(extent.width() > 0.0 && extent.height() > 0.0) {
            return Err(Error::Render(format!(
                "empty extent for '{}': {:?}",
                self.name, extent
            )));
        }

        let canvas = Canvas::new(&self.options, extent);
        let mut svg = String::new();

        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.options.width,
            h = self.options.height
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
        svg.push_str(&format!(
            "<defs><clipPath id=\"plot-area\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>{}</defs>\n",
            MARGIN_LEFT,
            MARGIN_TOP,
            canvas.plot_width,
            canvas.plot_height,
            gradient(self.options.colormap)
        ));

        if let Some(basemap) = &self.options.basemap {
            svg.push_str("<g clip-path=\"url(#plot-area)\" fill=\"lightgrey\" stroke=\"white\" stroke-width=\"0.5\">\n");
            for polygon in basemap.polygons() {
                let d = polygon
                    .iter()
                    .filter(|ring| !ring.is_empty())
                    .map(|ring| canvas.ring_path(ring))
                    .collect::<Vec<_>>()
                    .join(" ");
                if !d.is_empty() {
                    svg.push_str(&format!("<path fill-rule=\"evenodd\" d=\"{}\"/>\n", d));
                }
            }
            svg.push_str("</g>\n");
        }

        svg.push_str(&canvas.axes());

        let max_count = points.iter().map(|p| p.count).max().unwrap_or(0).max(1) as f64;
        let mut visible: Vec<&MapPoint> = points
            .iter()
            .filter(|p| extent.contains(p.lat, p.lon))
            .collect();
        if visible.len() < points.len() {
            debug!(
                "{}: {} of {} points outside the extent",
                self.name,
                points.len() - visible.len(),
                points.len()
            );
        }
        // large markers first so small ones stay visible
        visible.sort_by(|a, b| b.count.cmp(&a.count));

        svg.push_str(&format!(
            "<g clip-path=\"url(#plot-area)\" fill-opacity=\"{:.2}\" stroke=\"#555555\" stroke-width=\"0.3\">\n",
            self.options.alpha
        ));
        for point in visible {
            let (x, y) = canvas.project(point.lon, point.lat);
            let radius = (point.count as f64).sqrt() * self.options.marker_scale;
            let color = self.options.colormap.color(point.count as f64 / max_count);
            svg.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"><title>{}: {}</title></circle>\n",
                x,
                y,
                radius.max(1.0),
                color.to_hex(),
                escape(point.name.as_str()),
                point.count
            ));
        }
        svg.push_str("</g>\n");

        svg.push_str(&canvas.colorbar(max_count));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"18\" {}>{}</text>\n",
            MARGIN_LEFT + canvas.plot_width / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            FONT,
            escape(self.options.title.as_str())
        ));
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

struct Canvas {
    extent: Extent,
    plot_width: f64,
    plot_height: f64,
    total_width: f64,
}

impl Canvas {
    fn new(options: &ScatterOptions, extent: Extent) -> Self {
        let total_width = options.width as f64;
        Self {
            extent,
            plot_width: total_width - MARGIN_LEFT - MARGIN_RIGHT,
            plot_height: options.height as f64 - MARGIN_TOP - MARGIN_BOTTOM,
            total_width,
        }
    }

    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = MARGIN_LEFT + (lon - self.extent.lon_min) / self.extent.width() * self.plot_width;
        let y = MARGIN_TOP + (self.extent.lat_max - lat) / self.extent.height() * self.plot_height;
        (x, y)
    }

    fn ring_path(&self, ring: &[(f64, f64)]) -> String {
        let mut d = String::new();
        for (i, &(lon, lat)) in ring.iter().enumerate() {
            let (x, y) = self.project(lon, lat);
            d.push_str(&format!("{}{:.1} {:.1} ", if i == 0 { "M" } else { "L" }, x, y));
        }
        d.push('Z');
        d
    }

    fn axes(&self) -> String {
        let bottom = MARGIN_TOP + self.plot_height;
        let mut out = format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"#333333\"/>\n",
            MARGIN_LEFT, MARGIN_TOP, self.plot_width, self.plot_height
        );

        for lon in ticks(self.extent.lon_min, self.extent.lon_max) {
            let (x, _) = self.project(lon, self.extent.lat_min);
            out.push_str(&format!(
                "<line x1=\"{x:.2}\" y1=\"{b:.2}\" x2=\"{x:.2}\" y2=\"{t:.2}\" stroke=\"#333333\"/>\n",
                x = x,
                b = bottom,
                t = bottom + 5.0
            ));
            out.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"11\" {}>{}</text>\n",
                x,
                bottom + 18.0,
                FONT,
                format_tick(lon)
            ));
        }
        for lat in ticks(self.extent.lat_min, self.extent.lat_max) {
            let (_, y) = self.project(self.extent.lon_min, lat);
            out.push_str(&format!(
                "<line x1=\"{l:.2}\" y1=\"{y:.2}\" x2=\"{r:.2}\" y2=\"{y:.2}\" stroke=\"#333333\"/>\n",
                l = MARGIN_LEFT - 5.0,
                r = MARGIN_LEFT,
                y = y
            ));
            out.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-size=\"11\" {}>{}</text>\n",
                MARGIN_LEFT - 8.0,
                y + 4.0,
                FONT,
                format_tick(lat)
            ));
        }

        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"13\" {}>Longitude</text>\n",
            MARGIN_LEFT + self.plot_width / 2.0,
            bottom + 42.0,
            FONT
        ));
        let (cx, cy) = (MARGIN_LEFT - 50.0, MARGIN_TOP + self.plot_height / 2.0);
        out.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{cy:.2}\" transform=\"rotate(-90 {cx:.2} {cy:.2})\" text-anchor=\"middle\" font-size=\"13\" {font}>Latitude</text>\n",
            cx = cx,
            cy = cy,
            font = FONT
        ));
        out
    }

    fn colorbar(&self, max_count: f64) -> String {
        let x = self.total_width - MARGIN_RIGHT + 30.0;
        let mut out = format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"url(#colormap)\" stroke=\"#333333\"/>\n",
            x, MARGIN_TOP, COLORBAR_WIDTH, self.plot_height
        );
        for fraction in [0.0, 0.5, 1.0] {
            let y = MARGIN_TOP + (1.0 - fraction) * self.plot_height;
            out.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"11\" {}>{}</text>\n",
                x + COLORBAR_WIDTH + 5.0,
                y + 4.0,
                FONT,
                format_tick(fraction * max_count)
            ));
        }
        let (lx, ly) = (x + COLORBAR_WIDTH + 50.0, MARGIN_TOP + self.plot_height / 2.0);
        out.push_str(&format!(
            "<text x=\"{lx:.2}\" y=\"{ly:.2}\" transform=\"rotate(-90 {lx:.2} {ly:.2})\" text-anchor=\"middle\" font-size=\"13\" {font}>count</text>\n",
            lx = lx,
            ly = ly,
            font = FONT
        ));
        out
    }
}

fn gradient(colormap: Colormap) -> String {
    let stops: String = colormap
        .stops(17)
        .into_iter()
        .map(|(offset, color)| format!("<stop offset=\"{:.3}\" stop-color=\"{}\"/>", offset, color))
        .collect();
    format!(
        "<linearGradient id=\"colormap\" x1=\"0\" y1=\"1\" x2=\"0\" y2=\"0\">{}</linearGradient>",
        stops
    )
}

/// Round tick positions covering `min..=max`, about six of them.
fn ticks(min: f64, max: f64) -> Vec<f64> {
    let step = tick_step(max - min);
    let mut value = (min / step).ceil() * step;
    let mut ticks = Vec::new();
    while value <= max + step * 1e-9 {
        ticks.push(value);
        value += step;
    }
    ticks
}

fn tick_step(span: f64) -> f64 {
    let raw = span / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual < 1.5 {
        1.0
    } else if residual < 3.0 {
        2.0
    } else if residual < 7.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-6 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
