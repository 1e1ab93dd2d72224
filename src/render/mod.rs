//! Map renderers with a plugin architecture.
//!
//! Each renderer turns the resolved points into one self-contained artifact.
//! Renderers share no state; [`RendererRegistry::render_all`] writes every
//! artifact and keeps going when one of them fails.
//!
//! # Example
//!
//! ```no_run
//! use letterloc::render::{LeafletRenderer, RendererRegistry};
//! use letterloc::table::read_coordinates;
//! use std::sync::Arc;
//!
//! fn main() -> letterloc::Result<()> {
//!     let mut registry = RendererRegistry::new();
//!     registry.register(Arc::new(LeafletRenderer::new()));
//!
//!     let points = read_coordinates("data/csv/loc_coordinates.csv")?;
//!     let report = registry.render_all(&points, "output")?;
//!     println!("{} artifacts written", report.written.len());
//!     Ok(())
//! }
//! ```

mod basemap;
mod colormap;
mod leaflet;
mod options;
mod plotly;
mod result;
mod scatter;

pub use basemap::{Basemap, Polygon, Ring};
pub use colormap::{Colormap, Rgb};
pub use leaflet::{LeafletRenderer, POSITRON_TILES};
pub use options::{Extent, ScatterOptions, DEFAULT_TITLE};
pub use plotly::PlotlyRenderer;
pub use result::{Artifact, RenderFailure, RenderReport};
pub use scatter::ScatterRenderer;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};

use crate::error::Result;
use crate::model::MapPoint;

/// Trait for map renderers.
///
/// Implement this trait to add a new visualization.
pub trait MapRenderer: Send + Sync {
    /// Get the name of this renderer.
    fn name(&self) -> &str;

    /// File name of the artifact, relative to the output directory.
    fn file_name(&self) -> &str;

    /// Render the points into the artifact's content.
    fn render(&self, points: &[MapPoint]) -> Result<String>;
}

/// Ordered collection of renderers.
pub struct RendererRegistry {
    renderers: Vec<Arc<dyn MapRenderer>>,
}

impl RendererRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Create a registry with the default renderers and no basemap.
    pub fn with_defaults() -> Self {
        Self::with_basemaps(None, None)
    }

    /// Create a registry with the default renderers.
    ///
    /// `world` is drawn below the world and overview scatters, `europe`
    /// below the European one (falling back to `world`).
    pub fn with_basemaps(world: Option<Basemap>, europe: Option<Basemap>) -> Self {
        let europe = europe.or_else(|| world.clone());
        let with_basemap = |renderer: ScatterRenderer, basemap: &Option<Basemap>| match basemap {
            Some(basemap) => {
                let options = renderer.options().clone().with_basemap(basemap.clone());
                renderer.with_options(options)
            }
            None => renderer,
        };

        let mut registry = Self::new();
        registry.register(Arc::new(LeafletRenderer::new()));
        registry.register(Arc::new(PlotlyRenderer::new()));
        registry.register(Arc::new(with_basemap(ScatterRenderer::world(), &world)));
        registry.register(Arc::new(with_basemap(ScatterRenderer::europe(), &europe)));
        registry.register(Arc::new(with_basemap(ScatterRenderer::overview(), &world)));
        registry
    }

    /// Register a renderer, replacing one with the same name.
    pub fn register(&mut self, renderer: Arc<dyn MapRenderer>) {
        let name = renderer.name().to_lowercase();
        match self
            .renderers
            .iter()
            .position(|r| r.name().to_lowercase() == name)
        {
            Some(index) => self.renderers[index] = renderer,
            None => self.renderers.push(renderer),
        }
    }

    /// Get a renderer by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn MapRenderer>> {
        let name = name.to_lowercase();
        self.renderers
            .iter()
            .find(|r| r.name().to_lowercase() == name)
            .cloned()
    }

    /// Names of all renderers, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    /// Number of registered renderers.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Run every renderer and write its artifact into `out_dir`.
    ///
    /// Only failing to create `out_dir` is an error. A failing renderer is
    /// logged and listed in [`RenderReport::failures`].
    pub fn render_all<P: AsRef<Path>>(&self, points: &[MapPoint], out_dir: P) -> Result<RenderReport> {
        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir)?;

        let mut report = RenderReport::default();
        for renderer in &self.renderers {
            let path = out_dir.join(renderer.file_name());
            let written = renderer
                .render(points)
                .and_then(|content| {
                    fs::write(&path, &content)?;
                    Ok(content.len())
                });

            match written {
                Ok(bytes) => {
                    info!("Wrote {} ({} bytes)", path.display(), bytes);
                    report.written.push(Artifact {
                        renderer: renderer.name().to_string(),
                        path,
                        bytes,
                    });
                }
                Err(e) => {
                    error!("Renderer '{}' failed: {}", renderer.name(), e);
                    report.failures.push(RenderFailure {
                        renderer: renderer.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
