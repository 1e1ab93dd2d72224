//! Integration tests for the map renderers.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use letterloc::error::Result;
use letterloc::model::MapPoint;
use letterloc::pipeline::{render_maps, PipelineConfig};
use letterloc::render::{
    Colormap, Extent, MapRenderer, RendererRegistry, ScatterOptions, ScatterRenderer,
};
use letterloc::Error;

/// Mock renderer that always fails.
struct FailingRenderer;

impl MapRenderer for FailingRenderer {
    fn name(&self) -> &str {
        "failing"
    }

    fn file_name(&self) -> &str {
        "failing.png"
    }

    fn render(&self, _points: &[MapPoint]) -> Result<String> {
        Err(Error::Render("raster backend unavailable".into()))
    }
}

/// Mock renderer that counts its calls.
struct CountingRenderer(AtomicUsize);

impl MapRenderer for CountingRenderer {
    fn name(&self) -> &str {
        "counting"
    }

    fn file_name(&self) -> &str {
        "counting.txt"
    }

    fn render(&self, points: &[MapPoint]) -> Result<String> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{} points", points.len()))
    }
}

fn points() -> Vec<MapPoint> {
    vec![
        MapPoint {
            name: "København".into(),
            lat: 55.6761,
            lon: 12.5683,
            count: 14,
            address: Some("København, Danmark".into()),
        },
        MapPoint {
            name: "Rom".into(),
            lat: 41.8933,
            lon: 12.4829,
            count: 6,
            address: None,
        },
        MapPoint {
            name: "Amerika".into(),
            lat: 39.78,
            lon: -100.45,
            count: 2,
            address: None,
        },
    ]
}

const BASEMAP: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "properties": {"continent": "Europe"},
     "geometry": {"type": "Polygon", "coordinates": [[[8.0, 54.8], [12.7, 54.8], [12.7, 57.7], [8.0, 54.8]]]}},
    {"type": "Feature", "properties": {"continent": "North America"},
     "geometry": {"type": "Polygon", "coordinates": [[[-120.0, 30.0], [-80.0, 30.0], [-80.0, 48.0], [-120.0, 30.0]]]}}
]}"#;

#[test]
fn test_failing_renderer_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    let counter = Arc::new(CountingRenderer(AtomicUsize::new(0)));

    let mut registry = RendererRegistry::with_defaults();
    registry.register(Arc::new(FailingRenderer));
    registry.register(counter.clone());

    let report = registry.render_all(&points(), dir.path()).unwrap();

    assert_eq!(report.written.len(), 6);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].renderer, "failing");
    assert!(report.failures[0].message.contains("raster backend unavailable"));
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);

    assert!(!dir.path().join("failing.png").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("counting.txt")).unwrap(),
        "3 points"
    );
}

#[test]
fn test_europe_scatter_clips_to_its_extent() {
    let dir = tempfile::tempdir().unwrap();
    let report = RendererRegistry::with_defaults()
        .render_all(&points(), dir.path())
        .unwrap();
    assert!(report.is_complete());

    let world = fs::read_to_string(dir.path().join("scatter_world.svg")).unwrap();
    let europe = fs::read_to_string(dir.path().join("scatter_europe.svg")).unwrap();
    assert_eq!(world.matches("<circle").count(), 3);
    assert_eq!(europe.matches("<circle").count(), 2);
    assert!(!europe.contains("Amerika"));
}

#[test]
fn test_interactive_maps_embed_every_point() {
    let dir = tempfile::tempdir().unwrap();
    RendererRegistry::with_defaults()
        .render_all(&points(), dir.path())
        .unwrap();

    let leaflet = fs::read_to_string(dir.path().join("leaflet_map.html")).unwrap();
    let plotly = fs::read_to_string(dir.path().join("plotly_map.html")).unwrap();
    for name in ["København", "Rom", "Amerika"] {
        assert!(leaflet.contains(&format!("Location: {}<br>", name)));
        assert!(plotly.contains(&format!("\"{}\"", name)));
    }
    assert!(plotly.contains("carto-positron"));
}

#[test]
fn test_basemap_filter_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let basemap = dir.path().join("world.geojson");
    fs::write(&basemap, BASEMAP).unwrap();

    let config = PipelineConfig::new()
        .with_output_dir(dir.path().join("output"))
        .with_basemap(&basemap);
    let report = render_maps(&config, &points()).unwrap();
    assert!(report.is_complete());

    let world = fs::read_to_string(config.output_dir.join("scatter_world.svg")).unwrap();
    let europe = fs::read_to_string(config.output_dir.join("scatter_europe.svg")).unwrap();
    assert_eq!(world.matches("<path").count(), 2);
    assert_eq!(europe.matches("<path").count(), 1);
}

#[test]
fn test_custom_scatter() {
    let renderer = ScatterRenderer::new(
        "scandinavia",
        "scandinavia.svg",
        ScatterOptions::new()
            .with_title("Skandinavien")
            .with_extent(Extent::new(4.0, 32.0, 54.0, 72.0))
            .with_colormap(Colormap::IceFire)
            .with_size(800, 600),
    );
    let svg = renderer.render(&points()).unwrap();

    assert!(svg.contains("width=\"800\" height=\"600\""));
    assert!(svg.contains(">Skandinavien<"));
    assert_eq!(svg.matches("<circle").count(), 1);
}
