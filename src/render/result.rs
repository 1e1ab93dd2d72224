//! Outcome of a rendering run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An artifact written by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Renderer name
    pub renderer: String,

    /// Written file
    pub path: PathBuf,

    /// Size in bytes
    pub bytes: usize,
}

/// A renderer that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFailure {
    /// Renderer name
    pub renderer: String,

    /// Error message
    pub message: String,
}

/// Artifacts and failures of [`RendererRegistry::render_all`](super::RendererRegistry::render_all).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderReport {
    /// Artifacts in registration order
    pub written: Vec<Artifact>,

    /// Renderers that failed
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    /// Check whether every renderer succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Paths of all written artifacts.
    pub fn paths(&self) -> Vec<&PathBuf> {
        self.written.iter().map(|a| &a.path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report() {
        let mut report = RenderReport::default();
        assert!(report.is_complete());

        report.written.push(Artifact {
            renderer: "leaflet".into(),
            path: PathBuf::from("output/leaflet_map.html"),
            bytes: 10,
        });
        report.failures.push(RenderFailure {
            renderer: "plotly".into(),
            message: "boom".into(),
        });
        assert!(!report.is_complete());
        assert_eq!(report.paths(), vec![&PathBuf::from("output/leaflet_map.html")]);
    }
}
