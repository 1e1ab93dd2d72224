//! File layout and stage orchestration for the two command-line tools.
//!
//! The preprocessing side runs extraction, tagging, normalization and
//! counting; the map side geocodes the frequency table and renders it. Every
//! stage reads and writes the flat tables described in [`crate::table`], so
//! either side can be resumed from its intermediate files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::aggregate::count_mentions;
use crate::error::Result;
use crate::extract::{extract_dir, write_text_exports, ErrorMode, ExtractOptions, XmlExtractor};
use crate::geocode::{geocode_records, GeocodeOutcome, Geocoder};
use crate::model::{total_count, Correction, Document, FrequencyRecord, GeoPoint, MapPoint, Mention};
use crate::normalize::{LocationNormalizer, Normalization, NormalizeOptions};
use crate::render::{Basemap, RenderReport, RendererRegistry};
use crate::table;
use crate::tagger::{tag_documents_with_progress, EntityTagger};

/// Directory layout and stage options.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the input and intermediate files
    pub data_dir: PathBuf,

    /// Directory for rendered maps
    pub output_dir: PathBuf,

    /// Extraction options
    pub extract: ExtractOptions,

    /// Normalization options
    pub normalize: NormalizeOptions,

    /// Optional GeoJSON basemap for the static scatters
    pub basemap: Option<PathBuf>,

    /// Feature property `(key, value)` selecting the European basemap
    pub basemap_filter: Option<(String, String)>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            extract: ExtractOptions::default(),
            normalize: NormalizeOptions::default(),
            basemap: None,
            basemap_filter: Some(("continent".to_string(), "Europe".to_string())),
        }
    }
}

impl PipelineConfig {
    /// Create the default configuration (`data/`, `output/`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set normalization options.
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize = options;
        self
    }

    /// Draw a GeoJSON basemap below the static scatters.
    pub fn with_basemap(mut self, path: impl Into<PathBuf>) -> Self {
        self.basemap = Some(path.into());
        self
    }

    /// Set the property filter for the European basemap; `None` uses the
    /// full basemap.
    pub fn with_basemap_filter(mut self, filter: Option<(String, String)>) -> Self {
        self.basemap_filter = filter;
        self
    }

    /// `data/xml`: source documents.
    pub fn xml_dir(&self) -> PathBuf {
        self.data_dir.join("xml")
    }

    /// `data/txt`: plain-text exports.
    pub fn txt_dir(&self) -> PathBuf {
        self.data_dir.join("txt")
    }

    /// `data/csv`: intermediate tables.
    pub fn csv_dir(&self) -> PathBuf {
        self.data_dir.join("csv")
    }

    /// The exploded entity table.
    pub fn exploded_table(&self) -> PathBuf {
        self.csv_dir().join("loc_exploded.csv")
    }

    /// The frequency table.
    pub fn frequency_table(&self) -> PathBuf {
        self.csv_dir().join("loc_count.csv")
    }

    /// The coordinate table.
    pub fn coordinate_table(&self) -> PathBuf {
        self.csv_dir().join("loc_coordinates.csv")
    }

    /// Build the default renderers, loading the basemap if one is set.
    pub fn renderer_registry(&self) -> Result<RendererRegistry> {
        let Some(path) = &self.basemap else {
            return Ok(RendererRegistry::with_defaults());
        };
        let world = Basemap::from_file(path)?;
        let europe = self
            .basemap_filter
            .as_ref()
            .map(|(key, value)| world.filter(key, value))
            .filter(|europe| !europe.is_empty());
        Ok(RendererRegistry::with_basemaps(Some(world), europe))
    }
}

/// Summary of a preprocessing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessSummary {
    pub generated_at: DateTime<Utc>,

    /// Documents extracted; `None` when only counting was run
    pub documents: Option<usize>,

    /// Raw mentions before normalization
    pub mentions: usize,

    /// Mentions removed by the exclusion set
    pub dropped: usize,

    /// Fuzzy substitutions applied
    pub corrections: Vec<Correction>,

    /// Distinct canonical names
    pub locations: usize,

    /// Sum of all counts
    pub total_count: u64,

    /// Where the frequency table was written
    pub frequency_table: PathBuf,
}

impl PreprocessSummary {
    /// Summarize a counting run.
    pub fn new(
        config: &PipelineConfig,
        documents: Option<usize>,
        mentions: usize,
        normalization: Normalization,
        records: &[FrequencyRecord],
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            documents,
            mentions,
            dropped: normalization.dropped,
            corrections: normalization.corrections,
            locations: records.len(),
            total_count: total_count(records),
            frequency_table: config.frequency_table(),
        }
    }
}

/// Summary of a geocoding and rendering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSummary {
    pub generated_at: DateTime<Utc>,

    /// Names in the frequency table; `None` when only plotting was run
    pub locations: Option<usize>,

    /// Names with coordinates
    pub resolved: usize,

    /// Names the geocoder could not resolve
    pub unresolved: Vec<FrequencyRecord>,

    /// Sum of the counts that made it onto the maps
    pub rendered_total: u64,

    /// Artifacts and renderer failures
    pub report: RenderReport,
}

impl MapSummary {
    /// Summarize a geocoding run over `locations` names.
    pub fn new(locations: usize, outcome: GeocodeOutcome, report: RenderReport) -> Self {
        Self {
            generated_at: Utc::now(),
            locations: Some(locations),
            resolved: outcome.points.len(),
            rendered_total: outcome.rendered_total(),
            unresolved: outcome.unresolved,
            report,
        }
    }

    /// Summarize a plotting run over existing points.
    pub fn plotted(points: &[MapPoint], report: RenderReport) -> Self {
        Self {
            generated_at: Utc::now(),
            locations: None,
            resolved: points.len(),
            unresolved: Vec::new(),
            rendered_total: points.iter().map(|p| p.count).sum(),
            report,
        }
    }
}

/// Write a summary as pretty JSON.
pub fn write_summary<T: Serialize, P: AsRef<Path>>(summary: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

/// Extract every document in `data/xml` and write `data/txt/<id>.txt`.
pub fn extract_corpus(config: &PipelineConfig) -> Result<Vec<Document>> {
    let extractor = XmlExtractor::with_options(config.extract.clone());
    let documents = extract_dir(config.xml_dir(), &extractor)?;
    write_text_exports(&documents, config.txt_dir())?;
    Ok(documents)
}

/// Tag every document and write the exploded entity table.
///
/// `on_document` is called after each document is tagged.
pub fn tag_corpus<F>(
    config: &PipelineConfig,
    tagger: &dyn EntityTagger,
    documents: &[Document],
    on_document: F,
) -> Result<Vec<Mention>>
where
    F: FnMut(&Document, usize),
{
    let mentions = tag_documents_with_progress(tagger, documents, on_document)?;
    table::write_mentions(config.exploded_table(), documents, &mentions)?;
    Ok(mentions)
}

/// Normalize mentions, count them and write the frequency table.
pub fn count_locations(
    config: &PipelineConfig,
    mentions: &[Mention],
) -> Result<(Normalization, Vec<FrequencyRecord>)> {
    let normalizer = LocationNormalizer::with_options(config.normalize.clone());
    let normalization = normalizer.normalize(mentions);
    let records = count_mentions(&normalization.mentions);

    let path = config.frequency_table();
    table::write_frequencies(&path, &records)?;
    info!(
        "Wrote {} locations ({} mentions) to {}",
        records.len(),
        total_count(&records),
        path.display()
    );
    Ok((normalization, records))
}

/// Run extraction, tagging and counting.
pub fn preprocess<F>(
    config: &PipelineConfig,
    tagger: &dyn EntityTagger,
    on_document: F,
) -> Result<PreprocessSummary>
where
    F: FnMut(&Document, usize),
{
    let documents = extract_corpus(config)?;
    let mentions = tag_corpus(config, tagger, &documents, on_document)?;
    let (normalization, records) = count_locations(config, &mentions)?;
    Ok(PreprocessSummary::new(
        config,
        Some(documents.len()),
        mentions.len(),
        normalization,
        &records,
    ))
}

/// Recount from an existing exploded entity table.
pub fn recount(config: &PipelineConfig) -> Result<PreprocessSummary> {
    let mentions = table::read_mentions(config.exploded_table())?;
    let (normalization, records) = count_locations(config, &mentions)?;
    Ok(PreprocessSummary::new(
        config,
        None,
        mentions.len(),
        normalization,
        &records,
    ))
}

/// Geocode frequency records and write the coordinate table.
pub fn geocode_table<G, F>(
    config: &PipelineConfig,
    geocoder: &G,
    records: &[FrequencyRecord],
    error_mode: ErrorMode,
    on_record: F,
) -> Result<GeocodeOutcome>
where
    G: Geocoder + ?Sized,
    F: FnMut(&FrequencyRecord, Option<&GeoPoint>),
{
    let outcome = geocode_records(geocoder, records, error_mode, on_record)?;
    table::write_coordinates(config.coordinate_table(), &outcome.points)?;
    Ok(outcome)
}

/// Render points with the configured renderers into the output directory.
pub fn render_maps(config: &PipelineConfig, points: &[MapPoint]) -> Result<RenderReport> {
    let registry = config.renderer_registry()?;
    registry.render_all(points, &config.output_dir)
}

/// Geocode frequency records, write the coordinate table, then render the
/// resolved points.
pub fn map<G, F>(
    config: &PipelineConfig,
    geocoder: &G,
    records: &[FrequencyRecord],
    error_mode: ErrorMode,
    on_record: F,
) -> Result<MapSummary>
where
    G: Geocoder + ?Sized,
    F: FnMut(&FrequencyRecord, Option<&GeoPoint>),
{
    let outcome = geocode_table(config, geocoder, records, error_mode, on_record)?;
    let report = render_maps(config, &outcome.points)?;
    Ok(MapSummary::new(records.len(), outcome, report))
}

/// Render from an existing coordinate table.
pub fn plot(config: &PipelineConfig) -> Result<MapSummary> {
    let points = table::read_coordinates(config.coordinate_table())?;
    let report = render_maps(config, &points)?;
    Ok(MapSummary::plotted(&points, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = PipelineConfig::new();
        assert_eq!(config.xml_dir(), PathBuf::from("data/xml"));
        assert_eq!(config.txt_dir(), PathBuf::from("data/txt"));
        assert_eq!(config.exploded_table(), PathBuf::from("data/csv/loc_exploded.csv"));
        assert_eq!(config.frequency_table(), PathBuf::from("data/csv/loc_count.csv"));
        assert_eq!(config.coordinate_table(), PathBuf::from("data/csv/loc_coordinates.csv"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_custom_layout() {
        let config = PipelineConfig::new()
            .with_data_dir("/tmp/corpus")
            .with_output_dir("/tmp/maps");
        assert_eq!(config.frequency_table(), PathBuf::from("/tmp/corpus/csv/loc_count.csv"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/maps"));
    }

    #[test]
    fn test_registry_without_basemap() {
        let registry = PipelineConfig::new().renderer_registry().unwrap();
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_missing_basemap_is_an_error() {
        let config = PipelineConfig::new().with_basemap("no/such/world.geojson");
        assert!(config.renderer_registry().is_err());
    }

    #[test]
    fn test_recount_from_exploded_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new().with_data_dir(dir.path());
        fs::create_dir_all(config.csv_dir()).unwrap();
        fs::write(
            config.exploded_table(),
            "files,location\nB1,Paris\nB1,Danmarks\nB1,Danmarks\nB2,\nB3,Humbug\n",
        )
        .unwrap();

        let summary = recount(&config).unwrap();
        assert_eq!(summary.documents, None);
        assert_eq!(summary.mentions, 4);
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.total_count, 3);

        let records = table::read_frequencies(config.frequency_table()).unwrap();
        assert_eq!(
            records,
            vec![FrequencyRecord::new("Danmark", 2), FrequencyRecord::new("Paris", 1)]
        );
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/summary.json");
        let summary = MapSummary {
            generated_at: Utc::now(),
            locations: Some(2),
            resolved: 1,
            unresolved: vec![FrequencyRecord::new("Atlantis", 2)],
            rendered_total: 3,
            report: RenderReport::default(),
        };
        write_summary(&summary, &path).unwrap();

        let read: MapSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.unresolved, summary.unresolved);
        assert_eq!(read.generated_at, summary.generated_at);
    }
}
