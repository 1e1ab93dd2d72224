//! # letterloc
//!
//! Location analysis for corpora of historical letters.
//!
//! Letters stored as TEI-style XML are reduced to plain text, scanned for
//! place names, and the names are normalized and counted. The counts are then
//! geocoded and rendered as static and interactive maps.
//!
//! ## Quick Start
//!
//! ```no_run
//! use letterloc::pipeline::{self, PipelineConfig};
//! use letterloc::tagger::GazetteerTagger;
//!
//! fn main() -> letterloc::Result<()> {
//!     let config = PipelineConfig::new().with_data_dir("data");
//!     let tagger = GazetteerTagger::from_file("gazetteer.txt")?;
//!
//!     let summary = pipeline::preprocess(&config, &tagger, |_, _| {})?;
//!     println!("{} locations, {} mentions", summary.locations, summary.total_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Stages
//!
//! - **extract**: paragraph text from XML letters, address headers excluded
//! - **tagger**: location mentions from a gazetteer or a remote NER service
//! - **normalize**: exclusions, spelling substitutions, suffix rule and fuzzy
//!   correction against reference spellings
//! - **aggregate**: frequency table of canonical names
//! - **geocode**: rate-limited Nominatim lookups
//! - **render**: Leaflet and plotly pages, SVG scatter maps

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod table;
pub mod tagger;

// Re-export commonly used types
pub use aggregate::{count_mentions, count_names};
pub use error::{Error, Result};
pub use extract::{ErrorMode, ExtractOptions, XmlExtractor};
pub use geocode::{GeocodeOptions, GeocodeOutcome, Geocoder, NominatimGeocoder, RateLimited};
pub use model::{
    CanonicalMention, Correction, Document, FrequencyRecord, GeoPoint, MapPoint, Mention,
};
pub use normalize::{LocationNormalizer, Normalization, NormalizeOptions, TieBreak};
pub use pipeline::{MapSummary, PipelineConfig, PreprocessSummary};
pub use render::{MapRenderer, RenderReport, RendererRegistry, ScatterOptions};
pub use tagger::{EntityTagger, GazetteerTagger, HttpTagger};

/// Normalize raw location strings and count them, with default options.
///
/// # Example
///
/// ```
/// let records = letterloc::count_locations(["Paris", "Danmarks", "Danmarks"]);
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].name, "Danmark");
/// assert_eq!(records[0].count, 2);
/// ```
pub fn count_locations<I, S>(raw: I) -> Vec<FrequencyRecord>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    count_locations_with_options(raw, NormalizeOptions::default())
}

/// Normalize raw location strings and count them.
pub fn count_locations_with_options<I, S>(raw: I, options: NormalizeOptions) -> Vec<FrequencyRecord>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mentions: Vec<Mention> = raw.into_iter().map(|r| Mention::new("", r)).collect();
    let normalization = LocationNormalizer::with_options(options).normalize(&mentions);
    count_mentions(&normalization.mentions)
}

/// Extract the plain text of one XML letter.
///
/// # Example
///
/// ```no_run
/// let doc = letterloc::extract_file("data/xml/B1.xml").unwrap();
/// println!("{}: {} words", doc.id, doc.word_count());
/// ```
pub fn extract_file<P: AsRef<std::path::Path>>(path: P) -> Result<Document> {
    XmlExtractor::new().extract_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_locations() {
        let records = count_locations(["Paris", "Danmarks", "Mars", "Kjøbenhavn", "København"]);
        assert_eq!(
            records,
            vec![
                FrequencyRecord::new("Danmark", 1),
                FrequencyRecord::new("København", 2),
                FrequencyRecord::new("Paris", 1),
            ]
        );
    }

    #[test]
    fn test_count_locations_without_fuzzy() {
        let options = NormalizeOptions::default().with_fuzzy(false);
        let records = count_locations_with_options(["Kjøbenhavn"], options);
        assert_eq!(records, vec![FrequencyRecord::new("Kjøbenhavn", 1)]);
    }
}
