//! Data model for the location pipeline.
//!
//! These are plain records passed between stages: documents come out of the
//! extractor, mentions out of the tagger, canonical mentions out of the
//! normalizer, and frequency and coordinate rows out of the later stages.

mod document;
mod mention;
mod record;

pub use document::{document_id, Document};
pub use mention::{CanonicalMention, Correction, Mention};
pub use record::{total_count, FrequencyRecord, GeoPoint, MapPoint};
