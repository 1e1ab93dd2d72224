//! Document-level types.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A source letter after markup extraction.
///
/// Documents are created by the extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier (source file name up to its first `.`)
    pub id: String,

    /// The original markup. Empty for documents read back from text exports.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub raw_markup: String,

    /// Concatenated paragraph text
    pub plain_text: String,

    /// Number of body paragraphs that contributed text
    pub paragraph_count: usize,
}

impl Document {
    /// Create a document from already-extracted text.
    pub fn from_text(id: impl Into<String>, plain_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_markup: String::new(),
            plain_text: plain_text.into(),
            paragraph_count: 0,
        }
    }

    /// Check if the document has no text.
    pub fn is_empty(&self) -> bool {
        self.plain_text.trim().is_empty()
    }

    /// Approximate word count (whitespace-separated tokens).
    pub fn word_count(&self) -> usize {
        self.plain_text.split_whitespace().count()
    }
}

/// Derive a document id from a file path.
///
/// The id is the file name cut at its first `.`, so `B1871-08.tei.xml`
/// becomes `B1871-08`.
pub fn document_id<P: AsRef<Path>>(path: P) -> String {
    let file_name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}
