//! Mention types produced by the tagger and the normalizer.

use serde::{Deserialize, Serialize};

/// A raw location reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mention {
    /// Id of the document the mention was found in
    pub document_id: String,

    /// The substring the tagger identified
    pub raw: String,
}

impl Mention {
    /// Create a new mention.
    pub fn new(document_id: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            raw: raw.into(),
        }
    }
}

/// A mention that survived normalization, paired with its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMention {
    pub document_id: String,
    pub raw: String,
    pub canonical: String,
}

/// A fuzzy substitution applied during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// The name as it appeared after the suffix rule
    pub candidate: String,

    /// The reference spelling it was replaced with
    pub reference: String,

    /// Similarity score (0-100)
    pub score: u8,
}
