//! Normalization options and the default letter-corpus vocabularies.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tokens the tagger reports as locations that are not places.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    ".",
    "’",
    "St.\u{a0}",
    "s",
    "Øie",
    "Måské",
    "Mai",
    "Ala",
    "August",
    "Bergliot",
    "Brandes",
    "Byen",
    "Catilina",
    "Gaden",
    "Gage",
    "Humbug",
    "Jorden",
    "Jupiter",
    "Kasino",
    "Kbh.",
    "Kolera",
    "Kr: teater",
    "Mars",
    "Marts",
    "Myron",
    "Posten",
    "Maaské",
    "Kastanienallee 19/20.",
];

/// Names whose trailing "s" belongs to the root.
pub const DEFAULT_KEEP_SUFFIX: &[&str] = &[
    "Als",
    "Hals",
    "Heliopolis",
    "Helsingfors",
    "Hinterhaus",
    "Kaukasus",
    "Libanius",
    "Bruxelles",
    "New-Orleans",
    "Paris",
    "Refsnæs",
    "Tunis",
    "Wales",
    "Falsens",
    "Basileus",
    "Gossensass",
];

/// Correct spellings that historic variants are matched against.
pub const DEFAULT_REFERENCES: &[&str] = &[
    "Amerika",
    "Appenninerne",
    "Basileus",
    "Bayern",
    "Bergens teater",
    "Burgtheater",
    "Christiania Theater",
    "Finland",
    "Florenz",
    "Frankrig",
    "Frederikshavn",
    "Grand Hotel Oslo",
    "København",
    "Königsbrücker-Strasse, No 33.",
    "Dresden",
    "Petersborg",
    "Rom",
    "Schellingstrasse 30.",
    "Schweiz",
    "Sorrento",
    "Sverige",
    "Østrig",
];

/// Minimum similarity (0-100) for a fuzzy substitution.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// How to choose between several reference names matching one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Highest similarity wins; equal scores go to the earlier reference
    #[default]
    HighestScore,
    /// The reference that comes last in the list wins
    LastReference,
}

/// Options for the location name normalizer.
///
/// Can be loaded from a JSON file; missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Mentions dropped on exact match
    pub exclusions: Vec<String>,

    /// Substring replacements applied to every mention, in order
    pub substitutions: Vec<(String, String)>,

    /// Names exempt from the trailing "s" rule
    pub keep_suffix: Vec<String>,

    /// Reference spellings for fuzzy correction
    pub references: Vec<String>,

    /// Minimum similarity for a substitution
    pub threshold: u8,

    /// Tie-break policy for competing references
    pub tie_break: TieBreak,

    /// Only consider the best N candidates per reference (None = all)
    pub candidate_limit: Option<usize>,

    /// Whether fuzzy correction runs at all
    pub fuzzy: bool,

    /// Normalize mentions to Unicode NFC before any rule
    pub normalize_unicode: bool,
}

impl NormalizeOptions {
    /// Create options with the default vocabularies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options with empty vocabularies.
    pub fn empty() -> Self {
        Self {
            exclusions: Vec::new(),
            substitutions: Vec::new(),
            keep_suffix: Vec::new(),
            references: Vec::new(),
            ..Self::default()
        }
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace the exclusion set.
    pub fn with_exclusions<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.exclusions = items.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the keep-list.
    pub fn with_keep_suffix<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.keep_suffix = items.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the reference list.
    pub fn with_references<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.references = items.into_iter().map(Into::into).collect();
        self
    }

    /// Add a substring substitution.
    pub fn with_substitution(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.substitutions.push((from.into(), to.into()));
        self
    }

    /// Set the similarity threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold.min(100);
        self
    }

    /// Set the tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Limit the candidates considered per reference name.
    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = Some(limit);
        self
    }

    /// Enable or disable fuzzy correction.
    pub fn with_fuzzy(mut self, enabled: bool) -> Self {
        self.fuzzy = enabled;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            exclusions: owned(DEFAULT_EXCLUSIONS),
            substitutions: vec![("å".to_string(), "aa".to_string())],
            keep_suffix: owned(DEFAULT_KEEP_SUFFIX),
            references: owned(DEFAULT_REFERENCES),
            threshold: DEFAULT_THRESHOLD,
            tie_break: TieBreak::HighestScore,
            candidate_limit: None,
            fuzzy: true,
            normalize_unicode: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = NormalizeOptions::default();
        assert_eq!(options.threshold, 80);
        assert_eq!(options.tie_break, TieBreak::HighestScore);
        assert!(options.keep_suffix.iter().any(|k| k == "Paris"));
        assert!(options.references.iter().any(|r| r == "København"));
        assert_eq!(options.substitutions, vec![("å".to_string(), "aa".to_string())]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"threshold": 90, "tie_break": "last_reference"}"#;
        let options: NormalizeOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.threshold, 90);
        assert_eq!(options.tie_break, TieBreak::LastReference);
        assert_eq!(options.references.len(), DEFAULT_REFERENCES.len());
    }

    #[test]
    fn test_builder() {
        let options = NormalizeOptions::empty()
            .with_references(["Rom"])
            .with_threshold(150)
            .with_candidate_limit(5);
        assert_eq!(options.threshold, 100);
        assert_eq!(options.candidate_limit, Some(5));
        assert!(options.exclusions.is_empty());
    }
}
