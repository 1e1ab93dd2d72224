//! Location name normalizer.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::{FuzzyCorrector, NormalizeOptions};
use crate::model::{CanonicalMention, Correction, Mention};

/// Result of normalizing a batch of mentions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Normalization {
    /// Surviving mentions with their canonical names, in input order
    pub mentions: Vec<CanonicalMention>,

    /// Fuzzy substitutions that were applied
    pub corrections: Vec<Correction>,

    /// Number of mentions removed by the exclusion set or left empty
    pub dropped: usize,
}

impl Normalization {
    /// Iterate over the canonical names of the surviving mentions.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.mentions.iter().map(|m| m.canonical.as_str())
    }

    /// Number of surviving mentions.
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Check if no mention survived.
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}

/// Canonicalizes raw location mentions.
///
/// Rules run in a fixed order: exclusion, character substitution, the
/// trailing "s" rule, then fuzzy correction against the reference list.
#[derive(Debug, Clone)]
pub struct LocationNormalizer {
    options: NormalizeOptions,
    exclusions: HashSet<String>,
    keep_suffix: HashSet<String>,
}

impl LocationNormalizer {
    /// Create a normalizer with the default vocabularies.
    pub fn new() -> Self {
        Self::with_options(NormalizeOptions::default())
    }

    /// Create a normalizer with custom options.
    pub fn with_options(options: NormalizeOptions) -> Self {
        let nfc = |s: &String| -> String {
            if options.normalize_unicode {
                s.nfc().collect()
            } else {
                s.clone()
            }
        };
        let exclusions = options.exclusions.iter().map(nfc).collect();
        let keep_suffix = options.keep_suffix.iter().map(nfc).collect();

        Self {
            options,
            exclusions,
            keep_suffix,
        }
    }

    /// Get the normalizer options.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Check if a mention is in the exclusion set.
    pub fn is_excluded(&self, raw: &str) -> bool {
        self.exclusions.contains(raw)
    }

    /// Apply the trailing "s" rule to a name.
    ///
    /// Exactly one "s" is removed unless the name is in the keep-list.
    pub fn strip_suffix<'n>(&self, name: &'n str) -> &'n str {
        match name.strip_suffix('s') {
            Some(stem) if !self.keep_suffix.contains(name) => stem,
            _ => name,
        }
    }

    /// Apply the per-mention rules (everything except fuzzy correction).
    ///
    /// Returns `None` when the mention is dropped.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let mut name: String = if self.options.normalize_unicode {
            raw.nfc().collect()
        } else {
            raw.to_string()
        };

        if name.trim().is_empty() || self.is_excluded(&name) {
            return None;
        }

        for (from, to) in &self.options.substitutions {
            if !from.is_empty() {
                name = name.replace(from.as_str(), to);
            }
        }

        let name = self.strip_suffix(&name);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Compute fuzzy corrections for a list of distinct names.
    pub fn corrections(&self, names: &[String]) -> Vec<Correction> {
        if !self.options.fuzzy {
            return Vec::new();
        }
        FuzzyCorrector::new(&self.options.references, self.options.threshold)
            .with_tie_break(self.options.tie_break)
            .with_candidate_limit(self.options.candidate_limit)
            .corrections(names)
    }

    /// Normalize a batch of mentions.
    pub fn normalize(&self, mentions: &[Mention]) -> Normalization {
        let mut dropped = 0;
        let mut survivors: Vec<(&Mention, String)> = Vec::with_capacity(mentions.len());

        for mention in mentions {
            match self.canonicalize(&mention.raw) {
                Some(name) => survivors.push((mention, name)),
                None => {
                    debug!("Dropped mention '{}' in {}", mention.raw, mention.document_id);
                    dropped += 1;
                }
            }
        }

        let mut seen = HashSet::new();
        let distinct: Vec<String> = survivors
            .iter()
            .filter(|(_, name)| seen.insert(name.as_str()))
            .map(|(_, name)| name.clone())
            .collect();

        let corrections = self.corrections(&distinct);
        for c in &corrections {
            debug!("Corrected '{}' -> '{}' (score {})", c.candidate, c.reference, c.score);
        }
        let mapping: HashMap<&str, &str> = corrections
            .iter()
            .map(|c| (c.candidate.as_str(), c.reference.as_str()))
            .collect();

        let mentions: Vec<CanonicalMention> = survivors
            .into_iter()
            .map(|(mention, name)| CanonicalMention {
                document_id: mention.document_id.clone(),
                raw: mention.raw.clone(),
                canonical: mapping
                    .get(name.as_str())
                    .map(|r| r.to_string())
                    .unwrap_or(name),
            })
            .collect();

        info!(
            "Normalized {} mentions: {} kept, {} dropped, {} corrections",
            mentions.len() + dropped,
            mentions.len(),
            dropped,
            corrections.len()
        );

        Normalization {
            mentions,
            corrections,
            dropped,
        }
    }
}

impl Default for LocationNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
