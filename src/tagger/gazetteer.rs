//! Gazetteer-driven tagger.

use std::fs;
use std::path::Path;

use regex::Regex;

use super::EntityTagger;
use crate::error::{Error, Result};

/// Tags every occurrence of a known place name.
///
/// A trailing genitive "s" is included in the match (`Danmarks`), since the
/// normalizer is responsible for stripping it. Matches must start and end on
/// a word boundary; longer names win over their prefixes.
#[derive(Debug, Clone)]
pub struct GazetteerTagger {
    pattern: Regex,
    size: usize,
}

impl GazetteerTagger {
    /// Build a tagger from a list of names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(Error::Tagger("gazetteer is empty".into()));
        }

        // Regex alternation is leftmost-first, so longer names go first
        names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        names.dedup();

        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("(?:{})s?", alternation))
            .map_err(|e| Error::Tagger(format!("invalid gazetteer pattern: {}", e)))?;

        Ok(Self {
            pattern,
            size: names.len(),
        })
    }

    /// Load a gazetteer file with one name per line.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    /// Number of distinct names in the gazetteer.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if the gazetteer is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl EntityTagger for GazetteerTagger {
    fn name(&self) -> &str {
        "gazetteer"
    }

    fn tag(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .pattern
            .find_iter(text)
            .filter(|m| {
                let before = text[..m.start()].chars().next_back();
                let after = text[m.end()..].chars().next();
                !before.is_some_and(char::is_alphanumeric)
                    && !after.is_some_and(char::is_alphanumeric)
            })
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genitive_included() {
        let tagger = GazetteerTagger::new(["Paris", "Danmark"]).unwrap();
        let found = tagger
            .tag("Fra Paris skriver jeg om Danmarks skjæbne og Danmarks fremtid.")
            .unwrap();
        assert_eq!(found, vec!["Paris", "Danmarks", "Danmarks"]);
    }

    #[test]
    fn test_word_boundaries() {
        let tagger = GazetteerTagger::new(["Rom"]).unwrap();
        let found = tagger.tag("Romanen er skrevet i Rom.").unwrap();
        assert_eq!(found, vec!["Rom"]);
    }

    #[test]
    fn test_longest_name_wins() {
        let tagger = GazetteerTagger::new(["Christiania", "Christiania Theater"]).unwrap();
        let found = tagger.tag("Stykket gaar paa Christiania Theater.").unwrap();
        assert_eq!(found, vec!["Christiania Theater"]);
        assert_eq!(tagger.len(), 2);
    }

    #[test]
    fn test_names_with_punctuation() {
        let tagger = GazetteerTagger::new(["Schellingstrasse 30."]).unwrap();
        let found = tagger.tag("Adresse: Schellingstrasse 30. München").unwrap();
        assert_eq!(found, vec!["Schellingstrasse 30."]);
    }

    #[test]
    fn test_empty_gazetteer_is_error() {
        let result = GazetteerTagger::new(Vec::<String>::new());
        assert!(matches!(result, Err(Error::Tagger(_))));
    }

    #[test]
    fn test_from_file_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.txt");
        fs::write(&path, "# Norway\nBergen\n\nSkien\n").unwrap();

        let tagger = GazetteerTagger::from_file(&path).unwrap();
        assert_eq!(tagger.len(), 2);
        assert_eq!(tagger.tag("Skien og Bergen").unwrap(), vec!["Skien", "Bergen"]);
    }
}
