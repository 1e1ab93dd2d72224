//! Similarity scoring and reference-based fuzzy correction.

use std::collections::{HashMap, HashSet};

use super::TieBreak;
use crate::model::Correction;

/// Indel similarity ratio in `0..=100`.
///
/// Both strings are lowercased, non-alphanumeric characters become spaces
/// and the ends are trimmed. The ratio is `2 * lcs / (len(a) + len(b))`
/// over characters, where `lcs` is the length of the longest common
/// subsequence. A string that is empty after processing scores 0.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = process(a);
    let b = process(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let total = a.len() + b.len();
    let ratio = 2.0 * lcs_len(&a, &b) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

fn process(s: &str) -> Vec<char> {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    cleaned.trim().chars().collect()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Computes substitution mappings from names to reference spellings.
#[derive(Debug, Clone)]
pub struct FuzzyCorrector<'a> {
    references: &'a [String],
    threshold: u8,
    tie_break: TieBreak,
    candidate_limit: Option<usize>,
}

impl<'a> FuzzyCorrector<'a> {
    /// Create a corrector over a reference list.
    pub fn new(references: &'a [String], threshold: u8) -> Self {
        Self {
            references,
            threshold,
            tie_break: TieBreak::default(),
            candidate_limit: None,
        }
    }

    /// Set the tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Only consider the best `limit` candidates for each reference.
    pub fn with_candidate_limit(mut self, limit: Option<usize>) -> Self {
        self.candidate_limit = limit;
        self
    }

    /// Compute corrections for a set of distinct names.
    ///
    /// References are processed in list order. A name equal to any reference
    /// is never a candidate, so the reference list is a fixed point. The
    /// result is ordered by the candidates' position in `names`.
    pub fn corrections(&self, names: &[String]) -> Vec<Correction> {
        let reference_set: HashSet<&str> = self.references.iter().map(String::as_str).collect();
        let mut chosen: HashMap<&str, (usize, u8)> = HashMap::new();

        for (ref_idx, reference) in self.references.iter().enumerate() {
            let mut scored: Vec<(&str, u8)> = names
                .iter()
                .map(String::as_str)
                .filter(|name| *name != reference.as_str())
                .map(|name| (name, similarity(reference, name)))
                .collect();

            if let Some(limit) = self.candidate_limit {
                // stable sort: equal scores keep first-seen order
                scored.sort_by(|a, b| b.1.cmp(&a.1));
                scored.truncate(limit);
            }

            for (candidate, score) in scored {
                if score < self.threshold || reference_set.contains(candidate) {
                    continue;
                }
                let replace = match (self.tie_break, chosen.get(candidate)) {
                    (_, None) => true,
                    (TieBreak::HighestScore, Some(&(_, best))) => score > best,
                    (TieBreak::LastReference, Some(_)) => true,
                };
                if replace {
                    chosen.insert(candidate, (ref_idx, score));
                }
            }
        }

        let mut seen = HashSet::new();
        names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| {
                chosen.get(name.as_str()).map(|&(ref_idx, score)| Correction {
                    candidate: name.clone(),
                    reference: self.references[ref_idx].clone(),
                    score,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("Rom", "Rom"), 100);
        assert_eq!(similarity("ROM", "rom"), 100);
        assert_eq!(similarity("abc", "xyz"), 0);
        assert_eq!(similarity("", "Rom"), 0);
        assert_eq!(similarity(".", "."), 0);
    }

    #[test]
    fn test_similarity_historic_spelling() {
        // 2 * 9 / (9 + 10)
        assert_eq!(similarity("København", "Kjøbenhavn"), 95);
        // 2 * 3 / (3 + 4)
        assert_eq!(similarity("Rom", "Rome"), 86);
        assert_eq!(similarity("Rom", "Roma"), 86);
    }

    #[test]
    fn test_similarity_ignores_punctuation() {
        assert_eq!(similarity("Kr: teater", "kr; teater"), 100);
        assert_eq!(similarity("Schellingstrasse 30.", "Schellingstrasse 30"), 100);
    }

    #[test]
    fn test_short_variant_corrected() {
        let refs = strings(&["Rom"]);
        let names = strings(&["Rome", "Roma", "Rom"]);
        let corrections = FuzzyCorrector::new(&refs, 80).corrections(&names);

        assert_eq!(corrections.len(), 2);
        assert!(corrections.iter().all(|c| c.reference == "Rom" && c.score == 86));
    }

    #[test]
    fn test_corrections_above_threshold() {
        let refs = strings(&["København", "Sverige"]);
        let names = strings(&["Kjøbenhavn", "Sverig", "Bergen"]);
        let corrections = FuzzyCorrector::new(&refs, 80).corrections(&names);

        assert_eq!(corrections.len(), 2);
        assert_eq!(corrections[0].candidate, "Kjøbenhavn");
        assert_eq!(corrections[0].reference, "København");
        assert_eq!(corrections[1].candidate, "Sverig");
        assert_eq!(corrections[1].reference, "Sverige");
    }

    #[test]
    fn test_reference_names_are_fixed_points() {
        let refs = strings(&["Rom", "Rum"]);
        let names = strings(&["Rom", "Rum"]);
        let corrections = FuzzyCorrector::new(&refs, 50).corrections(&names);
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_tie_break_highest_score() {
        // every name is one substitution away from both references
        let refs = strings(&["Abcdy", "Abcdx"]);
        let names = strings(&["Abcde", "Abcdz"]);

        let corrections = FuzzyCorrector::new(&refs, 80).corrections(&names);
        assert_eq!(corrections.len(), 2);
        // equal scores: the earlier reference wins
        assert!(corrections.iter().all(|c| c.reference == "Abcdy"));

        let corrections = FuzzyCorrector::new(&refs, 80)
            .with_tie_break(TieBreak::LastReference)
            .corrections(&names);
        assert!(corrections.iter().all(|c| c.reference == "Abcdx"));
    }

    #[test]
    fn test_highest_score_beats_order() {
        let refs = strings(&["Bayern", "Bayreuth"]);
        let names = strings(&["Bayreut"]);
        let corrections = FuzzyCorrector::new(&refs, 50).corrections(&names);
        assert_eq!(corrections[0].reference, "Bayreuth");
    }

    #[test]
    fn test_candidate_limit() {
        let refs = strings(&["Dresden"]);
        let names = strings(&["Dresdn", "Dresde", "Dresdem"]);
        let corrections = FuzzyCorrector::new(&refs, 80)
            .with_candidate_limit(Some(1))
            .corrections(&names);
        assert_eq!(corrections.len(), 1);
    }
}
