//! Frequency counting of canonical names.

use std::collections::BTreeMap;

use crate::model::{CanonicalMention, FrequencyRecord};

/// Count occurrences of each name.
///
/// Returns one record per distinct name, sorted by name.
pub fn count_names<'a, I>(names: I) -> Vec<FrequencyRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(name, count)| FrequencyRecord::new(name, count))
        .collect()
}

/// Count the canonical names of normalized mentions.
pub fn count_mentions(mentions: &[CanonicalMention]) -> Vec<FrequencyRecord> {
    count_names(mentions.iter().map(|m| m.canonical.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::total_count;

    #[test]
    fn test_count_names() {
        let records = count_names(["Rom", "Dresden", "Rom", "München"]);
        assert_eq!(
            records,
            vec![
                FrequencyRecord::new("Dresden", 1),
                FrequencyRecord::new("München", 1),
                FrequencyRecord::new("Rom", 2),
            ]
        );
        assert_eq!(total_count(&records), 4);
    }

    #[test]
    fn test_count_empty() {
        assert!(count_names(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_count_mentions() {
        let mentions = vec![
            CanonicalMention {
                document_id: "a".into(),
                raw: "Danmarks".into(),
                canonical: "Danmark".into(),
            },
            CanonicalMention {
                document_id: "b".into(),
                raw: "Danmark".into(),
                canonical: "Danmark".into(),
            },
        ];
        assert_eq!(count_mentions(&mentions), vec![FrequencyRecord::new("Danmark", 2)]);
    }
}
