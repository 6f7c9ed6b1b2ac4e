use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::pos::PosTag;

/// One stemmed word occurrence with the surface phrases it appears in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCandidate {
    pub word: String,
    pub tag: PosTag,
    /// Neighbouring two- and three-word windows, in original case.
    pub contexts: BTreeSet<String>,
}

/// Persisted form: `{"NN": [["phrase", weight], ...], ...}`.
type KeywordDocument = BTreeMap<PosTag, Vec<(String, f64)>>;

/// Weighted keyword phrases of one article, bucketed by part of speech.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "KeywordDocument", into = "KeywordDocument")]
pub struct ExtractedKeywords {
    buckets: BTreeMap<PosTag, BTreeMap<String, f64>>,
}

impl ExtractedKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weight of `phrase` under `tag`, replacing any earlier weight.
    pub fn insert(&mut self, tag: PosTag, phrase: impl Into<String>, weight: f64) {
        self.buckets
            .entry(tag)
            .or_default()
            .insert(phrase.into(), weight);
    }

    /// Folds `other` into buckets this set already has, summing shared
    /// phrases. Buckets present only in `other` are dropped.
    pub fn merge(&mut self, other: ExtractedKeywords) {
        for (tag, phrases) in other.buckets {
            let Some(bucket) = self.buckets.get_mut(&tag) else {
                continue;
            };
            for (phrase, weight) in phrases {
                *bucket.entry(phrase).or_insert(0.0) += weight;
            }
        }
    }

    pub fn bucket(&self, tag: PosTag) -> Option<&BTreeMap<String, f64>> {
        self.buckets.get(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = PosTag> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PosTag, &str, f64)> + '_ {
        self.buckets.iter().flat_map(|(tag, phrases)| {
            phrases
                .iter()
                .map(move |(phrase, weight)| (*tag, phrase.as_str(), *weight))
        })
    }

    /// Every phrase across all buckets, parts of speech and weights discarded.
    pub fn flatten(&self) -> BTreeSet<String> {
        self.buckets
            .values()
            .flat_map(|phrases| phrases.keys().cloned())
            .collect()
    }

    /// Number of (tag, phrase) entries.
    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<KeywordDocument> for ExtractedKeywords {
    fn from(document: KeywordDocument) -> Self {
        let buckets = document
            .into_iter()
            .map(|(tag, pairs)| (tag, pairs.into_iter().collect()))
            .collect();
        Self { buckets }
    }
}

impl From<ExtractedKeywords> for KeywordDocument {
    fn from(keywords: ExtractedKeywords) -> Self {
        keywords
            .buckets
            .into_iter()
            .map(|(tag, phrases)| (tag, phrases.into_iter().collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_sums_shared_phrases_within_existing_buckets() {
        let mut body = ExtractedKeywords::new();
        body.insert(PosTag::Nn, "election", 2.0);
        body.insert(PosTag::Nnp, "obama", 1.0);

        let mut title = ExtractedKeywords::new();
        title.insert(PosTag::Nn, "election", 1.5);
        title.insert(PosTag::Nn, "ballot", 1.0);
        title.insert(PosTag::Unknown, "vote count", 4.0);

        body.merge(title);

        let nouns = body.bucket(PosTag::Nn).unwrap();
        assert!((nouns["election"] - 3.5).abs() < 1e-9);
        assert!((nouns["ballot"] - 1.0).abs() < 1e-9);
        assert!(body.bucket(PosTag::Unknown).is_none());
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn test_flatten_discards_tags() {
        let mut keywords = ExtractedKeywords::new();
        keywords.insert(PosTag::Nn, "law", 1.0);
        keywords.insert(PosTag::Vb, "law", 1.0);
        keywords.insert(PosTag::Vb, "sign", 1.0);

        let flat = keywords.flatten();
        assert_eq!(flat.len(), 2);
        assert!(flat.contains("law"));
        assert!(flat.contains("sign"));
    }

    #[test]
    fn test_json_document_shape() {
        let mut keywords = ExtractedKeywords::new();
        keywords.insert(PosTag::Nnp, "Barack Obama", 4.0);
        keywords.insert(PosTag::Unknown, "vote count", 1.5);

        let json = serde_json::to_value(&keywords).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"NNP": [["Barack Obama", 4.0]], "XXX": [["vote count", 1.5]]})
        );

        let back: ExtractedKeywords = serde_json::from_value(json).unwrap();
        assert_eq!(back, keywords);
    }

    #[test]
    fn test_empty_keywords() {
        let keywords = ExtractedKeywords::new();
        assert!(keywords.is_empty());
        assert!(keywords.flatten().is_empty());
        assert_eq!(keywords.iter().count(), 0);
    }
}
