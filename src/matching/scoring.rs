use std::collections::{BTreeMap, BTreeSet};

use crate::core::config::DetectionConfig;
use crate::linguistics::LinguisticService;
use crate::query::ExpandedQuery;

/// Query words and synonyms in normalized form. Words that normalize to
/// the same string count once and pool their synonyms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    words: BTreeMap<String, BTreeSet<String>>,
}

impl QueryTerms {
    pub fn from_expanded(expanded: &ExpandedQuery, linguistics: &dyn LinguisticService) -> Self {
        let mut words: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (word, synonyms) in expanded.words() {
            let normalized = linguistics.normalize(word);
            if normalized.is_empty() {
                continue;
            }
            let pooled = words.entry(normalized).or_default();
            pooled.extend(
                synonyms
                    .iter()
                    .map(|synonym| linguistics.normalize(synonym))
                    .filter(|synonym| !synonym.is_empty()),
            );
        }
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> + '_ {
        self.words.iter().map(|(word, synonyms)| (word.as_str(), synonyms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchScore {
    pub score: u32,
    pub max_score: u32,
}

impl MatchScore {
    /// Zero when there was nothing to match.
    pub fn fraction(&self) -> f64 {
        if self.max_score == 0 {
            0.0
        } else {
            self.score as f64 / self.max_score as f64
        }
    }
}

/// Exact hits earn full points, synonym-only hits partial points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRule {
    pub exact_points: u32,
    pub synonym_points: u32,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            exact_points: 2,
            synonym_points: 1,
        }
    }
}

impl ScoringRule {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            exact_points: config.exact_match_points,
            synonym_points: config.synonym_match_points.min(config.exact_match_points),
        }
    }

    pub fn score(&self, terms: &QueryTerms, keywords: &BTreeSet<String>) -> MatchScore {
        let mut result = MatchScore::default();
        for (word, synonyms) in terms.iter() {
            result.max_score += self.exact_points;
            if keywords.contains(word) {
                result.score += self.exact_points;
            } else if synonyms.iter().any(|synonym| keywords.contains(synonym)) {
                result.score += self.synonym_points;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pos::PosTag;
    use crate::linguistics::LexiconLinguistics;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn obama_sign_law() -> ExpandedQuery {
        let mut expanded = ExpandedQuery::new(1);
        expanded.add_word(PosTag::Nnp, "Obama", Vec::new());
        expanded.add_word(PosTag::Nn, "sign", vec!["mark".to_string()]);
        expanded.add_word(PosTag::Nn, "law", vec!["jurisprudence".to_string()]);
        expanded
    }

    #[test]
    fn test_exact_hits_without_synonym_overlap() {
        let linguistics = LexiconLinguistics::new();
        let terms = QueryTerms::from_expanded(&obama_sign_law(), &linguistics);
        let score = ScoringRule::default().score(&terms, &set(&["obama", "sign", "senat"]));

        assert_eq!(score, MatchScore { score: 4, max_score: 6 });
        assert!((score.fraction() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_synonym_hit_earns_partial_points() {
        let linguistics = LexiconLinguistics::new();
        let terms = QueryTerms::from_expanded(&obama_sign_law(), &linguistics);
        let mut keywords = set(&["obama", "sign"]);
        keywords.insert(linguistics.normalize("jurisprudence"));
        let score = ScoringRule::default().score(&terms, &keywords);

        assert_eq!(score, MatchScore { score: 5, max_score: 6 });
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let linguistics = LexiconLinguistics::new();
        let terms = QueryTerms::from_expanded(&ExpandedQuery::new(2), &linguistics);
        let score = ScoringRule::default().score(&terms, &set(&["obama"]));

        assert_eq!(score.max_score, 0);
        assert_eq!(score.fraction(), 0.0);
    }

    #[test]
    fn test_duplicate_normalized_words_count_once() {
        let linguistics = LexiconLinguistics::new();
        let mut expanded = ExpandedQuery::new(3);
        expanded.add_word(PosTag::Nns, "laws", vec!["statutes".to_string()]);
        expanded.add_word(PosTag::Nn, "law", vec!["rule".to_string()]);

        let terms = QueryTerms::from_expanded(&expanded, &linguistics);
        assert_eq!(terms.len(), 1);
        let (word, synonyms) = terms.iter().next().unwrap();
        assert_eq!(word, "law");
        let expected: BTreeSet<String> = [linguistics.normalize("rule"), linguistics.normalize("statutes")]
            .into_iter()
            .collect();
        assert_eq!(synonyms, &expected);
    }

    #[test]
    fn test_fraction_stays_in_unit_interval() {
        let linguistics = LexiconLinguistics::new();
        let terms = QueryTerms::from_expanded(&obama_sign_law(), &linguistics);
        let rule = ScoringRule::default();
        for keywords in [set(&[]), set(&["obama"]), set(&["obama", "sign", "law", "extra"])] {
            let fraction = rule.score(&terms, &keywords).fraction();
            assert!((0.0..=1.0).contains(&fraction));
        }
    }
}
