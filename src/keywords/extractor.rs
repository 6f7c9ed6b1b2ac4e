use std::collections::BTreeMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use super::models::{ExtractedKeywords, KeywordCandidate};
use super::preprocess::{Preprocessor, stem_phrase};
use super::rake::Rake;
use crate::core::config::DetectionConfig;
use crate::core::pos::PosTag;
use crate::corpus::Article;
use crate::linguistics::LinguisticService;

lazy_static! {
    static ref MULTI_WORD_RE: Regex = Regex::new(r"^[a-zA-Z]+ (.*)[a-zA-Z]+$").unwrap();
}

/// Turns an article's tagged title and body into POS-bucketed keyword phrases.
pub struct KeywordExtractor {
    linguistics: Arc<dyn LinguisticService>,
    config: DetectionConfig,
}

impl KeywordExtractor {
    pub fn new(linguistics: Arc<dyn LinguisticService>, config: DetectionConfig) -> Self {
        Self {
            linguistics,
            config,
        }
    }

    pub fn extract(&self, article: &Article) -> ExtractedKeywords {
        let body_chars = article.body_tagged.chars().count();
        let mut keywords = self.extract_segment(
            &article.body_tagged,
            self.config.max_words_in_keyword,
            self.config.body_min_occurrences(body_chars),
        );
        let title_keywords = self.extract_segment(
            &article.title_tagged,
            self.config.max_words_title,
            self.config.min_occurrences_title,
        );
        keywords.merge(title_keywords);

        debug!(
            "Extracted {} keywords from article {}",
            keywords.len(),
            article.id()
        );
        keywords
    }

    /// Extracts from one tagged segment with the given phrase length cap and
    /// repetition floor.
    pub fn extract_segment(
        &self,
        tagged_text: &str,
        max_words: usize,
        min_occurrences: usize,
    ) -> ExtractedKeywords {
        let linguistics = self.linguistics.as_ref();
        let text = Preprocessor::new(linguistics).preprocess(tagged_text);
        let scored = Rake::new(linguistics)
            .with_limits(self.config.min_letters_in_keyword, max_words, min_occurrences)
            .run(&text.sentences);

        self.tag_keywords(&scored, &text.candidates)
    }

    /// Maps each stemmed phrase back to surface phrases and POS buckets.
    fn tag_keywords(
        &self,
        scored: &BTreeMap<String, f64>,
        candidates: &BTreeMap<String, Vec<KeywordCandidate>>,
    ) -> ExtractedKeywords {
        let mut keywords = ExtractedKeywords::new();

        for (keyword, weight) in scored {
            let weight = *weight;
            if !keyword.chars().any(|c| c.is_ascii_alphabetic()) {
                continue;
            }

            if let Some(instances) = candidates.get(keyword) {
                for instance in instances {
                    keywords.insert(instance.tag, instance.word.clone(), weight);
                }
                continue;
            }

            if MULTI_WORD_RE.is_match(keyword) {
                self.tag_multi_word(keyword, weight, candidates, &mut keywords);
            }
        }

        keywords
    }

    fn tag_multi_word(
        &self,
        keyword: &str,
        weight: f64,
        candidates: &BTreeMap<String, Vec<KeywordCandidate>>,
        keywords: &mut ExtractedKeywords,
    ) {
        let words: Vec<&str> = keyword.split_whitespace().collect();
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            return;
        };
        let (Some(first_instances), Some(last_instances)) = (candidates.get(*first), candidates.get(*last))
        else {
            warn!("No occurrence recorded for the ends of {:?}", keyword);
            return;
        };

        let (first_tag, first_context) = self.find_context(keyword, first_instances);
        let (last_tag, last_context) = self.find_context(keyword, last_instances);
        let Some(unstemmed) = first_context.or(last_context) else {
            debug!("No surface context for {:?}", keyword);
            return;
        };

        let mut bucketed = false;
        if first_tag.is_verb() && !first_tag.is_gerund() {
            keywords.insert(first_tag, unstemmed.clone(), weight);
            bucketed = true;
        }
        if last_tag.is_noun() || last_tag.is_gerund() {
            keywords.insert(last_tag, unstemmed.clone(), weight);
            bucketed = true;
        }
        if !bucketed {
            keywords.insert(PosTag::Unknown, unstemmed, weight);
        }
    }

    /// First occurrence context whose stems spell `keyword`, with that occurrence's tag.
    fn find_context(&self, keyword: &str, instances: &[KeywordCandidate]) -> (PosTag, Option<String>) {
        let linguistics = self.linguistics.as_ref();
        for instance in instances {
            for context in &instance.contexts {
                if stem_phrase(linguistics, context) == keyword {
                    return (instance.tag, Some(context.clone()));
                }
            }
        }
        (PosTag::Unknown, None)
    }
}
