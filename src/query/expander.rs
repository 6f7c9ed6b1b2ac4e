use std::sync::Arc;

use tracing::debug;

use super::models::{ExpandedQuery, Query};
use crate::linguistics::LinguisticService;

/// Tags a query's text and attaches class-restricted synonyms to every
/// non-stoplisted word. Words are kept unnormalized.
pub struct QueryExpander {
    linguistics: Arc<dyn LinguisticService>,
}

impl QueryExpander {
    pub fn new(linguistics: Arc<dyn LinguisticService>) -> Self {
        Self { linguistics }
    }

    pub fn expand(&self, query: &Query) -> ExpandedQuery {
        let text = query.text();
        let tokens = self.linguistics.tokenize(&text);
        let tagged = self.linguistics.pos_tag(&tokens);

        let mut expanded = ExpandedQuery::new(query.id);
        for (word, tag) in tagged {
            if tag.is_punctuation() || self.linguistics.is_stopword(&word.to_lowercase()) {
                continue;
            }
            let synonyms = match tag.class() {
                Some(class) => self.linguistics.synonyms(&word, class),
                None => Vec::new(),
            };
            expanded.add_word(tag, word, synonyms);
        }

        debug!(
            "Expanded query {} into {} words",
            query.id,
            expanded.word_count()
        );
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pos::{PosClass, PosTag};
    use crate::linguistics::{LexiconLinguistics, Thesaurus};
    use crate::query::models::QueryRoles;

    fn expander() -> QueryExpander {
        let mut thesaurus = Thesaurus::default();
        thesaurus.insert(PosClass::Noun, "law", &["statute", "jurisprudence"]);
        thesaurus.insert(PosClass::Verb, "law", &["legislate"]);
        QueryExpander::new(Arc::new(LexiconLinguistics::new().with_thesaurus(thesaurus)))
    }

    fn query(subject: &str, verb: &str, direct_obj: &str) -> Query {
        Query::new(
            1,
            QueryRoles {
                subject: subject.to_string(),
                verb: verb.to_string(),
                direct_obj: direct_obj.to_string(),
                ..QueryRoles::default()
            },
        )
    }

    #[test]
    fn test_expands_by_word_class() {
        let expanded = expander().expand(&query("Obama", "sign", "law"));

        assert_eq!(expanded.word_count(), 3);
        let nouns = &expanded.synonyms_with_tag[&PosTag::Nn];
        assert_eq!(nouns["law"], vec!["statute", "jurisprudence"]);
        assert!(expanded.synonyms_with_tag[&PosTag::Nnp]["Obama"].is_empty());
    }

    #[test]
    fn test_stoplisted_words_are_dropped() {
        let expanded = expander().expand(&query("The", "is", "about"));
        assert_eq!(expanded.word_count(), 0);
    }

    #[test]
    fn test_unclassed_tags_get_no_synonyms() {
        let expanded = expander().expand(&query("1999", "", ""));
        assert!(expanded.synonyms_with_tag[&PosTag::Cd]["1999"].is_empty());
    }
}
