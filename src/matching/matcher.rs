use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::models::MatchResult;
use super::scoring::{MatchScore, QueryTerms, ScoringRule};
use crate::clustering::Cluster;
use crate::core::error::Result;
use crate::keywords::ExtractedKeywords;
use crate::linguistics::LinguisticService;
use crate::query::ExpandedQuery;
use crate::store::KeywordStore;

/// Scores expanded queries against clusters or single articles.
pub struct ClusterMatcher {
    linguistics: Arc<dyn LinguisticService>,
    rule: ScoringRule,
}

impl ClusterMatcher {
    pub fn new(linguistics: Arc<dyn LinguisticService>, rule: ScoringRule) -> Self {
        Self { linguistics, rule }
    }

    pub fn terms(&self, expanded: &ExpandedQuery) -> QueryTerms {
        QueryTerms::from_expanded(expanded, self.linguistics.as_ref())
    }

    /// Normalized aggregated phrases plus every normalized sub-word.
    pub fn cluster_keyword_set(
        &self,
        cluster: &mut Cluster,
        store: &dyn KeywordStore,
    ) -> Result<BTreeSet<String>> {
        let linguistics = self.linguistics.as_ref();
        let phrases: BTreeSet<String> = cluster
            .aggregated_keywords(store)?
            .iter()
            .map(|phrase| linguistics.normalize(phrase))
            .collect();

        let sub_words: Vec<String> = phrases
            .iter()
            .flat_map(|phrase| phrase.split_whitespace())
            .map(|word| linguistics.normalize(word))
            .collect();

        let mut keywords = phrases;
        keywords.extend(sub_words);
        keywords.remove("");
        Ok(keywords)
    }

    /// Normalized phrases of one article, without sub-word explosion.
    pub fn article_keyword_set(&self, keywords: &ExtractedKeywords) -> BTreeSet<String> {
        let linguistics = self.linguistics.as_ref();
        keywords
            .flatten()
            .iter()
            .map(|phrase| linguistics.normalize(phrase))
            .filter(|phrase| !phrase.is_empty())
            .collect()
    }

    pub fn score_cluster(
        &self,
        terms: &QueryTerms,
        cluster: &mut Cluster,
        store: &dyn KeywordStore,
    ) -> Result<MatchScore> {
        let keywords = self.cluster_keyword_set(cluster, store)?;
        Ok(self.rule.score(terms, &keywords))
    }

    pub fn score_article(&self, terms: &QueryTerms, keywords: &ExtractedKeywords) -> MatchScore {
        self.rule.score(terms, &self.article_keyword_set(keywords))
    }

    /// Highest-scoring cluster, visiting clusters in ascending id order so
    /// that the lowest id wins ties.
    pub fn best_match(
        &self,
        expanded: &ExpandedQuery,
        clusters: &mut [Cluster],
        store: &dyn KeywordStore,
    ) -> Result<MatchResult> {
        if clusters.is_empty() {
            debug!("Query {}: no clusters to match", expanded.query_id);
            return Ok(MatchResult::no_match(expanded.query_id));
        }

        clusters.sort_by_key(|cluster| cluster.id);
        let terms = self.terms(expanded);

        let mut best: Option<(usize, f64)> = None;
        for (index, cluster) in clusters.iter_mut().enumerate() {
            let fraction = self.score_cluster(&terms, cluster, store)?.fraction();
            debug!(
                "Query {} vs cluster {}: {:.3}",
                expanded.query_id, cluster.id, fraction
            );
            if best.is_none_or(|(_, top)| fraction > top) {
                best = Some((index, fraction));
            }
        }

        let Some((index, score)) = best else {
            return Ok(MatchResult::no_match(expanded.query_id));
        };
        let cluster = &clusters[index];
        info!(
            "Query {} best matches cluster {} ({:.3})",
            expanded.query_id, cluster.id, score
        );
        Ok(MatchResult {
            query_id: expanded.query_id,
            cluster_id: Some(cluster.id),
            article_ids: cluster.article_ids().to_vec(),
            score,
        })
    }
}
