use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clustering::{Cluster, HierarchicalClusterer, MatrixBuilder};
use crate::core::config::DetectionConfig;
use crate::core::error::Result;
use crate::corpus::{Article, CorpusProvider};
use crate::keywords::KeywordExtractor;
use crate::linguistics::LinguisticService;
use crate::matching::{ClusterMatcher, MatchReport, MatchResult, ScoringRule};
use crate::query::{ExpandedQuery, QueryExpander};
use crate::store::{KeywordStore, QueryStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub extracted: usize,
    pub reused: usize,
    pub skipped: usize,
}

/// Outcome of one full batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub articles_extracted: usize,
    pub articles_reused: usize,
    pub articles_skipped: usize,
    pub queries_processed: usize,
    pub clusters: Vec<Cluster>,
    pub matches: Vec<MatchResult>,
}

impl RunReport {
    pub fn match_report(&self) -> MatchReport {
        MatchReport::from_results(&self.matches)
    }

    /// Matches strong enough to alert the query's owner.
    pub fn notifications(&self, threshold: f64) -> Vec<&MatchResult> {
        self.matches
            .iter()
            .filter(|result| result.meets_threshold(threshold))
            .collect()
    }
}

/// Batch pipeline over injected collaborators: keyword extraction, query
/// expansion, clustering of the whole corpus, then query matching.
pub struct EventDetectionPipeline {
    linguistics: Arc<dyn LinguisticService>,
    corpus: Box<dyn CorpusProvider>,
    keyword_store: Box<dyn KeywordStore>,
    query_store: Box<dyn QueryStore>,
    config: DetectionConfig,
}

impl EventDetectionPipeline {
    pub fn new(
        linguistics: Arc<dyn LinguisticService>,
        corpus: Box<dyn CorpusProvider>,
        keyword_store: Box<dyn KeywordStore>,
        query_store: Box<dyn QueryStore>,
        config: DetectionConfig,
    ) -> Self {
        Self {
            linguistics,
            corpus,
            keyword_store,
            query_store,
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn keyword_store(&self) -> &dyn KeywordStore {
        self.keyword_store.as_ref()
    }

    pub fn query_store(&self) -> &dyn QueryStore {
        self.query_store.as_ref()
    }

    /// Extracts and stores keywords for articles that have none stored yet,
    /// or for every article when `reextract` is set.
    pub fn process_articles(&self, reextract: bool) -> Result<ExtractionSummary> {
        let extractor = KeywordExtractor::new(self.linguistics.clone(), self.config.clone());
        let mut summary = ExtractionSummary::default();

        for record in self.corpus.records()? {
            if !reextract && self.keyword_store.contains(record.id)? {
                summary.reused += 1;
                continue;
            }

            let article = match self.corpus.load_article(&record) {
                Ok(article) => article,
                Err(err) => {
                    warn!("Skipping article {}: {}", record.id, err);
                    summary.skipped += 1;
                    continue;
                }
            };

            let keywords = extractor.extract(&article);
            self.keyword_store.put(record.id, &keywords)?;
            summary.extracted += 1;
        }

        info!(
            "Articles: {} extracted, {} reused, {} skipped",
            summary.extracted, summary.reused, summary.skipped
        );
        Ok(summary)
    }

    /// Expands every unprocessed query, stores its synonym rows and marks it processed.
    pub fn process_queries(&self) -> Result<usize> {
        let expander = QueryExpander::new(self.linguistics.clone());
        let pending = self.query_store.unprocessed_queries()?;

        for query in &pending {
            let expanded = expander.expand(query);
            self.query_store.insert_query_words(&expanded.to_rows())?;
            self.query_store.mark_processed(query.id)?;
        }

        info!("Processed {} queries", pending.len());
        Ok(pending.len())
    }

    /// Clusters every parseable article of the corpus and returns the valid clusters.
    pub fn detect_events(&self) -> Result<Vec<Cluster>> {
        let articles = self.load_articles()?;
        let matrix = MatrixBuilder::new(self.linguistics.clone()).build_from_articles(&articles);
        let clusters = HierarchicalClusterer::from_config(&self.config).cluster(&matrix);

        info!(
            "Detected {} events over {} articles",
            clusters.len(),
            articles.len()
        );
        Ok(clusters)
    }

    /// Best cluster per query, from the synonym rows stored for each query.
    pub fn match_queries(&self, clusters: &mut [Cluster], query_ids: &[u64]) -> Result<Vec<MatchResult>> {
        let matcher = ClusterMatcher::new(self.linguistics.clone(), ScoringRule::from_config(&self.config));
        let mut results = Vec::with_capacity(query_ids.len());

        for query_id in query_ids {
            let rows = self.query_store.query_words(*query_id)?;
            let expanded = ExpandedQuery::from_rows(*query_id, &rows);
            match matcher.best_match(&expanded, clusters, self.keyword_store.as_ref()) {
                Ok(result) => results.push(result),
                Err(err) => warn!("Query {} could not be matched: {}", query_id, err),
            }
        }

        Ok(results)
    }

    pub fn run(&self, reextract: bool) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("Starting run {}", run_id);

        let summary = self.process_articles(reextract)?;
        let queries_processed = self.process_queries()?;
        let mut clusters = self.detect_events()?;

        let query_ids: Vec<u64> = self
            .query_store
            .all_queries()?
            .iter()
            .map(|query| query.id)
            .collect();
        let matches = self.match_queries(&mut clusters, &query_ids)?;

        let finished_at = Utc::now();
        info!(
            "Run {} finished in {} ms",
            run_id,
            (finished_at - started_at).num_milliseconds()
        );

        Ok(RunReport {
            run_id,
            started_at,
            finished_at,
            articles_extracted: summary.extracted,
            articles_reused: summary.reused,
            articles_skipped: summary.skipped,
            queries_processed,
            clusters,
            matches,
        })
    }

    fn load_articles(&self) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        for record in self.corpus.records()? {
            match self.corpus.load_article(&record) {
                Ok(article) => articles.push(article),
                Err(err) => warn!("Leaving article {} out of clustering: {}", record.id, err),
            }
        }
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{ArticleRecord, InMemoryCorpus};
    use crate::linguistics::LexiconLinguistics;
    use crate::query::{Query, QueryRoles};
    use crate::store::{InMemoryKeywordStore, InMemoryQueryStore};

    const UNRELATED_WORDS: [&str; 15] = [
        "harbor", "carbon", "violin", "pilot", "garden", "tunnel", "rocket", "dragon", "falcon",
        "marathon", "canyon", "lemon", "robot", "jacket", "magnet",
    ];

    fn record(id: u64, title: &str) -> ArticleRecord {
        ArticleRecord {
            id,
            title: title.to_string(),
            url: format!("https://news.example/{id}"),
            source: "wire".to_string(),
            filename: format!("{id}.txt"),
        }
    }

    fn repeated(sentence: &str, times: usize) -> String {
        vec![sentence; times].join(" ")
    }

    /// Four identical election reports, one article mentioning the president
    /// often, and fifteen unrelated single-topic articles.
    fn election_corpus() -> InMemoryCorpus {
        let mut corpus = InMemoryCorpus::new();
        for id in 1..=4 {
            corpus.push(
                record(id, "Election results"),
                "TITLE: Election_NN results_NNS\nTEXT: President_NNP wins_VBZ the_DT election_NN ._.",
            );
        }
        corpus.push(
            record(5, "Anchor"),
            format!(
                "TITLE: Anchor_NN\nTEXT: {} {}",
                repeated("President_NNP ._.", 5),
                repeated("anchor_NN ._.", 4)
            ),
        );
        for (offset, word) in UNRELATED_WORDS.iter().enumerate() {
            let id = 6 + offset as u64;
            corpus.push(
                record(id, word),
                format!(
                    "TITLE: {word}_NN\nTEXT: President_NNP ._. {}",
                    repeated(&format!("{word}_NN ._."), 4)
                ),
            );
        }
        corpus
    }

    fn query(id: u64, subject: &str, verb: &str, direct_obj: &str) -> Query {
        Query::new(
            id,
            QueryRoles {
                subject: subject.to_string(),
                verb: verb.to_string(),
                direct_obj: direct_obj.to_string(),
                ..QueryRoles::default()
            },
        )
    }

    fn pipeline(corpus: InMemoryCorpus, queries: Vec<Query>) -> EventDetectionPipeline {
        EventDetectionPipeline::new(
            Arc::new(LexiconLinguistics::new()),
            Box::new(corpus),
            Box::new(InMemoryKeywordStore::new()),
            Box::new(InMemoryQueryStore::with_queries(queries)),
            DetectionConfig::default(),
        )
    }

    #[test]
    fn test_full_run_detects_election_event() {
        let pipeline = pipeline(
            election_corpus(),
            vec![
                query(1, "President", "wins", "election"),
                query(2, "The", "is", "about"),
            ],
        );

        let report = pipeline.run(false).unwrap();

        assert_eq!(report.articles_extracted, 20);
        assert_eq!(report.queries_processed, 2);
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(report.clusters[0].article_ids(), &[1, 2, 3, 4]);

        let election = &report.matches[0];
        assert_eq!(election.cluster_id, Some(report.clusters[0].id));
        assert!((election.score - 1.0).abs() < 1e-9);
        assert_eq!(report.notifications(0.1).len(), 1);

        let stoplisted = &report.matches[1];
        assert_eq!(stoplisted.score, 0.0);
    }

    #[test]
    fn test_second_run_reuses_stored_keywords() {
        let pipeline = pipeline(election_corpus(), Vec::new());

        let first = pipeline.process_articles(false).unwrap();
        let stored = pipeline.keyword_store().get(1).unwrap();
        let second = pipeline.process_articles(false).unwrap();
        let forced = pipeline.process_articles(true).unwrap();

        assert_eq!(first.extracted, 20);
        assert_eq!(second.reused, 20);
        assert_eq!(second.extracted, 0);
        assert_eq!(forced.extracted, 20);
        assert_eq!(pipeline.keyword_store().get(1).unwrap(), stored);
    }

    #[test]
    fn test_malformed_article_is_skipped() {
        let mut corpus = InMemoryCorpus::new();
        corpus.push(record(1, "ok"), "TITLE: Vote_NN\nTEXT: Senate_NNP votes_VBZ ._.");
        corpus.push(record(2, "broken"), "no markers here");
        let pipeline = pipeline(corpus, Vec::new());

        let summary = pipeline.process_articles(false).unwrap();

        assert_eq!(summary.extracted, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!pipeline.keyword_store().contains(2).unwrap());
    }

    #[test]
    fn test_empty_corpus_yields_no_match() {
        let pipeline = pipeline(InMemoryCorpus::new(), vec![query(1, "Obama", "sign", "law")]);

        let report = pipeline.run(false).unwrap();

        assert!(report.clusters.is_empty());
        assert_eq!(report.matches.len(), 1);
        assert!(!report.matches[0].is_match());
        assert_eq!(report.matches[0].score, 0.0);
        assert!(report.match_report().entries.is_empty());
    }

    #[test]
    fn test_processed_queries_are_not_expanded_twice() {
        let pipeline = pipeline(InMemoryCorpus::new(), vec![query(1, "Obama", "sign", "law")]);

        assert_eq!(pipeline.process_queries().unwrap(), 1);
        assert_eq!(pipeline.process_queries().unwrap(), 0);
        assert_eq!(pipeline.query_store().query_words(1).unwrap().len(), 3);
    }
}
