use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Best cluster for one query, or no cluster with score zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub query_id: u64,
    pub cluster_id: Option<u32>,
    pub article_ids: Vec<u64>,
    pub score: f64,
}

impl MatchResult {
    pub fn no_match(query_id: u64) -> Self {
        Self {
            query_id,
            cluster_id: None,
            article_ids: Vec::new(),
            score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.cluster_id.is_some()
    }

    /// Whether the match is strong enough to notify the query's owner.
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.is_match() && self.score >= threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub articles: Vec<u64>,
    pub match_value: f64,
}

/// `{query_id: {"articles": [...], "match_value": f}}` over queries that found a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchReport {
    pub entries: BTreeMap<u64, MatchEntry>,
}

impl MatchReport {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let entries = results
            .iter()
            .filter(|result| result.is_match())
            .map(|result| {
                (
                    result.query_id,
                    MatchEntry {
                        articles: result.article_ids.clone(),
                        match_value: result.score,
                    },
                )
            })
            .collect();
        Self { entries }
    }
}
