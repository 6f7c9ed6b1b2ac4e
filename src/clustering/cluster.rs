use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;

use crate::core::error::{DetectionError, Result};
use crate::store::KeywordStore;

pub const DEFAULT_VALIDITY_DIVISOR: usize = 4;

/// A group of topically similar articles. Keywords are aggregated lazily
/// from the keyword store; membership is frozen once they have been.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: u32,
    article_ids: Vec<u64>,
    titles: Vec<String>,
    #[serde(skip)]
    keywords: Option<BTreeSet<String>>,
}

impl Cluster {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            article_ids: Vec::new(),
            titles: Vec::new(),
            keywords: None,
        }
    }

    pub fn add_member(&mut self, article_id: u64, title: impl Into<String>) -> Result<()> {
        if self.keywords.is_some() {
            return Err(DetectionError::ClusterSealed(self.id));
        }
        self.article_ids.push(article_id);
        self.titles.push(title.into());
        Ok(())
    }

    pub fn article_ids(&self) -> &[u64] {
        &self.article_ids
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.article_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.article_ids.is_empty()
    }

    /// `1 < size < total / 4`.
    pub fn is_valid(&self, total_articles: usize) -> bool {
        self.is_valid_for(total_articles, DEFAULT_VALIDITY_DIVISOR)
    }

    pub fn is_valid_for(&self, total_articles: usize, divisor: usize) -> bool {
        let size = self.len();
        size > 1 && (size as f64) < total_articles as f64 / divisor.max(1) as f64
    }

    pub fn is_sealed(&self) -> bool {
        self.keywords.is_some()
    }

    /// Union of every member's stored keyword phrases. Computed on first
    /// call and cached; members without stored keywords are skipped.
    pub fn aggregated_keywords(&mut self, store: &dyn KeywordStore) -> Result<&BTreeSet<String>> {
        if self.keywords.is_none() {
            let mut union = BTreeSet::new();
            for article_id in &self.article_ids {
                match store.get(*article_id)? {
                    Some(keywords) => union.extend(keywords.flatten()),
                    None => warn!(
                        "Cluster {}: no stored keywords for article {}",
                        self.id, article_id
                    ),
                }
            }
            self.keywords = Some(union);
        }

        Ok(self.keywords.get_or_insert_with(BTreeSet::new))
    }
}
