use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use super::{KeywordStore, QueryStore};
use crate::core::error::{DetectionError, Result};
use crate::keywords::ExtractedKeywords;
use crate::query::{Query, QueryWordRow};

fn poisoned<T>(_: PoisonError<T>) -> DetectionError {
    DetectionError::Store("store lock poisoned".to_string())
}

#[derive(Debug, Default)]
pub struct InMemoryKeywordStore {
    documents: RwLock<HashMap<u64, ExtractedKeywords>>,
}

impl InMemoryKeywordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|documents| documents.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeywordStore for InMemoryKeywordStore {
    fn get(&self, article_id: u64) -> Result<Option<ExtractedKeywords>> {
        let documents = self.documents.read().map_err(poisoned)?;
        Ok(documents.get(&article_id).cloned())
    }

    fn put(&self, article_id: u64, keywords: &ExtractedKeywords) -> Result<()> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        documents.insert(article_id, keywords.clone());
        Ok(())
    }

    fn contains(&self, article_id: u64) -> Result<bool> {
        let documents = self.documents.read().map_err(poisoned)?;
        Ok(documents.contains_key(&article_id))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryQueryStore {
    queries: RwLock<Vec<Query>>,
    words: RwLock<Vec<QueryWordRow>>,
}

impl InMemoryQueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queries(queries: Vec<Query>) -> Self {
        Self {
            queries: RwLock::new(queries),
            words: RwLock::new(Vec::new()),
        }
    }

    /// Reads a JSON array of queries.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let queries: Vec<Query> = serde_json::from_str(&text)?;
        Ok(Self::with_queries(queries))
    }
}

impl QueryStore for InMemoryQueryStore {
    fn unprocessed_queries(&self) -> Result<Vec<Query>> {
        let queries = self.queries.read().map_err(poisoned)?;
        Ok(queries.iter().filter(|query| !query.processed).cloned().collect())
    }

    fn all_queries(&self) -> Result<Vec<Query>> {
        let queries = self.queries.read().map_err(poisoned)?;
        Ok(queries.clone())
    }

    fn insert_query_words(&self, rows: &[QueryWordRow]) -> Result<()> {
        let mut words = self.words.write().map_err(poisoned)?;
        words.extend_from_slice(rows);
        Ok(())
    }

    fn query_words(&self, query_id: u64) -> Result<Vec<QueryWordRow>> {
        let words = self.words.read().map_err(poisoned)?;
        Ok(words
            .iter()
            .filter(|row| row.query_id == query_id)
            .cloned()
            .collect())
    }

    fn mark_processed(&self, query_id: u64) -> Result<()> {
        let mut queries = self.queries.write().map_err(poisoned)?;
        let query = queries
            .iter_mut()
            .find(|query| query.id == query_id)
            .ok_or_else(|| DetectionError::Store(format!("unknown query {query_id}")))?;
        query.processed = true;
        Ok(())
    }
}
