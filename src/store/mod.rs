pub mod file;
pub mod memory;

pub use file::JsonFileKeywordStore;
pub use memory::{InMemoryKeywordStore, InMemoryQueryStore};

use crate::core::error::Result;
use crate::keywords::ExtractedKeywords;
use crate::query::{Query, QueryWordRow};

/// Persisted per-article keyword documents.
pub trait KeywordStore: Send + Sync {
    fn get(&self, article_id: u64) -> Result<Option<ExtractedKeywords>>;

    fn put(&self, article_id: u64, keywords: &ExtractedKeywords) -> Result<()>;

    fn contains(&self, article_id: u64) -> Result<bool> {
        Ok(self.get(article_id)?.is_some())
    }
}

/// Structured queries and the synonym rows computed for them.
pub trait QueryStore: Send + Sync {
    fn unprocessed_queries(&self) -> Result<Vec<Query>>;

    fn all_queries(&self) -> Result<Vec<Query>>;

    fn insert_query_words(&self, rows: &[QueryWordRow]) -> Result<()>;

    fn query_words(&self, query_id: u64) -> Result<Vec<QueryWordRow>>;

    fn mark_processed(&self, query_id: u64) -> Result<()>;
}
