use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::article::{Article, ArticleRecord};
use crate::core::error::Result;

/// Source of article records and their tagged text.
pub trait CorpusProvider: Send + Sync {
    /// Records whose tagged text is available for reading.
    fn records(&self) -> Result<Vec<ArticleRecord>>;

    fn read_tagged_text(&self, record: &ArticleRecord) -> Result<String>;

    fn load_article(&self, record: &ArticleRecord) -> Result<Article> {
        let raw = self.read_tagged_text(record)?;
        Article::parse(record.clone(), &raw)
    }
}

/// Corpus laid out as a directory holding `index.json` (an array of
/// records) and one tagged text file per article.
pub struct DirectoryCorpus {
    root: PathBuf,
}

impl DirectoryCorpus {
    pub const INDEX_FILE: &'static str = "index.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn article_path(&self, record: &ArticleRecord) -> PathBuf {
        self.root.join(&record.filename)
    }
}

impl CorpusProvider for DirectoryCorpus {
    fn records(&self) -> Result<Vec<ArticleRecord>> {
        let index_path = self.root.join(Self::INDEX_FILE);
        if !index_path.exists() {
            warn!("No corpus index at {}, treating corpus as empty", index_path.display());
            return Ok(Vec::new());
        }

        let text = std::fs::read_to_string(&index_path)?;
        let records: Vec<ArticleRecord> = serde_json::from_str(&text)?;
        let total = records.len();

        let available: Vec<ArticleRecord> = records
            .into_iter()
            .filter(|record| {
                let exists = self.article_path(record).is_file();
                if !exists {
                    warn!(
                        "Skipping article {}: file {} not found",
                        record.id, record.filename
                    );
                }
                exists
            })
            .collect();

        debug!("Corpus index lists {} articles, {} readable", total, available.len());
        Ok(available)
    }

    fn read_tagged_text(&self, record: &ArticleRecord) -> Result<String> {
        Ok(std::fs::read_to_string(self.article_path(record))?)
    }
}

/// Corpus held in memory, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    articles: Vec<(ArticleRecord, String)>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ArticleRecord, tagged_text: impl Into<String>) {
        self.articles.push((record, tagged_text.into()));
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl CorpusProvider for InMemoryCorpus {
    fn records(&self) -> Result<Vec<ArticleRecord>> {
        Ok(self.articles.iter().map(|(record, _)| record.clone()).collect())
    }

    fn read_tagged_text(&self, record: &ArticleRecord) -> Result<String> {
        self.articles
            .iter()
            .find(|(stored, _)| stored.id == record.id)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("article {} not in corpus", record.id),
                )
                .into()
            })
    }
}
