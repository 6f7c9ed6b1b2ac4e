use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeywordStore;
use crate::core::error::Result;
use crate::keywords::ExtractedKeywords;

/// One pretty-printed `<article_id>.json` document per article.
pub struct JsonFileKeywordStore {
    dir: PathBuf,
}

impl JsonFileKeywordStore {
    /// Creates the directory if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, article_id: u64) -> PathBuf {
        self.dir.join(format!("{article_id}.json"))
    }
}

impl KeywordStore for JsonFileKeywordStore {
    fn get(&self, article_id: u64) -> Result<Option<ExtractedKeywords>> {
        let path = self.path_for(article_id);
        if !path.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn put(&self, article_id: u64, keywords: &ExtractedKeywords) -> Result<()> {
        let path = self.path_for(article_id);
        std::fs::write(&path, serde_json::to_string_pretty(keywords)?)?;
        debug!("Wrote {} keywords to {}", keywords.len(), path.display());
        Ok(())
    }

    fn contains(&self, article_id: u64) -> Result<bool> {
        Ok(self.path_for(article_id).is_file())
    }
}
