use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::error::{DetectionError, Result};

lazy_static! {
    static ref SEGMENTS_RE: Regex = Regex::new(r"(?s)^TITLE:(.*)TEXT:(.*)").unwrap();
}

/// Index row describing one article of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    pub filename: String,
}

/// An article whose tagged text has been split into title and body segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub record: ArticleRecord,
    pub title_tagged: String,
    pub body_tagged: String,
}

impl Article {
    /// Splits `raw` at the literal `TITLE:` and `TEXT:` markers. The text must
    /// open with `TITLE:`.
    pub fn parse(record: ArticleRecord, raw: &str) -> Result<Self> {
        let captures = SEGMENTS_RE
            .captures(raw)
            .ok_or_else(|| DetectionError::malformed(record.id, "missing TITLE:/TEXT: markers"))?;

        let title_tagged = captures
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let body_tagged = captures
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Ok(Self {
            record,
            title_tagged,
            body_tagged,
        })
    }

    pub fn id(&self) -> u64 {
        self.record.id
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }
}

/// One whitespace-separated `word_POSTAG` unit of tagged text, not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedToken<'a> {
    pub raw: &'a str,
}

impl<'a> TaggedToken<'a> {
    pub fn scan(text: &'a str) -> Vec<Self> {
        text.split_whitespace().map(|raw| Self { raw }).collect()
    }

    pub fn is_tagged(&self) -> bool {
        self.raw.contains('_')
    }
}
