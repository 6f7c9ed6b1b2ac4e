use std::collections::HashSet;
use std::path::Path;

use lazy_static::lazy_static;

use crate::core::error::Result;

lazy_static! {
    /// SMART information-retrieval stoplist, used to split phrases and filter queries.
    pub static ref SMART_STOPLIST: Stoplist =
        Stoplist::parse(include_str!("../../resources/SmartStoplist.txt"));

    /// Short English function-word list, used to prune matrix vocabulary.
    pub static ref ENGLISH_STOPWORDS: Stoplist =
        Stoplist::parse(include_str!("../../resources/english_stopwords.txt"));
}

#[derive(Debug, Clone, Default)]
pub struct Stoplist {
    words: HashSet<String>,
}

impl Stoplist {
    /// One word per line; blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
