pub mod lexicon;
pub mod stoplist;

pub use lexicon::{LexiconLinguistics, Thesaurus};
pub use stoplist::{ENGLISH_STOPWORDS, SMART_STOPLIST, Stoplist};

use crate::core::pos::{PosClass, PosTag};


/// Tokenizer, tagger, lemmatizer, stemmer and synonym lookup consumed by
/// extraction, query expansion and matching.
pub trait LinguisticService: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    fn pos_tag(&self, tokens: &[String]) -> Vec<(String, PosTag)>;

    fn lemmatize(&self, word: &str) -> String;

    fn stem(&self, word: &str) -> String;

    /// Synonym lemmas for `word` restricted to one broad word class.
    fn synonyms(&self, word: &str, class: PosClass) -> Vec<String>;

    fn is_stopword(&self, word: &str) -> bool;

    fn stemmatize(&self, word: &str) -> String {
        self.stem(&self.lemmatize(word))
    }

    /// Underscores become spaces; every word is lowercased and stemmatized.
    fn normalize(&self, phrase: &str) -> String {
        phrase
            .replace('_', " ")
            .split_whitespace()
            .map(|word| self.stemmatize(&word.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
