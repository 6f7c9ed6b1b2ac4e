use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::models::KeywordCandidate;
use crate::core::pos::PosTag;
use crate::corpus::TaggedToken;
use crate::linguistics::LinguisticService;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"https?://\S+").unwrap();
}

const SENTENCE_BREAKS: &[&str] = &[
    ".", "!", "?", ",", ";", ":", "(", ")", "[", "]", "\"", "'", "-", "--", "``", "''",
];

/// Why a tagged token was left out of preprocessing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenIssue {
    #[error("token has no POS tag")]
    MissingTag,

    #[error("token has more than one tag separator")]
    ExtraSeparator,

    #[error("token has an empty word")]
    EmptyWord,

    #[error("unrecognised POS tag {0}")]
    UnknownTag(String),
}

/// A `word_TAG` token that passed validation. `word` keeps its original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidToken {
    pub word: String,
    pub tag: PosTag,
}

impl ValidToken {
    pub fn parse(raw: &str) -> Result<Self, TokenIssue> {
        let mut parts = raw.split('_');
        let word = parts.next().unwrap_or_default();
        let tag = parts.next().ok_or(TokenIssue::MissingTag)?;
        if parts.next().is_some() {
            return Err(TokenIssue::ExtraSeparator);
        }
        if word.is_empty() {
            return Err(TokenIssue::EmptyWord);
        }
        let tag = PosTag::parse(tag).map_err(|_| TokenIssue::UnknownTag(tag.to_string()))?;

        Ok(Self {
            word: word.to_string(),
            tag,
        })
    }

    fn is_sentence_break(&self) -> bool {
        SENTENCE_BREAKS.contains(&self.word.as_str())
    }
}

/// Stemmed sentences ready for phrase extraction, plus the occurrence
/// record of every stem that survived.
#[derive(Debug, Clone, Default)]
pub struct PreprocessedText {
    /// Each sentence as a word sequence: stems for content words, the
    /// lowercased surface form for stopwords.
    pub sentences: Vec<Vec<String>>,
    pub candidates: BTreeMap<String, Vec<KeywordCandidate>>,
}

pub struct Preprocessor<'a> {
    linguistics: &'a dyn LinguisticService,
}

impl<'a> Preprocessor<'a> {
    pub fn new(linguistics: &'a dyn LinguisticService) -> Self {
        Self { linguistics }
    }

    pub fn preprocess(&self, tagged_text: &str) -> PreprocessedText {
        let text = URL_RE.replace_all(tagged_text, " ");
        let mut output = PreprocessedText::default();

        for sentence in split_sentences(&text) {
            self.process_sentence(&sentence, &mut output);
        }

        output
    }

    fn process_sentence(&self, tokens: &[ValidToken], output: &mut PreprocessedText) {
        let mut words = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let lower = token.word.to_lowercase();
            if self.linguistics.is_stopword(&lower) {
                words.push(lower);
                continue;
            }

            let stem = stem_word(self.linguistics, &lower);
            if !stem.chars().any(|c| c.is_ascii_alphabetic()) {
                continue;
            }

            let candidate = KeywordCandidate {
                word: lower,
                tag: token.tag,
                contexts: contexts_at(tokens, i),
            };
            output.candidates.entry(stem.clone()).or_default().push(candidate);
            words.push(stem);
        }

        if !words.is_empty() {
            output.sentences.push(words);
        }
    }
}

/// Lemmatize then stem a lowercase word, dropping initialism periods (`u.s.` -> `us`).
pub fn stem_word(linguistics: &dyn LinguisticService, lower: &str) -> String {
    strip_initialism_periods(&linguistics.stemmatize(lower))
}

/// Stems every word of a surface phrase the same way sentence words are stemmed.
pub fn stem_phrase(linguistics: &dyn LinguisticService, phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| stem_word(linguistics, &word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_initialism_periods(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            if **c != '.' || *i == 0 {
                return true;
            }
            let after_letter = chars[i - 1].is_alphabetic();
            let letter_before_that = *i >= 2 && chars[i - 2].is_alphabetic();
            !(after_letter && !letter_before_that)
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Valid tokens grouped into sentences. Breaks fall on punctuation tokens
/// and line ends; untagged and malformed tokens are skipped.
fn split_sentences(text: &str) -> Vec<Vec<ValidToken>> {
    let mut sentences = Vec::new();

    for line in text.lines() {
        let mut current = Vec::new();
        for token in TaggedToken::scan(line) {
            if !token.is_tagged() {
                continue;
            }
            match ValidToken::parse(token.raw) {
                Ok(valid) if valid.is_sentence_break() || valid.tag.is_punctuation() => {
                    if !current.is_empty() {
                        sentences.push(std::mem::take(&mut current));
                    }
                }
                Ok(valid) => current.push(valid),
                Err(issue) => debug!("Skipping token {:?}: {}", token.raw, issue),
            }
        }
        if !current.is_empty() {
            sentences.push(current);
        }
    }

    sentences
}

fn contexts_at(tokens: &[ValidToken], i: usize) -> BTreeSet<String> {
    let word = |j: usize| tokens[j].word.as_str();
    let mut contexts = BTreeSet::new();

    if i >= 1 {
        contexts.insert(format!("{} {}", word(i - 1), word(i)));
    }
    if i >= 2 {
        contexts.insert(format!("{} {} {}", word(i - 2), word(i - 1), word(i)));
    }
    if i + 1 < tokens.len() {
        contexts.insert(format!("{} {}", word(i), word(i + 1)));
    }
    if i + 2 < tokens.len() {
        contexts.insert(format!("{} {} {}", word(i), word(i + 1), word(i + 2)));
    }

    contexts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linguistics::LexiconLinguistics;

    #[test]
    fn test_token_validation() {
        assert_eq!(
            ValidToken::parse("Obama_NNP").unwrap(),
            ValidToken {
                word: "Obama".to_string(),
                tag: PosTag::Nnp
            }
        );
        assert_eq!(ValidToken::parse("Obama"), Err(TokenIssue::MissingTag));
        assert_eq!(ValidToken::parse("a_b_NN"), Err(TokenIssue::ExtraSeparator));
        assert_eq!(ValidToken::parse("_NN"), Err(TokenIssue::EmptyWord));
        assert_eq!(
            ValidToken::parse("x_QQ"),
            Err(TokenIssue::UnknownTag("QQ".to_string()))
        );
    }

    #[test]
    fn test_initialism_periods() {
        assert_eq!(strip_initialism_periods("u.s."), "us");
        assert_eq!(strip_initialism_periods("3.5"), "3.5");
        assert_eq!(strip_initialism_periods("end."), "end.");
    }

    #[test]
    fn test_sentences_break_on_punctuation_and_lines() {
        let sentences = split_sentences("The_DT vote_NN ,_, a_DT count_NN\nnew_JJ line_NN ._.");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].len(), 2);
        assert_eq!(sentences[2][1].word, "line");
    }

    #[test]
    fn test_preprocess_records_stems_and_contexts() {
        let linguistics = LexiconLinguistics::new();
        let preprocessor = Preprocessor::new(&linguistics);
        let text = preprocessor.preprocess(
            "Barack_NNP Obama_NNP signs_VBZ new_JJ laws_NNS ._. See_VB http://example.com/x_NN",
        );

        assert_eq!(text.sentences.len(), 2);
        assert_eq!(text.sentences[0], vec!["barack", "obama", "sign", "new", "law"]);

        let obama = &text.candidates["obama"][0];
        assert_eq!(obama.word, "obama");
        assert_eq!(obama.tag, PosTag::Nnp);
        assert!(obama.contexts.contains("Barack Obama"));
        assert!(obama.contexts.contains("Obama signs new"));
        assert!(!text.candidates.contains_key("http"));
    }

    #[test]
    fn test_stopwords_stay_unstemmed_and_are_not_candidates() {
        let linguistics = LexiconLinguistics::new();
        let preprocessor = Preprocessor::new(&linguistics);
        let text = preprocessor.preprocess("The_DT elections_NNS were_VBD held_VBN");

        assert_eq!(text.sentences[0], vec!["the", "elect", "were", "held"]);
        assert!(!text.candidates.contains_key("the"));
        assert!(text.candidates.contains_key("elect"));
    }

    #[test]
    fn test_malformed_tokens_are_skipped() {
        let linguistics = LexiconLinguistics::new();
        let preprocessor = Preprocessor::new(&linguistics);
        let text = preprocessor.preprocess("ballot_QQ count_NN a_b_NN untagged 42_CD");

        assert_eq!(text.sentences, vec![vec!["count".to_string()]]);
    }

    #[test]
    fn test_stem_phrase_matches_sentence_stems() {
        let linguistics = LexiconLinguistics::new();
        assert_eq!(stem_phrase(&linguistics, "Signs New Laws"), "sign new law");
    }
}
