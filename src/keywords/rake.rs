use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;

use crate::linguistics::LinguisticService;

lazy_static! {
    static ref WORD_SPLIT_RE: Regex = Regex::new(r"[^a-zA-Z0-9_+\-/]").unwrap();
}

/// Rapid automatic keyword extraction over pre-stemmed sentences.
pub struct Rake<'a> {
    linguistics: &'a dyn LinguisticService,
    pub min_char_length: usize,
    pub max_words: usize,
    pub min_frequency: usize,
}

impl<'a> Rake<'a> {
    pub fn new(linguistics: &'a dyn LinguisticService) -> Self {
        Self {
            linguistics,
            min_char_length: 1,
            max_words: 5,
            min_frequency: 1,
        }
    }

    pub fn with_limits(mut self, min_char_length: usize, max_words: usize, min_frequency: usize) -> Self {
        self.min_char_length = min_char_length;
        self.max_words = max_words;
        self.min_frequency = min_frequency;
        self
    }

    /// Scored candidate phrases, keyed by phrase.
    pub fn run(&self, sentences: &[Vec<String>]) -> BTreeMap<String, f64> {
        let phrases = self.candidate_phrases(sentences);
        let word_scores = word_scores(&phrases);

        phrases
            .iter()
            .map(|phrase| {
                let score = separate_words(phrase)
                    .iter()
                    .map(|word| word_scores.get(word.as_str()).copied().unwrap_or(0.0))
                    .sum::<f64>();
                (phrase.clone(), score)
            })
            .collect()
    }

    /// Runs of non-stopwords, filtered for shape and, when the floor exceeds
    /// one, for repetition. Duplicates are kept; they feed word frequencies.
    fn candidate_phrases(&self, sentences: &[Vec<String>]) -> Vec<String> {
        let mut phrases = Vec::new();

        for sentence in sentences {
            let mut current: Vec<&str> = Vec::new();
            for word in sentence {
                if self.linguistics.is_stopword(word) {
                    self.push_phrase(&mut current, &mut phrases);
                } else {
                    current.push(word);
                }
            }
            self.push_phrase(&mut current, &mut phrases);
        }

        if self.min_frequency > 1 {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for phrase in &phrases {
                *counts.entry(phrase.as_str()).or_insert(0) += 1;
            }
            let frequent: Vec<String> = phrases
                .iter()
                .filter(|phrase| counts[phrase.as_str()] >= self.min_frequency)
                .cloned()
                .collect();
            return frequent;
        }

        phrases
    }

    fn push_phrase(&self, current: &mut Vec<&str>, phrases: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }
        let phrase = current.join(" ");
        current.clear();
        if self.is_acceptable(&phrase) {
            phrases.push(phrase);
        }
    }

    fn is_acceptable(&self, phrase: &str) -> bool {
        if phrase.chars().count() < self.min_char_length {
            return false;
        }
        if phrase.split_whitespace().count() > self.max_words {
            return false;
        }

        let alpha = phrase.chars().filter(|c| c.is_alphabetic()).count();
        let digits = phrase.chars().filter(|c| c.is_ascii_digit()).count();
        alpha > 0 && digits <= alpha
    }
}

/// `(degree + frequency) / frequency` per word, where degree adds the
/// phrase length minus one for every phrase the word appears in.
fn word_scores(phrases: &[String]) -> HashMap<String, f64> {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    let mut degree: HashMap<String, usize> = HashMap::new();

    for phrase in phrases {
        let words = separate_words(phrase);
        let co_occurrence = words.len().saturating_sub(1);
        for word in words {
            *frequency.entry(word.clone()).or_insert(0) += 1;
            *degree.entry(word).or_insert(0) += co_occurrence;
        }
    }

    frequency
        .into_iter()
        .map(|(word, freq)| {
            let deg = degree.get(&word).copied().unwrap_or(0);
            let score = (deg + freq) as f64 / freq as f64;
            (word, score)
        })
        .collect()
}

/// Lowercase non-numeric words of a phrase.
fn separate_words(phrase: &str) -> Vec<String> {
    WORD_SPLIT_RE
        .split(phrase)
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty() && word.parse::<f64>().is_err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linguistics::LexiconLinguistics;

    fn sentence(words: &str) -> Vec<String> {
        words.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_phrases_split_at_stopwords() {
        let linguistics = LexiconLinguistics::new();
        let rake = Rake::new(&linguistics);
        let scores = rake.run(&[sentence("the senat vote on the new tax bill")]);

        let phrases: Vec<&str> = scores.keys().map(String::as_str).collect();
        assert_eq!(phrases, vec!["new tax bill", "senat vote"]);
    }

    #[test]
    fn test_degree_over_frequency_scores() {
        let linguistics = LexiconLinguistics::new();
        let rake = Rake::new(&linguistics);
        let scores = rake.run(&[sentence("tax bill"), sentence("tax")]);

        // tax: degree 1, frequency 2 -> 1.5; bill: degree 1, frequency 1 -> 2.0
        assert!((scores["tax"] - 1.5).abs() < 1e-9);
        assert!((scores["tax bill"] - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_shape_limits() {
        let linguistics = LexiconLinguistics::new();
        let rake = Rake::new(&linguistics).with_limits(4, 2, 1);
        let scores = rake.run(&[
            sentence("war"),
            sentence("senat vote count"),
            sentence("2011 g8"),
            sentence("budget"),
        ]);

        assert!(!scores.contains_key("war"));
        assert!(!scores.contains_key("senat vote count"));
        assert!(!scores.contains_key("2011 g8"));
        assert!(scores.contains_key("budget"));
    }

    #[test]
    fn test_frequency_floor_applies_only_above_one() {
        let linguistics = LexiconLinguistics::new();
        let sentences = [sentence("budget"), sentence("budget"), sentence("deficit")];

        let loose = Rake::new(&linguistics).with_limits(1, 3, 1).run(&sentences);
        assert_eq!(loose.len(), 2);

        let strict = Rake::new(&linguistics).with_limits(1, 3, 2).run(&sentences);
        assert_eq!(strict.len(), 1);
        assert!(strict.contains_key("budget"));
    }
}
