use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::Result;

/// Extraction, clustering and matching settings. Every field has a default,
/// so a config file only needs the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_articles_path")]
    pub articles_path: PathBuf,
    #[serde(default = "default_keywords_path")]
    pub keywords_path: PathBuf,
    #[serde(default)]
    pub stoplist_path: Option<PathBuf>,
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    #[serde(default)]
    pub thesaurus_path: Option<PathBuf>,

    #[serde(default = "default_max_words")]
    pub max_words_in_keyword: usize,
    #[serde(default = "default_max_words")]
    pub max_words_title: usize,
    #[serde(default = "default_min_letters")]
    pub min_letters_in_keyword: usize,
    #[serde(default = "default_min_occurrences_body")]
    pub min_occurrences_body: usize,
    #[serde(default = "default_min_occurrences_title")]
    pub min_occurrences_title: usize,
    #[serde(default = "default_body_chars_per_occurrence")]
    pub body_chars_per_occurrence: usize,

    #[serde(default = "default_cutoff_step")]
    pub cutoff_step: f64,
    #[serde(default = "default_validity_divisor")]
    pub validity_divisor: usize,

    #[serde(default = "default_exact_points")]
    pub exact_match_points: u32,
    #[serde(default = "default_synonym_points")]
    pub synonym_match_points: u32,
    #[serde(default = "default_notify_threshold")]
    pub notify_threshold: f64,
}

fn default_articles_path() -> PathBuf {
    PathBuf::from("./articles")
}

fn default_keywords_path() -> PathBuf {
    PathBuf::from("./keywords")
}

fn default_max_words() -> usize {
    3
}

fn default_min_letters() -> usize {
    4
}

fn default_min_occurrences_body() -> usize {
    3
}

fn default_min_occurrences_title() -> usize {
    1
}

fn default_body_chars_per_occurrence() -> usize {
    2000
}

fn default_cutoff_step() -> f64 {
    0.05
}

fn default_validity_divisor() -> usize {
    4
}

fn default_exact_points() -> u32 {
    2
}

fn default_synonym_points() -> u32 {
    1
}

fn default_notify_threshold() -> f64 {
    0.1
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            articles_path: default_articles_path(),
            keywords_path: default_keywords_path(),
            stoplist_path: None,
            lexicon_path: None,
            thesaurus_path: None,

            max_words_in_keyword: default_max_words(),
            max_words_title: default_max_words(),
            min_letters_in_keyword: default_min_letters(),
            min_occurrences_body: default_min_occurrences_body(),
            min_occurrences_title: default_min_occurrences_title(),
            body_chars_per_occurrence: default_body_chars_per_occurrence(),

            cutoff_step: default_cutoff_step(),
            validity_divisor: default_validity_divisor(),

            exact_match_points: default_exact_points(),
            synonym_match_points: default_synonym_points(),
            notify_threshold: default_notify_threshold(),
        }
    }
}

impl DetectionConfig {
    pub const ENV_PREFIX: &'static str = "EVENT_DETECTION";

    /// Layers an optional config file (any format the `config` crate knows)
    /// under `EVENT_DETECTION_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(Self::ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Adaptive body frequency floor: short articles need fewer repetitions.
    pub fn body_min_occurrences(&self, body_chars: usize) -> usize {
        let per = self.body_chars_per_occurrence.max(1);
        self.min_occurrences_body.min(body_chars.div_ceil(per))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_extractor_constants() {
        let config = DetectionConfig::default();
        assert_eq!(config.max_words_in_keyword, 3);
        assert_eq!(config.max_words_title, 3);
        assert_eq!(config.min_letters_in_keyword, 4);
        assert_eq!(config.min_occurrences_title, 1);
        assert!((config.cutoff_step - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_body_min_occurrences_is_adaptive() {
        let config = DetectionConfig::default();
        assert_eq!(config.body_min_occurrences(0), 0);
        assert_eq!(config.body_min_occurrences(1), 1);
        assert_eq!(config.body_min_occurrences(2000), 1);
        assert_eq!(config.body_min_occurrences(2001), 2);
        assert_eq!(config.body_min_occurrences(50_000), 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detection.json");
        std::fs::write(&path, r#"{"cutoff_step": 0.1, "notify_threshold": 0.5}"#).unwrap();

        let config = DetectionConfig::load(Some(&path)).unwrap();
        assert!((config.cutoff_step - 0.1).abs() < 1e-9);
        assert!((config.notify_threshold - 0.5).abs() < 1e-9);
        assert_eq!(config.max_words_in_keyword, 3);
    }
}
