use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use crate::corpus::Article;
use crate::keywords::Preprocessor;
use crate::linguistics::{ENGLISH_STOPWORDS, LinguisticService};

/// Stem counts of one article, title and body combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleTerms {
    pub article_id: u64,
    pub title: String,
    pub counts: BTreeMap<String, usize>,
}

/// Articles by vocabulary, smooth TF-IDF weighted with L2-normalized rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TermDocumentMatrix {
    pub article_ids: Vec<u64>,
    pub titles: Vec<String>,
    pub vocabulary: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TermDocumentMatrix {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn num_articles(&self) -> usize {
        self.rows.len()
    }

    pub fn num_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Count of non-zero cells.
    pub fn num_entries(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|value| **value != 0.0).count())
            .sum()
    }
}

/// Zero articles or zero terms produce `Empty`, which clusters to nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusMatrix {
    Empty,
    Dense(TermDocumentMatrix),
}

impl CorpusMatrix {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

pub struct MatrixBuilder {
    linguistics: Arc<dyn LinguisticService>,
}

impl MatrixBuilder {
    pub fn new(linguistics: Arc<dyn LinguisticService>) -> Self {
        Self { linguistics }
    }

    /// Stem counts over the article's title and body sentences, stopwords pruned.
    pub fn article_terms(&self, article: &Article) -> ArticleTerms {
        let linguistics = self.linguistics.as_ref();
        let preprocessor = Preprocessor::new(linguistics);
        let mut counts = BTreeMap::new();

        for segment in [&article.body_tagged, &article.title_tagged] {
            for sentence in preprocessor.preprocess(segment).sentences {
                for word in sentence {
                    if ENGLISH_STOPWORDS.contains(&word) || linguistics.is_stopword(&word) {
                        continue;
                    }
                    *counts.entry(word).or_insert(0) += 1;
                }
            }
        }

        ArticleTerms {
            article_id: article.id(),
            title: article.title().to_string(),
            counts,
        }
    }

    pub fn build_from_articles(&self, articles: &[Article]) -> CorpusMatrix {
        let terms: Vec<ArticleTerms> = articles.iter().map(|article| self.article_terms(article)).collect();
        build_matrix(&terms)
    }
}

/// Applies `tf * (ln((1 + N) / (1 + df)) + 1)` per cell, then L2-normalizes rows.
pub fn build_matrix(documents: &[ArticleTerms]) -> CorpusMatrix {
    let vocabulary: Vec<String> = documents
        .iter()
        .flat_map(|document| document.counts.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if documents.is_empty() || vocabulary.is_empty() {
        debug!("Empty corpus matrix ({} articles)", documents.len());
        return CorpusMatrix::Empty;
    }

    let n = documents.len() as f64;
    let idf: Vec<f64> = vocabulary
        .iter()
        .map(|term| {
            let df = documents
                .iter()
                .filter(|document| document.counts.contains_key(term))
                .count() as f64;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    let rows: Vec<Vec<f64>> = documents
        .iter()
        .map(|document| {
            let mut row: Vec<f64> = vocabulary
                .iter()
                .zip(&idf)
                .map(|(term, weight)| document.counts.get(term).copied().unwrap_or(0) as f64 * weight)
                .collect();
            let norm = row.iter().map(|value| value * value).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|value| *value /= norm);
            }
            row
        })
        .collect();

    let matrix = TermDocumentMatrix {
        article_ids: documents.iter().map(|document| document.article_id).collect(),
        titles: documents.iter().map(|document| document.title.clone()).collect(),
        vocabulary,
        rows,
    };
    debug!(
        "Built {}x{} matrix with {} entries",
        matrix.num_articles(),
        matrix.num_terms(),
        matrix.num_entries()
    );
    CorpusMatrix::Dense(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ArticleRecord;
    use crate::linguistics::LexiconLinguistics;

    fn terms(article_id: u64, counts: &[(&str, usize)]) -> ArticleTerms {
        ArticleTerms {
            article_id,
            title: format!("article {article_id}"),
            counts: counts.iter().map(|(term, count)| (term.to_string(), *count)).collect(),
        }
    }

    fn dense(matrix: CorpusMatrix) -> TermDocumentMatrix {
        match matrix {
            CorpusMatrix::Dense(matrix) => matrix,
            CorpusMatrix::Empty => panic!("expected a dense matrix"),
        }
    }

    #[test]
    fn test_empty_inputs_give_sentinel() {
        assert!(build_matrix(&[]).is_empty());
        assert!(build_matrix(&[terms(1, &[]), terms(2, &[])]).is_empty());
    }

    #[test]
    fn test_smooth_idf_weights() {
        let matrix = dense(build_matrix(&[
            terms(1, &[("elect", 1), ("vote", 1)]),
            terms(2, &[("vote", 1)]),
        ]));

        assert_eq!(matrix.vocabulary, vec!["elect", "vote"]);
        // elect: ln(3/2) + 1, vote: ln(3/3) + 1 = 1
        let elect = (1.5f64).ln() + 1.0;
        let norm = (elect * elect + 1.0).sqrt();
        assert!((matrix.rows()[0][0] - elect / norm).abs() < 1e-12);
        assert!((matrix.rows()[0][1] - 1.0 / norm).abs() < 1e-12);
        assert!((matrix.rows()[1][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_unit_length_or_zero() {
        let matrix = dense(build_matrix(&[
            terms(1, &[("elect", 3), ("presid", 2)]),
            terms(2, &[("budget", 1)]),
            terms(3, &[]),
        ]));

        for row in matrix.rows().iter().take(2) {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
        assert!(matrix.rows()[2].iter().all(|v| *v == 0.0));
        assert_eq!(matrix.num_articles(), 3);
        assert_eq!(matrix.num_terms(), 3);
        assert_eq!(matrix.num_entries(), 3);
    }

    #[test]
    fn test_article_terms_combine_title_and_body() {
        let builder = MatrixBuilder::new(Arc::new(LexiconLinguistics::new()));
        let record = ArticleRecord {
            id: 4,
            title: "Elections".to_string(),
            url: String::new(),
            source: String::new(),
            filename: "4.txt".to_string(),
        };
        let article = Article::parse(
            record,
            "TITLE: Elections_NNS\nTEXT: The_DT election_NN was_VBD over_IN budget_NN ._.",
        )
        .unwrap();

        let terms = builder.article_terms(&article);
        assert_eq!(terms.counts["elect"], 2);
        assert_eq!(terms.counts["budget"], 1);
        assert!(!terms.counts.contains_key("the"));
        assert!(!terms.counts.contains_key("was"));
    }
}
