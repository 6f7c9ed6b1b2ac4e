pub mod clustering;
pub mod core;
pub mod corpus;
pub mod keywords;
pub mod linguistics;
pub mod matching;
pub mod pipeline;
pub mod query;
pub mod store;

pub use clustering::{Cluster, CorpusMatrix, HierarchicalClusterer, MatrixBuilder};
pub use crate::core::config::DetectionConfig;
pub use crate::core::error::{DetectionError, Result};
pub use crate::core::pos::{PosClass, PosTag};
pub use corpus::{Article, ArticleRecord, CorpusProvider, DirectoryCorpus, InMemoryCorpus};
pub use keywords::{ExtractedKeywords, KeywordExtractor};
pub use linguistics::{LexiconLinguistics, LinguisticService};
pub use matching::{ClusterMatcher, MatchReport, MatchResult, ScoringRule};
pub use pipeline::{EventDetectionPipeline, ExtractionSummary, RunReport};
pub use query::{ExpandedQuery, Query, QueryExpander};
pub use store::{InMemoryKeywordStore, InMemoryQueryStore, JsonFileKeywordStore, KeywordStore, QueryStore};
