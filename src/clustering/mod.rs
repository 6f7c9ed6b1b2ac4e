pub mod cluster;
pub mod clusterer;
pub mod linkage;
pub mod matrix;

pub use cluster::Cluster;
pub use clusterer::HierarchicalClusterer;
pub use linkage::{MergeStep, MergeTree};
pub use matrix::{ArticleTerms, CorpusMatrix, MatrixBuilder, TermDocumentMatrix, build_matrix};
