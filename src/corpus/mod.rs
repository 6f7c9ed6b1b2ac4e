pub mod article;
pub mod provider;

pub use article::{Article, ArticleRecord, TaggedToken};
pub use provider::{CorpusProvider, DirectoryCorpus, InMemoryCorpus};
