pub mod extractor;
pub mod models;
pub mod preprocess;
pub mod rake;

pub use extractor::KeywordExtractor;
pub use models::{ExtractedKeywords, KeywordCandidate};
pub use preprocess::{PreprocessedText, Preprocessor, TokenIssue, ValidToken};
pub use rake::Rake;
