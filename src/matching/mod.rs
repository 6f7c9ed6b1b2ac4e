pub mod matcher;
pub mod models;
pub mod scoring;

pub use matcher::ClusterMatcher;
pub use models::{MatchEntry, MatchReport, MatchResult};
pub use scoring::{MatchScore, QueryTerms, ScoringRule};
