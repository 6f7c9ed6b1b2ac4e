use thiserror::Error;


#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed article {article_id}: {reason}")]
    MalformedArticle { article_id: u64, reason: String },

    #[error("Unknown POS tag: {0}")]
    UnknownPosTag(String),

    #[error("Cluster {0} membership is sealed once its keywords have been aggregated")]
    ClusterSealed(u32),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Linguistic service error: {0}")]
    Linguistics(String),
}

impl DetectionError {
    pub fn malformed(article_id: u64, reason: impl Into<String>) -> Self {
        Self::MalformedArticle {
            article_id,
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for DetectionError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;
