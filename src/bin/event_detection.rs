use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use event_detection::{
    DetectionConfig, DirectoryCorpus, EventDetectionPipeline, InMemoryQueryStore, JsonFileKeywordStore,
    LexiconLinguistics,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportKind {
    /// Run metadata, clusters and every match result
    Full,
    /// Query id to matched articles and score
    Matches,
}

/// Clusters a tagged news corpus into events and matches user queries against them.
#[derive(Debug, Parser)]
#[command(name = "event-detection", version)]
struct Cli {
    /// Config file layered under EVENT_DETECTION_* variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding index.json and the tagged article files
    #[arg(long)]
    articles_dir: Option<PathBuf>,

    /// Directory for per-article keyword documents
    #[arg(long)]
    keywords_dir: Option<PathBuf>,

    /// JSON array of queries
    #[arg(long)]
    queries: Option<PathBuf>,

    /// JSON word-to-tag lexicon
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// JSON thesaurus
    #[arg(long)]
    thesaurus: Option<PathBuf>,

    /// Extract keywords again for articles that already have them
    #[arg(long)]
    reextract: bool,

    #[arg(long, value_enum, default_value = "full")]
    report: ReportKind,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("event_detection=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = DetectionConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.articles_dir {
        config.articles_path = dir;
    }
    if let Some(dir) = cli.keywords_dir {
        config.keywords_path = dir;
    }
    if cli.lexicon.is_some() {
        config.lexicon_path = cli.lexicon;
    }
    if cli.thesaurus.is_some() {
        config.thesaurus_path = cli.thesaurus;
    }

    let queries = match &cli.queries {
        Some(path) => InMemoryQueryStore::load(path)?,
        None => InMemoryQueryStore::new(),
    };

    info!(
        "Articles from {}, keywords in {}",
        config.articles_path.display(),
        config.keywords_path.display()
    );

    let pipeline = EventDetectionPipeline::new(
        Arc::new(LexiconLinguistics::from_config(&config)?),
        Box::new(DirectoryCorpus::new(config.articles_path.clone())),
        Box::new(JsonFileKeywordStore::open(config.keywords_path.clone())?),
        Box::new(queries),
        config,
    );

    let report = pipeline.run(cli.reextract)?;
    let threshold = pipeline.config().notify_threshold;
    for result in report.notifications(threshold) {
        info!(
            "Query {} matched articles {:?} ({:.3})",
            result.query_id, result.article_ids, result.score
        );
    }

    let output = match cli.report {
        ReportKind::Full => serde_json::to_string_pretty(&report)?,
        ReportKind::Matches => serde_json::to_string_pretty(&report.match_report())?,
    };
    println!("{output}");

    Ok(())
}
