use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::{EngineConfig, SearchEngine};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect the boolean/vector-space retrieval index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct CorpusArgs {
    /// Directory of tokens_<id>.txt files
    #[arg(long)]
    tokens: PathBuf,
    /// Directory of lemmas_<id>.txt files
    #[arg(long)]
    lemmas: PathBuf,
    /// Directory of plain-text document content
    #[arg(long)]
    content: PathBuf,
    /// Snapshot output directory
    #[arg(long)]
    snapshot: PathBuf,
}

impl CorpusArgs {
    fn into_config(self) -> EngineConfig {
        EngineConfig {
            tokens_dir: self.tokens,
            lemmas_dir: self.lemmas,
            content_dir: self.content,
            snapshot_dir: self.snapshot,
            top_n: engine::search::DEFAULT_TOP_N,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and weight snapshots from the corpus directories
    Build {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Discard any existing snapshot and rebuild from source
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Load or build the index, then print the consistency report as JSON
    Check {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, force } => {
            if force && corpus.snapshot.exists() {
                fs::remove_dir_all(&corpus.snapshot)?;
                tracing::info!(snapshot = %corpus.snapshot.display(), "removed existing snapshot");
            }
            let engine = SearchEngine::open(corpus.into_config())?;
            tracing::info!(
                docs = engine.index().num_docs(),
                terms = engine.index().num_terms(),
                lemmas = engine.lemmas().len(),
                vocabulary = engine.vectors().vocabulary().len(),
                "index build complete"
            );
            Ok(())
        }
        Commands::Check { corpus } => {
            let engine = SearchEngine::open(corpus.into_config())?;
            println!("{}", serde_json::to_string_pretty(engine.consistency_report())?);
            Ok(())
        }
    }
}
