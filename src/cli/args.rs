//! Command line argument parsing for the Trawl CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Trawl - a small in-memory document retrieval engine
#[derive(Parser, Debug, Clone)]
#[command(name = "trawl")]
#[command(about = "Rank and evaluate documents with Jaccard, TF-IDF, or BM25")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TrawlArgs {
    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rank the corpus against a single query
    Search(SearchArgs),

    /// Evaluate a scorer against a query set with relevance judgments
    Evaluate(EvaluateArgs),

    /// Export TF-IDF document vectors to a binary index
    #[command(name = "export-vectors")]
    ExportVectors(ExportVectorsArgs),
}

/// Arguments shared by every command that loads a corpus
#[derive(Parser, Debug, Clone)]
pub struct CorpusArgs {
    /// Path to the `id<TAB>text` document file
    #[arg(long, value_name = "FILE")]
    pub corpus: PathBuf,

    /// Optional stop-word file (one word per line); defaults to the built-in
    /// English list
    #[arg(long, value_name = "FILE")]
    pub stop_words: Option<PathBuf>,
}

/// Arguments for the `search` command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Ranking strategy to use
    #[arg(long, value_enum, default_value_t = ScorerKind::Bm25)]
    pub scorer: ScorerKind,

    /// Query text
    #[arg(long)]
    pub query: String,

    /// Number of results to return
    #[arg(long, default_value_t = 10)]
    pub k: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `evaluate` command
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Path to the `id<TAB>text` query file
    #[arg(long, value_name = "FILE")]
    pub queries: PathBuf,

    /// Path to the `query_id<TAB>doc_id ...` relevance file
    #[arg(long, value_name = "FILE")]
    pub relevance: PathBuf,

    /// Ranking strategy to evaluate
    #[arg(long, value_enum, default_value_t = ScorerKind::Bm25)]
    pub scorer: ScorerKind,

    /// Retrieval depth per query
    #[arg(long, default_value_t = 10)]
    pub k: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `export-vectors` command
#[derive(Parser, Debug, Clone)]
pub struct ExportVectorsArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Directory to write `vectors.bin` and `directory.bin` into
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,
}

/// Ranking strategy selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    /// Jaccard set-overlap similarity
    Jaccard,
    /// TF-IDF with cosine similarity
    TfIdf,
    /// BM25 probabilistic ranking
    Bm25,
}

/// Output format selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Text,
    /// JSON
    Json,
}
