//! Command implementations for the Trawl CLI.

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::analysis::{StandardAnalyzer, load_stop_words};
use crate::cli::args::*;
use crate::corpus::{Corpus, DocId};
use crate::error::Result;
use crate::eval::Evaluator;
use crate::scoring::bm25::Bm25Searcher;
use crate::scoring::jaccard::JaccardSearcher;
use crate::scoring::tfidf::TfIdfSearcher;
use crate::scoring::{SearchResult, Searcher};
use crate::storage::{DirectoryFileWriter, VectorFileWriter};

/// Execute a CLI command.
pub fn execute_command(args: TrawlArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => run_search(search_args.clone()),
        Command::Evaluate(evaluate_args) => run_evaluate(evaluate_args.clone()),
        Command::ExportVectors(export_args) => run_export_vectors(export_args.clone()),
    }
}

fn build_analyzer(args: &CorpusArgs) -> Result<Arc<StandardAnalyzer>> {
    let analyzer = match &args.stop_words {
        Some(path) => StandardAnalyzer::with_stop_words(load_stop_words(path)?)?,
        None => StandardAnalyzer::new()?,
    };
    Ok(Arc::new(analyzer))
}

fn build_searcher(
    kind: ScorerKind,
    corpus: Arc<Corpus>,
    analyzer: Arc<StandardAnalyzer>,
) -> Box<dyn Searcher> {
    match kind {
        ScorerKind::Jaccard => Box::new(JaccardSearcher::new(corpus, analyzer)),
        ScorerKind::TfIdf => Box::new(TfIdfSearcher::new(corpus, analyzer)),
        ScorerKind::Bm25 => Box::new(Bm25Searcher::new(corpus, analyzer)),
    }
}

#[derive(Serialize)]
struct Hit {
    doc_id: DocId,
    /// `None` for documents outside the query's candidate set.
    score: Option<f64>,
}

impl From<&SearchResult> for Hit {
    fn from(result: &SearchResult) -> Self {
        Hit {
            doc_id: result.doc_id,
            score: if result.score.is_undefined() {
                None
            } else {
                Some(result.score.value())
            },
        }
    }
}

/// Run one query against the corpus and print the ranked results.
fn run_search(args: SearchArgs) -> Result<()> {
    let analyzer = build_analyzer(&args.corpus)?;
    let corpus = Arc::new(Corpus::from_file(&args.corpus.corpus, &analyzer)?);

    let start = Instant::now();
    let searcher = build_searcher(args.scorer, corpus, analyzer);
    let results = searcher.search(&args.query, args.k)?;
    info!(
        scorer = searcher.name(),
        results = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search finished"
    );

    match args.format {
        OutputFormat::Json => {
            let hits: Vec<Hit> = results.iter().map(Hit::from).collect();
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        OutputFormat::Text => {
            println!("# {} results for {:?}", results.len(), args.query);
            for (rank, result) in results.iter().enumerate() {
                match Hit::from(result).score {
                    Some(score) => {
                        println!("{:>4}. doc {:<8} score {score:.6}", rank + 1, result.doc_id)
                    }
                    None => println!("{:>4}. doc {:<8} score -", rank + 1, result.doc_id),
                }
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct EvaluationReport {
    scorer: String,
    k: usize,
    per_query: Vec<QueryMetrics>,
    average: crate::eval::PrfMetrics,
}

#[derive(Serialize)]
struct QueryMetrics {
    query_id: DocId,
    #[serde(flatten)]
    metrics: crate::eval::PrfMetrics,
}

/// Evaluate a scorer over a query set and print per-query and average PRF.
fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let analyzer = build_analyzer(&args.corpus)?;
    let corpus = Arc::new(Corpus::from_file(&args.corpus.corpus, &analyzer)?);
    let evaluator = Evaluator::from_files(&args.queries, &args.relevance, &analyzer)?;

    let searcher = build_searcher(args.scorer, corpus, analyzer);

    let start = Instant::now();
    let per_query = evaluator.per_query_prf(searcher.as_ref(), args.k)?;
    let average = evaluator.average_prf(searcher.as_ref(), args.k)?;
    info!(
        scorer = searcher.name(),
        queries = per_query.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "evaluation finished"
    );

    match args.format {
        OutputFormat::Json => {
            let report = EvaluationReport {
                scorer: searcher.name().to_string(),
                k: args.k,
                per_query: per_query
                    .into_iter()
                    .map(|(query_id, metrics)| QueryMetrics { query_id, metrics })
                    .collect(),
                average,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("# {} @ k={}", searcher.name(), args.k);
            println!("{:>10}  {:>9}  {:>9}  {:>9}", "query", "precision", "recall", "f1");
            for (query_id, metrics) in &per_query {
                println!(
                    "{query_id:>10}  {:>9.4}  {:>9.4}  {:>9.4}",
                    metrics.precision, metrics.recall, metrics.f1
                );
            }
            println!(
                "{:>10}  {:>9.4}  {:>9.4}  {:>9.4}",
                "average", average.precision, average.recall, average.f1
            );
        }
    }

    Ok(())
}

/// Build the TF-IDF index and persist every document vector.
fn run_export_vectors(args: ExportVectorsArgs) -> Result<()> {
    let analyzer = build_analyzer(&args.corpus)?;
    let corpus = Arc::new(Corpus::from_file(&args.corpus.corpus, &analyzer)?);
    let searcher = TfIdfSearcher::new(Arc::clone(&corpus), analyzer);

    fs::create_dir_all(&args.output)?;
    let vectors_path = args.output.join("vectors.bin");
    let directory_path = args.output.join("directory.bin");

    // Write in corpus order with term-id-sorted entries so the output is
    // reproducible.
    let mut writer = VectorFileWriter::create(&vectors_path)?;
    let mut pointers = Vec::with_capacity(corpus.len());
    for document in corpus.documents() {
        let vector = searcher.document_vector(document.id).ok_or_else(|| {
            crate::error::TrawlError::index(format!("no vector for document {}", document.id))
        })?;
        let mut entries: Vec<(_, f64)> = vector
            .weights
            .iter()
            .map(|(&term_id, &weight)| (term_id, weight))
            .collect();
        entries.sort_unstable_by_key(|&(term_id, _)| term_id);
        pointers.push(writer.write_vector(document.id, &entries)?);
    }
    writer.finish()?;

    DirectoryFileWriter::create(&directory_path)?.write_all(&pointers)?;

    println!(
        "exported {} vectors to {} and {}",
        pointers.len(),
        vectors_path.display(),
        directory_path.display()
    );

    Ok(())
}
