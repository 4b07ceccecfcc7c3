#![forbid(unsafe_code)]

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use prp_rank::gateway::ProviderGateway;
use prp_rank::input::{load_sources, units_from_lines};
use prp_rank::prompts::PromptTemplate;
use prp_rank::rerank::oracle::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_MODEL};
use prp_rank::rerank::{rank, JsonlTraceSink, LlmOracle, Method, RankOptions, SwapComparator};

/// Sort input lines by relevance to a query.
///
/// Lines are read from FILES in order, or from stdin when none are given.
/// Each non-empty line is one document. Methods:
///   allpair - compare every pair of lines and aggregate scores
///   sorting - merge sort driven by pairwise comparisons
///   sliding - repeated sliding-window (bubble sort) passes
///
/// Example: prp-rank --query "Which name suits a pet monkey?" names.txt
#[derive(Parser)]
#[command(name = "prp-rank", version, verbatim_doc_comment)]
struct Cli {
    /// Query the lines are ranked against
    #[arg(long)]
    query: String,

    /// Pairwise ranking method
    #[arg(long, value_enum, default_value_t = Method::Sorting)]
    method: Method,

    /// Only keep the top K lines (0 keeps all). Also caps sliding passes.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    top_k: i64,

    /// Model used for comparisons (OpenRouter model ID)
    #[arg(short = 'm', long, env = "PRP_RANK_MODEL")]
    model: Option<String>,

    /// Custom pairwise prompt template with {query}, {docA} and {docB}
    #[arg(long)]
    prompt: Option<String>,

    /// Maximum oracle requests in flight
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    concurrency: usize,

    /// Write every comparison to this JSONL file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Input files ("-" for stdin)
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prp_rank=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let units = units_from_lines(load_sources(&cli.files)?);
    if units.is_empty() {
        eprintln!("No input lines provided.");
        return Ok(());
    }

    let gateway = Arc::new(ProviderGateway::from_env()?);
    // An empty value means "not given", for flags and env alike.
    let model = cli
        .model
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let mut oracle = LlmOracle::new(gateway, model).with_max_in_flight(cli.concurrency);
    if let Some(template) = cli.prompt.filter(|template| !template.is_empty()) {
        oracle = oracle.with_template(PromptTemplate::new(template));
    }

    let trace_sink = cli.trace.map(JsonlTraceSink::create).transpose()?.map(Arc::new);
    let mut comparator = SwapComparator::new(oracle);
    if let Some(sink) = &trace_sink {
        comparator = comparator.with_trace(sink.clone());
    }

    let options = RankOptions::new(cli.method)
        .top_k(cli.top_k)
        .comparison_concurrency(cli.concurrency);
    let result = rank(&comparator, &cli.query, units, &options).await;

    if let Some(sink) = &trace_sink {
        sink.finish()?;
    }
    let ranked = result?;

    info!(
        model = comparator.oracle().model(),
        comparisons = comparator.comparisons(),
        unclear_answers = comparator.unclear_answers(),
        "Ranking finished"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    for unit in &ranked {
        writeln!(out, "{}", unit.content())?;
    }
    out.flush()?;
    Ok(())
}
