use anyhow::{bail, Result};
use clap::Parser;
use relfeed::{HistoryWriter, Outcome, Session, SessionConfig};
use rocchio::{Analyzer, CachedStemmer, RocchioConfig, RocchioEngine, StopWords};
use tracing_subscriber::{fmt, EnvFilter};
use websearch::{PageScraper, SearchClient};

#[derive(Parser, Debug)]
#[command(name = "relfeed")]
#[command(about = "Expand a web search query from relevance feedback (Rocchio)")]
struct Args {
    /// Target precision in (0, 1]
    target_precision: f64,
    /// Initial query string
    query: String,
    /// Search API key (falls back to GSEARCH_JSON_API)
    #[arg(long)]
    api: Option<String>,
    /// Search engine id (falls back to GSEARCH_ENGINE)
    #[arg(long)]
    engine: Option<String>,
    /// Weight of relevant documents
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,
    /// Weight of irrelevant documents
    #[arg(long, default_value_t = 0.0)]
    beta: f64,
    /// New terms added per round
    #[arg(long, default_value_t = 2)]
    terms_per_round: usize,
    /// Give up after this many rounds
    #[arg(long, default_value_t = 10)]
    max_rounds: usize,
    /// Stop-word file, one word per line; ignored if missing
    #[arg(long, default_value = "stop.txt")]
    stop_words: String,
    /// Directory of cached search responses
    #[arg(long, default_value = "tmp")]
    cache_dir: String,
    /// Also use the text of each result page
    #[arg(long, default_value_t = false)]
    scrape: bool,
    /// Directory of cached page texts
    #[arg(long, default_value = "scrapings")]
    scrape_dir: String,
    /// Stem terms before weighting
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Append every round to this JSON-lines file
    #[arg(long)]
    history: Option<String>,
}

fn credential(flag: Option<String>, env: &str, what: &str) -> Result<String> {
    match flag.or_else(|| std::env::var(env).ok()) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => bail!("{what} not specified (use --{} or {env})", what.split(' ').next().unwrap_or(what)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let api = credential(args.api, "GSEARCH_JSON_API", "api key")?;
    let engine_id = credential(args.engine, "GSEARCH_ENGINE", "engine id")?;
    if !(args.target_precision > 0.0 && args.target_precision <= 1.0) {
        bail!("target precision {} not in range (0, 1]", args.target_precision);
    }
    if args.query.trim().is_empty() {
        bail!("empty query string");
    }

    let stop_words = StopWords::from_file(&args.stop_words);
    let engine = RocchioEngine::new(RocchioConfig::new(args.alpha, args.beta), stop_words);
    let analyzer = if args.stem { Analyzer::with_stemmer(CachedStemmer::english()) } else { Analyzer::new() };
    let config = SessionConfig {
        target_precision: args.target_precision,
        terms_per_round: args.terms_per_round,
        max_rounds: args.max_rounds,
    };
    let mut session = Session::new(engine, analyzer, config, &args.query);
    if let Some(path) = &args.history {
        session = session.with_history(HistoryWriter::open(path)?);
    }

    let client = SearchClient::new(api, engine_id)?.with_cache_dir(&args.cache_dir);
    let scraper = if args.scrape { Some(PageScraper::new(&args.scrape_dir)?) } else { None };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    let outcome = session.run(&client, scraper.as_ref(), &mut input, &mut out).await?;

    match outcome {
        Outcome::Reached { round, precision } => println!("Desired precision reached after {round} round(s): {precision:.2}"),
        Outcome::NoResults { round } => println!("No results in round {round}, stopping"),
        Outcome::NoRelevant { round } => println!("Below desired precision, but can no longer augment the query (no relevant results in round {round})"),
        Outcome::NoNewTerms { round, precision } => println!("No new terms to add after round {round} (precision {precision:.2})"),
        Outcome::RoundLimit { precision } => println!("Round limit reached (precision {precision:.2})"),
    }
    println!("Final query: {}", session.query().join(" "));
    Ok(())
}
