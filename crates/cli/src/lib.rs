use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use wordrank_corpus::YearTotals;
use wordrank_ingest::{run_ingest, IngestConfig};
use wordrank_ranking::{RankingService, RescoreRequest, ScoringMode, WeightVector};

mod http_api;

#[derive(Parser)]
#[command(name = "wordrank")]
#[command(about = "Top-K word usage ranking over sharded frequency corpora", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge raw shards into a snapshot of the highest-count words
    Ingest(IngestArgs),

    /// Rescore a snapshot once and print a page of ranked points
    Rank(RankArgs),

    /// Print per-year corpus totals as JSON
    Totals(TotalsArgs),

    /// Serve rescoring and paging over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
struct IngestArgs {
    /// TOML config file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding grams<N>.csv shards
    #[arg(long)]
    shard_dir: Option<PathBuf>,

    /// First shard number
    #[arg(long)]
    shard_low: Option<u32>,

    /// Last shard number
    #[arg(long)]
    shard_high: Option<u32>,

    /// Number of words to retain
    #[arg(long)]
    capacity: Option<usize>,

    /// Hand-off queue size between readers and the merger
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Minimum lifetime total for a word to be kept
    #[arg(long)]
    count_cutoff: Option<u64>,

    /// Keep words containing digits or punctuation
    #[arg(long)]
    allow_symbols: bool,

    /// Do not emit the last word of each shard
    #[arg(long)]
    no_flush_tail: bool,

    /// Snapshot output path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct WeightArgs {
    /// Year to score and project onto
    #[arg(long)]
    year: i32,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    length_weight: f64,

    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    count_weight: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pages_weight: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    books_weight: f64,
}

impl WeightArgs {
    fn request(&self) -> RescoreRequest {
        RescoreRequest {
            year: self.year,
            weights: WeightVector::new(
                self.length_weight,
                self.count_weight,
                self.pages_weight,
                self.books_weight,
            ),
        }
    }
}

#[derive(Args)]
struct RankArgs {
    /// Snapshot written by `ingest`
    #[arg(long, default_value = "top.json")]
    snapshot: PathBuf,

    #[command(flatten)]
    weights: WeightArgs,

    /// Feature source for scoring
    #[arg(long, value_enum, default_value_t = ModeArg::PerYear)]
    mode: ModeArg,

    /// First ranked point to print
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Number of ranked points to print
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct TotalsArgs {
    /// Totals file; defaults to the totals path of --config (or ./tots.csv)
    #[arg(long)]
    file: Option<PathBuf>,

    /// TOML config file used to locate the totals file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Snapshot written by `ingest`
    #[arg(long, default_value = "top.json")]
    snapshot: PathBuf,

    /// Bind address, e.g. 0.0.0.0:8888
    #[arg(long, default_value = "0.0.0.0:8888")]
    bind: String,

    /// Feature source for scoring
    #[arg(long, value_enum, default_value_t = ModeArg::PerYear)]
    mode: ModeArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    PerYear,
    Lifetime,
}

impl From<ModeArg> for ScoringMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::PerYear => Self::PerYear,
            ModeArg::Lifetime => Self::Lifetime,
        }
    }
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Ingest(args) => ingest(args).await,
        Commands::Rank(args) => rank(args),
        Commands::Totals(args) => totals(args),
        Commands::Serve(args) => serve(args).await,
    }
}

fn ingest_config(args: &IngestArgs) -> Result<IngestConfig> {
    let mut config = match &args.config {
        Some(path) => IngestConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => IngestConfig::default(),
    };
    if let Some(dir) = &args.shard_dir {
        config.shard_dir = dir.clone();
    }
    if let Some(low) = args.shard_low {
        config.shard_low = low;
    }
    if let Some(high) = args.shard_high {
        config.shard_high = high;
    }
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(queue_capacity) = args.queue_capacity {
        config.queue_capacity = queue_capacity;
    }
    if let Some(cutoff) = args.count_cutoff {
        config.count_cutoff = cutoff;
    }
    if args.allow_symbols {
        config.alpha_only = false;
    }
    if args.no_flush_tail {
        config.flush_on_eof = false;
    }
    if let Some(out) = &args.out {
        config.snapshot_path = out.clone();
    }
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct IngestReport {
    snapshot: PathBuf,
    stats: wordrank_ingest::IngestStats,
}

async fn ingest(args: IngestArgs) -> Result<()> {
    let config = ingest_config(&args)?;
    let snapshot = config.snapshot_path.clone();
    let outcome = tokio::task::spawn_blocking(move || run_ingest(&config))
        .await
        .context("Ingest task panicked")??;

    print_json(
        &IngestReport {
            snapshot,
            stats: outcome.stats,
        },
        args.pretty,
    )
}

fn rank(args: RankArgs) -> Result<()> {
    let mut service = RankingService::from_snapshot_file(&args.snapshot, args.mode.into())
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    service.rescore(&args.weights.request())?;
    print_json(&service.page(args.offset, args.count), args.pretty)
}

fn totals(args: TotalsArgs) -> Result<()> {
    let path = match (args.file, args.config) {
        (Some(file), _) => file,
        (None, Some(config)) => IngestConfig::load(&config)
            .with_context(|| format!("Failed to load config {}", config.display()))?
            .totals_path(),
        (None, None) => IngestConfig::default().totals_path(),
    };
    let totals = YearTotals::load(&path)
        .with_context(|| format!("Failed to read totals {}", path.display()))?;
    print_json(&totals, args.pretty)
}

async fn serve(args: ServeArgs) -> Result<()> {
    let service = RankingService::from_snapshot_file(&args.snapshot, args.mode.into())
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let words = service.snapshot().len();
    let app = http_api::router(Arc::new(RwLock::new(service)));

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    let local_addr = listener.local_addr()?;
    log::info!("Serving {words} words on http://{local_addr}/data/");
    axum::serve(listener, app).await?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}
