//! Batch command-line interface.
//!
//! `recompute` is the cron-invokable path: load the scraper's comment
//! batch and the ticker registry, aggregate, and write the snapshot —
//! atomically to a file, or to stdout for inspection. Exits nonzero on any
//! structural failure so a supervising cron job notices.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};

use stockdash_engine::{recompute, EngineConfig};
use stockdash_store::ingest::{load_comments, load_registry};
use stockdash_store::persist;

#[derive(Debug, Parser)]
#[command(name = "stockdash-cli")]
#[command(about = "stockdash batch tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Aggregate a comment batch into a dashboard snapshot.
    Recompute {
        /// Scraper output file. Defaults to STOCKDASH_COMMENTS_PATH.
        #[arg(long)]
        comments: Option<PathBuf>,

        /// Ticker registry file. Defaults to STOCKDASH_TICKERS_PATH.
        #[arg(long)]
        tickers: Option<PathBuf>,

        /// Snapshot destination, written atomically with a `.backup` of the
        /// previous file. Falls back to STOCKDASH_SNAPSHOT_PATH; when
        /// neither is set the snapshot goes to stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pretty-print stdout output.
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Recompute {
            comments,
            tickers,
            out,
            pretty,
        } => run_recompute(comments, tickers, out, pretty),
    }
}

fn run_recompute(
    comments: Option<PathBuf>,
    tickers: Option<PathBuf>,
    out: Option<PathBuf>,
    pretty: bool,
) -> anyhow::Result<()> {
    let config = stockdash_core::load_app_config_from_env()?;
    let comments_path = comments.unwrap_or_else(|| config.comments_path.clone());
    let tickers_path = tickers.unwrap_or_else(|| config.tickers_path.clone());

    let registry = load_registry(&tickers_path)?;
    let batch = load_comments(&comments_path)?;
    let snapshot = recompute(
        &batch,
        &registry,
        &EngineConfig::from_app_config(&config),
        Utc::now(),
    )?;

    tracing::info!(
        comments = snapshot.summary.total_comments,
        with_tickers = snapshot.summary.comments_with_tickers,
        unique_tickers = snapshot.summary.unique_tickers,
        watchlist = snapshot.watchlist.len(),
        "aggregation complete"
    );

    match out.or(config.snapshot_path) {
        Some(path) => {
            persist::write_snapshot(&path, &snapshot)?;
            tracing::info!(path = %path.display(), "snapshot written");
        }
        None => {
            let json = if pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{json}");
        }
    }
    Ok(())
}
