use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, sourced from env vars (see `config.rs`).
///
/// Everything has a default: the server and CLI run out of the box against
/// the scraper's conventional file locations.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,

    /// The scraper's JSON output file (the input batch).
    pub comments_path: PathBuf,
    /// Valid-ticker registry file (JSON array or keyed map).
    pub tickers_path: PathBuf,
    /// When set, each published snapshot is also written here durably.
    pub snapshot_path: Option<PathBuf>,

    /// Six-field cron expression for the recompute job.
    pub recompute_cron: String,

    /// Minimum author karma for watchlist eligibility.
    pub karma_threshold: i64,
    /// Minimum distinct tickers (across all of an author's comments in the
    /// batch) for watchlist eligibility.
    pub min_distinct_tickers: usize,
    pub top_tickers_limit: usize,
    pub top_comments_limit: usize,
    pub latest_tickers_limit: usize,
    pub latest_comments_per_ticker: usize,
}
