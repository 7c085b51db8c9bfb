use stockdash_core::AppConfig;

/// Tunable knobs for one aggregation run.
///
/// Defaults mirror the dashboard's production settings: a 500-karma floor
/// and two distinct tickers for watchlist entry, top-10 tickers, top-20
/// comments, and 5 latest comments for each of the 5 leading tickers.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum author karma for watchlist eligibility.
    pub karma_threshold: i64,
    /// Minimum distinct tickers, unioned across all of an author's comments
    /// in the batch, for watchlist eligibility.
    pub min_distinct_tickers: usize,
    pub top_tickers_limit: usize,
    pub top_comments_limit: usize,
    pub latest_tickers_limit: usize,
    /// Display bound for per-ticker comment lists (both the id lists on the
    /// top-tickers view and the latest-comments view).
    pub latest_comments_per_ticker: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            karma_threshold: 500,
            min_distinct_tickers: 2,
            top_tickers_limit: 10,
            top_comments_limit: 20,
            latest_tickers_limit: 5,
            latest_comments_per_ticker: 5,
        }
    }
}

impl EngineConfig {
    /// Lift the engine-relevant fields out of the process configuration.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            karma_threshold: config.karma_threshold,
            min_distinct_tickers: config.min_distinct_tickers,
            top_tickers_limit: config.top_tickers_limit,
            top_comments_limit: config.top_comments_limit,
            latest_tickers_limit: config.latest_tickers_limit,
            latest_comments_per_ticker: config.latest_comments_per_ticker,
        }
    }
}
