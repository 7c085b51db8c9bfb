//! Derived dashboard views and the published snapshot.
//!
//! An [`AggregateSnapshot`] is one fully-computed, immutable result of an
//! aggregation run. Recomputation builds a new value; nothing here is ever
//! mutated after publication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Comment;

/// Per-ticker aggregate for the most-mentioned view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerAggregate {
    /// Normalized uppercase symbol, always a registry member.
    pub ticker: String,
    /// Number of *distinct* comments mentioning the ticker. A symbol
    /// repeated within one comment still counts once.
    pub mention_count: usize,
    /// Ids of mentioning comments, most recent first, bounded length.
    pub top_comment_ids: Vec<String>,
}

/// An author flagged as notable: high reputation and breadth of ticker
/// discussion across the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub author: String,
    /// Karma value used for qualification (highest observed across the
    /// author's comments in the batch).
    pub karma: i64,
    /// Every ticker the author mentioned in the batch, sorted ascending.
    pub distinct_tickers: Vec<String>,
}

/// The freshest comments for one leading ticker. Kept as a sequence rather
/// than a map so the view preserves mention-count rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerLatest {
    pub ticker: String,
    /// Comments mentioning the ticker, most recent first, bounded length.
    pub comments: Vec<Comment>,
}

/// Batch-level statistics rendered in the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_comments: usize,
    pub comments_with_tickers: usize,
    pub unique_tickers: usize,
    pub avg_score: f64,
    pub max_score: i64,
    /// Distinct authors at or above the watchlist karma threshold.
    pub high_karma_authors: usize,
}

/// One immutable, fully-computed instance of the four dashboard views plus
/// batch statistics and the computation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    /// Wall-clock time the aggregation ran.
    pub computed_at: DateTime<Utc>,

    /// Most-mentioned tickers, descending by `mention_count`, ties broken
    /// by ascending symbol.
    pub top_tickers: Vec<TickerAggregate>,

    /// Highest-scored comments, descending by `score`; ties broken by
    /// `created_at` descending then `id` ascending. Full records, since the
    /// dashboard renders body/author/karma inline.
    pub top_comments: Vec<Comment>,

    /// Qualifying authors, descending by karma, ties broken by name.
    pub watchlist: Vec<WatchlistEntry>,

    /// Freshest comments for the leading tickers, in mention-count rank
    /// order.
    pub latest_by_ticker: Vec<TickerLatest>,

    pub summary: SummaryStats,
}

impl AggregateSnapshot {
    /// A snapshot with every view empty, timestamped `computed_at`. This is
    /// what an empty input batch aggregates to.
    #[must_use]
    pub fn empty(computed_at: DateTime<Utc>) -> Self {
        Self {
            computed_at,
            top_tickers: Vec::new(),
            top_comments: Vec::new(),
            watchlist: Vec::new(),
            latest_by_ticker: Vec::new(),
            summary: SummaryStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_views() {
        let snapshot = AggregateSnapshot::empty(Utc::now());
        assert!(snapshot.top_tickers.is_empty());
        assert!(snapshot.top_comments.is_empty());
        assert!(snapshot.watchlist.is_empty());
        assert!(snapshot.latest_by_ticker.is_empty());
        assert_eq!(snapshot.summary, SummaryStats::default());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot = AggregateSnapshot {
            top_tickers: vec![TickerAggregate {
                ticker: "AAPL".to_string(),
                mention_count: 3,
                top_comment_ids: vec!["c2".to_string(), "c1".to_string()],
            }],
            watchlist: vec![WatchlistEntry {
                author: "trader_joe".to_string(),
                karma: 1200,
                distinct_tickers: vec!["AAPL".to_string(), "TSLA".to_string()],
            }],
            ..AggregateSnapshot::empty(Utc::now())
        };

        let json = serde_json::to_string(&snapshot).expect("serialize");
        let back: AggregateSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snapshot);
    }
}
