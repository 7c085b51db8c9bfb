//! Folds a batch of comments into one [`AggregateSnapshot`].
//!
//! All ranking keys carry explicit tie-breaks so the ordering is total:
//! identical input always produces an identical snapshot (modulo
//! `computed_at`).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use stockdash_core::{
    AggregateSnapshot, Comment, SummaryStats, TickerAggregate, TickerLatest, WatchlistEntry,
};

use crate::error::EngineError;
use crate::extract::extract_tickers;
use crate::registry::TickerRegistry;
use crate::types::EngineConfig;

/// Aggregate `comments` into a complete snapshot timestamped `now`.
///
/// The input is read-only; the caller decides what to do with the result
/// (typically publish it to a snapshot store). Recomputing over the same
/// batch, registry, and config yields an identical snapshot apart from the
/// timestamp.
///
/// An empty batch is not an error — it aggregates to a snapshot with every
/// view empty.
///
/// # Errors
///
/// Returns [`EngineError::EmptyRegistry`] when the registry has no symbols.
/// Ticker validation is not optional: aggregating against an empty registry
/// would publish a confidently wrong "no mentions anywhere" result, and the
/// caller should keep its previous snapshot instead.
pub fn recompute(
    comments: &[Comment],
    registry: &TickerRegistry,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<AggregateSnapshot, EngineError> {
    if registry.is_empty() {
        return Err(EngineError::EmptyRegistry);
    }

    // Per-comment ticker *sets*: repeats within a comment collapse here,
    // which is what makes mention_count a distinct-comment count.
    let mentions: Vec<BTreeSet<String>> = comments
        .iter()
        .map(|comment| extract_tickers(&comment.body, registry))
        .collect();

    // Ticker -> indices of the comments mentioning it. BTreeMap keeps the
    // ascending-symbol order that doubles as the mention-count tie-break.
    let mut mentioning: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, tickers) in mentions.iter().enumerate() {
        for ticker in tickers {
            mentioning.entry(ticker.as_str()).or_default().push(idx);
        }
    }

    let top_tickers = rank_tickers(comments, &mentioning, config);
    let latest_by_ticker = latest_for_leaders(comments, &mentioning, &top_tickers, config);
    let top_comments = rank_comments(comments, config.top_comments_limit);
    let watchlist = build_watchlist(comments, &mentions, config);
    let summary = summarize(comments, &mentions, &mentioning, config);

    tracing::debug!(
        comments = comments.len(),
        unique_tickers = mentioning.len(),
        watchlist = watchlist.len(),
        "aggregation complete"
    );

    Ok(AggregateSnapshot {
        computed_at: now,
        top_tickers,
        top_comments,
        watchlist,
        latest_by_ticker,
        summary,
    })
}

/// Most-mentioned tickers: mention_count descending, symbol ascending on
/// ties, truncated to the configured limit.
fn rank_tickers(
    comments: &[Comment],
    mentioning: &BTreeMap<&str, Vec<usize>>,
    config: &EngineConfig,
) -> Vec<TickerAggregate> {
    let mut ranked: Vec<(&str, &Vec<usize>)> = mentioning.iter().map(|(t, v)| (*t, v)).collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(config.top_tickers_limit);

    ranked
        .into_iter()
        .map(|(ticker, indices)| {
            let recent = most_recent_first(comments, indices);
            TickerAggregate {
                ticker: ticker.to_string(),
                mention_count: indices.len(),
                top_comment_ids: recent
                    .into_iter()
                    .take(config.latest_comments_per_ticker)
                    .map(|idx| comments[idx].id.clone())
                    .collect(),
            }
        })
        .collect()
}

/// Highest-scored comments: score descending, then created_at descending
/// (recency wins), then id ascending. Ticker-less comments are eligible —
/// this view ranks by score alone.
fn rank_comments(comments: &[Comment], limit: usize) -> Vec<Comment> {
    let mut indices: Vec<usize> = (0..comments.len()).collect();
    indices.sort_by(|&a, &b| {
        comments[b]
            .score
            .cmp(&comments[a].score)
            .then_with(|| comments[b].created_at.cmp(&comments[a].created_at))
            .then_with(|| comments[a].id.cmp(&comments[b].id))
    });
    indices
        .into_iter()
        .take(limit)
        .map(|idx| comments[idx].clone())
        .collect()
}

/// Authors with karma at or above the threshold who mentioned at least the
/// configured number of distinct tickers across *all* their comments in the
/// batch. The deleted-account sentinel never qualifies.
fn build_watchlist(
    comments: &[Comment],
    mentions: &[BTreeSet<String>],
    config: &EngineConfig,
) -> Vec<WatchlistEntry> {
    let mut by_author: BTreeMap<&str, (i64, BTreeSet<&str>)> = BTreeMap::new();
    for (comment, tickers) in comments.iter().zip(mentions) {
        if !comment.has_known_author() {
            continue;
        }
        let entry = by_author
            .entry(comment.author.as_str())
            .or_insert((i64::MIN, BTreeSet::new()));
        // Karma can drift between scrapes of the same author; take the
        // highest observed value so qualification is deterministic.
        entry.0 = entry.0.max(comment.author_karma);
        entry.1.extend(tickers.iter().map(String::as_str));
    }

    let mut watchlist: Vec<WatchlistEntry> = by_author
        .into_iter()
        .filter(|(_, (karma, tickers))| {
            *karma >= config.karma_threshold && tickers.len() >= config.min_distinct_tickers
        })
        .map(|(author, (karma, tickers))| WatchlistEntry {
            author: author.to_string(),
            karma,
            distinct_tickers: tickers.into_iter().map(ToOwned::to_owned).collect(),
        })
        .collect();

    watchlist.sort_by(|a, b| b.karma.cmp(&a.karma).then_with(|| a.author.cmp(&b.author)));
    watchlist
}

/// Freshest comments for the leading tickers, in the same rank order as the
/// top-tickers view.
fn latest_for_leaders(
    comments: &[Comment],
    mentioning: &BTreeMap<&str, Vec<usize>>,
    top_tickers: &[TickerAggregate],
    config: &EngineConfig,
) -> Vec<TickerLatest> {
    top_tickers
        .iter()
        .take(config.latest_tickers_limit)
        .map(|aggregate| {
            let indices = mentioning
                .get(aggregate.ticker.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let recent = most_recent_first(comments, indices);
            TickerLatest {
                ticker: aggregate.ticker.clone(),
                comments: recent
                    .into_iter()
                    .take(config.latest_comments_per_ticker)
                    .map(|idx| comments[idx].clone())
                    .collect(),
            }
        })
        .collect()
}

/// Sort comment indices newest-first, ties broken by id ascending.
fn most_recent_first(comments: &[Comment], indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_by(|&a, &b| {
        comments[b]
            .created_at
            .cmp(&comments[a].created_at)
            .then_with(|| comments[a].id.cmp(&comments[b].id))
    });
    sorted
}

/// Batch-level statistics for the dashboard header.
fn summarize(
    comments: &[Comment],
    mentions: &[BTreeSet<String>],
    mentioning: &BTreeMap<&str, Vec<usize>>,
    config: &EngineConfig,
) -> SummaryStats {
    let total_comments = comments.len();
    let comments_with_tickers = mentions.iter().filter(|t| !t.is_empty()).count();

    let avg_score = if comments.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = comments.iter().map(|c| c.score).sum::<i64>() as f64 / total_comments as f64;
        (mean * 100.0).round() / 100.0
    };
    let max_score = comments.iter().map(|c| c.score).max().unwrap_or(0);

    let high_karma_authors = comments
        .iter()
        .filter(|c| c.has_known_author() && c.author_karma >= config.karma_threshold)
        .map(|c| c.author.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    SummaryStats {
        total_comments,
        comments_with_tickers,
        unique_tickers: mentioning.len(),
        avg_score,
        max_score,
        high_karma_authors,
    }
}
