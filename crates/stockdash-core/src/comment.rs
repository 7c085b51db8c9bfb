//! The raw comment record consumed from the scraper's JSON output.
//!
//! ## Observed shape from the scraper's output file
//!
//! Each record carries `id`, `body`, `author`, `score`, `created_utc`
//! (Python `isoformat()` — an ISO-8601 string with *no* UTC offset),
//! `author_total_karma`, `parent_id`, plus bookkeeping fields the engine
//! does not use (`permalink`, `depth`, `ticker_count`, a pre-joined
//! `tickers` string). Ticker extraction is redone here from `body` against
//! an explicit registry, so the scraper-era `tickers` annotation is ignored.
//!
//! Deserialization is deliberately tolerant of field spelling drift between
//! scraper versions: canonical names (`author_karma`, `created_at`,
//! `thread_id`) are accepted alongside the scraper's names via serde
//! aliases, and timestamps may be RFC 3339, naive ISO-8601 (assumed UTC),
//! or numeric epoch seconds.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Author sentinel the scraper emits for removed or suspended accounts.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A single scraped forum comment. Immutable input to the aggregation
/// engine; the core never mutates or re-persists these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Opaque unique comment id.
    pub id: String,

    /// Raw comment text. Ticker extraction runs over this.
    pub body: String,

    /// Username; [`DELETED_AUTHOR`] for removed accounts.
    pub author: String,

    /// Author's total reputation at scrape time. Missing in older scrapes;
    /// defaults to 0, which keeps such authors below any sane watchlist
    /// threshold.
    #[serde(default, alias = "author_total_karma")]
    pub author_karma: i64,

    /// The comment's own vote score.
    #[serde(default)]
    pub score: i64,

    /// Creation time, normalized to UTC.
    #[serde(alias = "created_utc", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,

    /// Identifier of the parent discussion. May be empty.
    #[serde(default, alias = "parent_id")]
    pub thread_id: String,
}

impl Comment {
    /// Whether the author field carries a real username (not the deleted
    /// sentinel or an empty string).
    #[must_use]
    pub fn has_known_author(&self) -> bool {
        !self.author.is_empty() && self.author != DELETED_AUTHOR
    }
}

/// Accepts the timestamp shapes seen across scraper versions:
/// RFC 3339 (`2025-01-01T12:00:00Z`), naive ISO-8601 assumed UTC
/// (`2025-01-01T12:00:00.123456`, the Python `isoformat()` shape),
/// `YYYY-MM-DD HH:MM:SS`, and numeric epoch seconds.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Seconds(f64),
        Text(String),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Seconds(secs) => {
            let whole = secs.trunc();
            #[allow(clippy::cast_possible_truncation)]
            let nanos = ((secs - whole) * 1_000_000_000.0) as u32;
            #[allow(clippy::cast_possible_truncation)]
            let parsed = DateTime::from_timestamp(whole as i64, nanos);
            parsed.ok_or_else(|| serde::de::Error::custom(format!("epoch out of range: {secs}")))
        }
        RawTimestamp::Text(raw) => parse_timestamp_text(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp: {raw:?}"))),
    }
}

fn parse_timestamp_text(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Comment {
        serde_json::from_str(json).expect("comment should deserialize")
    }

    #[test]
    fn deserializes_scraper_field_names() {
        let comment = parse(
            r#"{
                "id": "m1abc",
                "body": "$AAPL looks strong",
                "author": "trader_joe",
                "score": 42,
                "created_utc": "2025-06-01T09:30:00.123456",
                "author_total_karma": 1500,
                "parent_id": "t3_lounge",
                "permalink": "/r/pennystocks/comments/x/",
                "ticker_count": 1
            }"#,
        );
        assert_eq!(comment.author_karma, 1500);
        assert_eq!(comment.thread_id, "t3_lounge");
        assert_eq!(comment.created_at.to_rfc3339(), "2025-06-01T09:30:00.123456+00:00");
    }

    #[test]
    fn deserializes_canonical_field_names() {
        let comment = parse(
            r#"{
                "id": "c1",
                "body": "no tickers here",
                "author": "x",
                "score": 1,
                "created_at": "2025-06-01T09:30:00Z",
                "author_karma": 10,
                "thread_id": "t3_a"
            }"#,
        );
        assert_eq!(comment.author_karma, 10);
        assert_eq!(comment.thread_id, "t3_a");
    }

    #[test]
    fn missing_karma_defaults_to_zero() {
        let comment = parse(
            r#"{"id":"c1","body":"hi","author":"x","score":3,"created_utc":"2025-06-01T00:00:00"}"#,
        );
        assert_eq!(comment.author_karma, 0);
        assert_eq!(comment.thread_id, "");
    }

    #[test]
    fn epoch_seconds_timestamp_accepted() {
        let comment = parse(
            r#"{"id":"c1","body":"hi","author":"x","score":0,"created_utc":1717200000}"#,
        );
        assert_eq!(comment.created_at.timestamp(), 1_717_200_000);
    }

    #[test]
    fn unparseable_timestamp_is_an_error() {
        let result: Result<Comment, _> = serde_json::from_str(
            r#"{"id":"c1","body":"hi","author":"x","score":0,"created_utc":"next tuesday"}"#,
        );
        assert!(result.is_err(), "expected error, got {result:?}");
    }

    #[test]
    fn deleted_sentinel_has_no_known_author() {
        let comment = parse(
            r#"{"id":"c1","body":"hi","author":"[deleted]","score":0,"created_utc":"2025-06-01T00:00:00"}"#,
        );
        assert!(!comment.has_known_author());
    }

    #[test]
    fn serializes_with_canonical_names() {
        let comment = parse(
            r#"{"id":"c1","body":"hi","author":"x","score":0,"created_utc":"2025-06-01T00:00:00","author_total_karma":5}"#,
        );
        let json = serde_json::to_value(&comment).expect("serialize");
        assert_eq!(json["author_karma"], 5);
        assert!(json["created_at"].is_string());
    }
}
