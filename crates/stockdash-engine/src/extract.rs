//! Ticker-candidate extraction from comment text.
//!
//! Heuristic (deliberately permissive; the registry filter does the real
//! validation):
//! - `$`-sigiled tokens of 1–5 letters in any case (`$aapl`, `$TSLA`), and
//! - bare ALL-CAPS tokens of 1–5 letters at word boundaries (`AAPL`).
//!
//! The tradeoff: bare-caps matching catches the common sigil-less style
//! (`"AAPL to the moon"`) at the cost of flagging ordinary uppercase words
//! (`CEO`, `USA`) that happen to collide with real symbols. Collisions with
//! *registered* symbols are accepted ambiguity; everything else is dropped
//! by the registry check.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::registry::TickerRegistry;

/// Cashtags: `$` followed by 1–5 letters. Bare candidates: 1–5 uppercase
/// letters delimited by word boundaries, so substrings of longer words
/// (`"Apple"`, `"TOOLONG"`) never match.
fn candidate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$([A-Za-z]{1,5})\b|\b([A-Z]{1,5})\b").expect("valid ticker regex")
    })
}

/// Extract the distinct valid tickers mentioned in `text`.
///
/// Candidates are uppercased and kept only when present in `registry`;
/// unknown tokens are discarded silently — most uppercase words are not
/// tickers, and that is expected, not an error. The result is a set, so a
/// symbol repeated within one comment appears once. Pure function of
/// `(text, registry)`.
#[must_use]
pub fn extract_tickers(text: &str, registry: &TickerRegistry) -> BTreeSet<String> {
    let mut tickers = BTreeSet::new();
    for captures in candidate_pattern().captures_iter(text) {
        let Some(token) = captures.get(1).or_else(|| captures.get(2)) else {
            continue;
        };
        let candidate = token.as_str().to_uppercase();
        if registry.contains(&candidate) {
            tickers.insert(candidate);
        }
    }
    tickers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TickerRegistry {
        TickerRegistry::from_symbols(["AAPL", "TSLA", "GME", "F", "A"])
    }

    fn extract(text: &str) -> Vec<String> {
        extract_tickers(text, &registry()).into_iter().collect()
    }

    #[test]
    fn cashtag_is_extracted() {
        assert_eq!(extract("$AAPL to the moon"), vec!["AAPL"]);
    }

    #[test]
    fn lowercase_cashtag_is_normalized() {
        assert_eq!(extract("loading up on $aapl today"), vec!["AAPL"]);
    }

    #[test]
    fn bare_all_caps_token_is_extracted() {
        assert_eq!(extract("AAPL again"), vec!["AAPL"]);
    }

    #[test]
    fn bare_lowercase_word_is_not_a_candidate() {
        assert!(extract("i think aapl will run").is_empty());
    }

    #[test]
    fn mixed_case_word_is_not_a_candidate() {
        assert!(extract("Apple makes phones, Tesla makes cars").is_empty());
    }

    #[test]
    fn unregistered_caps_words_are_discarded() {
        // "CEO" and "NOT" match the heuristic but are not registered.
        assert_eq!(extract("the CEO said AAPL is NOT done"), vec!["AAPL"]);
    }

    #[test]
    fn duplicates_within_one_comment_collapse() {
        assert_eq!(extract("$AAPL AAPL $aapl all day"), vec!["AAPL"]);
    }

    #[test]
    fn multiple_tickers_come_back_sorted() {
        assert_eq!(
            extract("$TSLA dip, $AAPL rip, GME squeeze"),
            vec!["AAPL", "GME", "TSLA"]
        );
    }

    #[test]
    fn six_letter_caps_word_is_not_a_candidate() {
        let registry = TickerRegistry::from_symbols(["SQUEEZ"]);
        assert!(extract_tickers("SQUEEZ incoming", &registry).is_empty());
    }

    #[test]
    fn punctuation_delimits_candidates() {
        assert_eq!(extract("buy $AAPL, sell $TSLA."), vec!["AAPL", "TSLA"]);
    }

    #[test]
    fn single_letter_ticker_requires_registry_hit() {
        assert_eq!(extract("grade A stock: F"), vec!["A", "F"]);
        let narrow = TickerRegistry::from_symbols(["F"]);
        let found: Vec<String> = extract_tickers("grade A stock: F", &narrow)
            .into_iter()
            .collect();
        assert_eq!(found, vec!["F"]);
    }

    #[test]
    fn empty_text_yields_empty_set() {
        assert!(extract("").is_empty());
    }
}
