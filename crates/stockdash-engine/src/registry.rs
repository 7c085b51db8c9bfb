//! The set of valid ticker symbols used to validate extracted candidates.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::EngineError;

/// An immutable set of valid, uppercase ticker symbols.
///
/// Membership here is the only validation applied to extracted candidates:
/// a token that matches the extraction heuristic but is absent from the
/// registry is silently discarded.
#[derive(Debug, Clone, Default)]
pub struct TickerRegistry {
    symbols: HashSet<String>,
}

impl TickerRegistry {
    /// Build a registry from raw symbols. Input is uppercased and
    /// deduplicated; empty strings are dropped.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { symbols }
    }

    /// Parse a registry from the ticker file's JSON text.
    ///
    /// Two shapes are accepted, matching the formats the scraper has
    /// shipped over time:
    /// - a flat array of symbol strings: `["AAPL", "TSLA"]`
    /// - a map of objects each carrying a `"ticker"` field:
    ///   `{"0": {"ticker": "AAPL", "title": "Apple Inc."}, ...}`
    ///
    /// Non-string array entries and map values without a `"ticker"` field
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RegistryJson`] on malformed JSON,
    /// [`EngineError::RegistryShape`] when the top-level value is neither an
    /// array nor an object, and [`EngineError::EmptyRegistry`] when no
    /// symbols survive parsing — an empty registry would silently discard
    /// every mention, so it is treated as a hard failure.
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(raw)?;

        let symbols: Vec<String> = match value {
            Value::Array(entries) => entries
                .into_iter()
                .filter_map(|entry| entry.as_str().map(ToOwned::to_owned))
                .collect(),
            Value::Object(entries) => entries
                .into_values()
                .filter_map(|entry| {
                    entry
                        .get("ticker")
                        .and_then(Value::as_str)
                        .map(ToOwned::to_owned)
                })
                .collect(),
            other => {
                return Err(EngineError::RegistryShape(format!(
                    "expected array or object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let registry = Self::from_symbols(symbols);
        if registry.is_empty() {
            return Err(EngineError::EmptyRegistry);
        }
        Ok(registry)
    }

    /// Case-insensitive membership test.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(&symbol.to_uppercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
