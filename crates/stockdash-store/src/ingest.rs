//! Loading the scraper's output files into in-memory values.
//!
//! The scraper is a separate process; this module only reads what it
//! wrote. A file that cannot be read or parsed at the top level is a
//! structural failure (the refresh cycle aborts and the previous snapshot
//! stays current), but an individually malformed comment record is skipped
//! with a warning. One bad row should not blank the dashboard.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use stockdash_core::Comment;
use stockdash_engine::{EngineError, TickerRegistry};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("ticker registry at {path} is unusable: {source}")]
    Registry {
        path: String,
        #[source]
        source: EngineError,
    },

    #[error("comments file {path} is not a JSON array")]
    NotAnArray { path: String },
}

/// Load the comment batch from the scraper's JSON output.
///
/// Records that fail to deserialize (missing required fields, unparseable
/// timestamps) are logged and skipped.
///
/// # Errors
///
/// Returns [`IngestError`] when the file is unreadable, not valid JSON, or
/// not a top-level array.
pub fn load_comments(path: &Path) -> Result<Vec<Comment>, IngestError> {
    let raw = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| IngestError::Json {
        path: path.display().to_string(),
        source,
    })?;
    let Value::Array(entries) = value else {
        return Err(IngestError::NotAnArray {
            path: path.display().to_string(),
        });
    };

    let total = entries.len();
    let mut comments = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Comment>(entry) {
            Ok(comment) => comments.push(comment),
            Err(error) => {
                tracing::warn!(index, %error, "skipping malformed comment record");
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        loaded = comments.len(),
        skipped = total - comments.len(),
        "comment batch loaded"
    );
    Ok(comments)
}

/// Load the valid-ticker registry.
///
/// # Errors
///
/// Any failure here is structural — aggregation without validation symbols
/// is worse than staleness — so unreadable files, malformed JSON, and empty
/// registries all return [`IngestError`].
pub fn load_registry(path: &Path) -> Result<TickerRegistry, IngestError> {
    let raw = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let registry = TickerRegistry::from_json(&raw).map_err(|source| IngestError::Registry {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), symbols = registry.len(), "ticker registry loaded");
    Ok(registry)
}
