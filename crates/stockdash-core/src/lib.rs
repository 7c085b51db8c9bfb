//! Shared domain types and configuration for stockdash.
//!
//! Holds the [`Comment`] record produced by the external scraper, the
//! derived snapshot types published for the dashboard, and the env-driven
//! application configuration.

mod app_config;
mod comment;
mod config;
mod snapshot;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use comment::{Comment, DELETED_AUTHOR};
pub use config::{load_app_config, load_app_config_from_env};
pub use snapshot::{
    AggregateSnapshot, SummaryStats, TickerAggregate, TickerLatest, WatchlistEntry,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
