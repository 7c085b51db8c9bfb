//! Comment aggregation and ranking engine for stockdash.
//!
//! Validates ticker mentions against an explicit registry, then folds a
//! batch of scraped comments into the four dashboard views: most-mentioned
//! tickers, highest-scored comments, a watchlist of influential
//! multi-ticker posters, and the freshest comments per leading ticker.
//! Everything here is a pure, synchronous function of its inputs (no I/O,
//! no clocks), so runs are deterministic and trivially testable.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod registry;
pub mod types;

pub use aggregate::recompute;
pub use error::EngineError;
pub use extract::extract_tickers;
pub use registry::TickerRegistry;
pub use types::EngineConfig;
