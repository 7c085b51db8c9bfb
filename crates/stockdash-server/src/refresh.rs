//! The recompute-and-publish cycle.
//!
//! One cycle: load the ticker registry, load the comment batch, aggregate,
//! optionally persist the snapshot file, then publish to the in-memory
//! store. Persistence happens before the in-memory publish so a disk
//! failure leaves both layers on the previous snapshot — readers never see
//! a snapshot that failed to make it to durable storage.

use std::time::Instant;

use chrono::Utc;
use thiserror::Error;

use stockdash_core::AppConfig;
use stockdash_engine::{recompute, EngineConfig, EngineError};
use stockdash_store::ingest::{load_comments, load_registry, IngestError};
use stockdash_store::{persist, SnapshotStore, StoreError};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to persist snapshot: {0}")]
    Persist(#[from] StoreError),
}

/// Run one full refresh cycle against `store`.
///
/// # Errors
///
/// Any structural failure (unreadable files, empty registry, persistence
/// failure) aborts the cycle before the in-memory publish; the store keeps
/// its previous snapshot and the caller is expected to log and retry on the
/// next scheduled tick.
pub fn run_refresh_cycle(config: &AppConfig, store: &SnapshotStore) -> Result<(), RefreshError> {
    let started = Instant::now();

    // Registry first: without validation symbols there is nothing to do,
    // so fail before touching the (potentially large) comments file.
    let registry = load_registry(&config.tickers_path)?;
    let comments = load_comments(&config.comments_path)?;

    let engine_config = EngineConfig::from_app_config(config);
    let snapshot = recompute(&comments, &registry, &engine_config, Utc::now())?;

    if let Some(snapshot_path) = &config.snapshot_path {
        persist::write_snapshot(snapshot_path, &snapshot)?;
    }

    tracing::info!(
        comments = snapshot.summary.total_comments,
        tickers = snapshot.summary.unique_tickers,
        watchlist = snapshot.watchlist.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "refresh cycle complete"
    );
    store.publish(snapshot);
    Ok(())
}
