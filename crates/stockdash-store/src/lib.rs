//! Snapshot storage for stockdash.
//!
//! [`SnapshotStore`] holds the single current [`AggregateSnapshot`] behind
//! an atomically-swapped handle, with a one-slot backup for rollback.
//! [`persist`] adds the durable side: write-temp-then-rename with the same
//! single-backup discipline, so a crash mid-write never leaves a
//! half-written snapshot on disk. [`ingest`] is the input side of the same
//! boundary: reading the scraper's comment batches and the ticker registry
//! file into in-memory values.

pub mod ingest;
pub mod persist;
pub mod store;

use thiserror::Error;

pub use ingest::IngestError;
pub use store::SnapshotStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no backup snapshot available to roll back to")]
    NoBackup,
}
