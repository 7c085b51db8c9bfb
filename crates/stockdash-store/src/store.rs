//! The in-memory single-slot snapshot store.

use std::sync::{Arc, RwLock};

use stockdash_core::AggregateSnapshot;

use crate::StoreError;

#[derive(Debug, Default)]
struct Slots {
    current: Option<Arc<AggregateSnapshot>>,
    backup: Option<Arc<AggregateSnapshot>>,
}

/// Holds exactly one "current" snapshot plus a single-slot backup.
///
/// Readers and writers exchange only an `Arc` pointer under a short lock:
/// a reader always gets either the whole old snapshot or the whole new one,
/// never a mix, and publishing never mutates a snapshot a reader already
/// holds.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    slots: RwLock<Slots>,
}

impl SnapshotStore {
    /// An empty store: [`Self::current`] returns `None` until the first
    /// publish.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the current snapshot. The previous current
    /// becomes the backup; any older backup is dropped.
    pub fn publish(&self, snapshot: AggregateSnapshot) {
        let snapshot = Arc::new(snapshot);
        let mut slots = self.slots.write().expect("snapshot store lock poisoned");
        slots.backup = slots.current.take();
        slots.current = Some(snapshot);
    }

    /// The current snapshot, or `None` before the first publish.
    #[must_use]
    pub fn current(&self) -> Option<Arc<AggregateSnapshot>> {
        self.slots
            .read()
            .expect("snapshot store lock poisoned")
            .current
            .clone()
    }

    /// Promote the backup snapshot to current, discarding the rejected
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoBackup`] when no prior snapshot exists.
    pub fn rollback(&self) -> Result<(), StoreError> {
        let mut slots = self.slots.write().expect("snapshot store lock poisoned");
        match slots.backup.take() {
            Some(previous) => {
                slots.current = Some(previous);
                Ok(())
            }
            None => Err(StoreError::NoBackup),
        }
    }
}
