//! Durable snapshot persistence.
//!
//! Writes go to `<path>.tmp` first and are renamed into place, so the
//! published file is always either the old complete snapshot or the new
//! complete snapshot. The file being replaced is moved to `<path>.backup`
//! (one slot, overwritten each cycle) before the rename, mirroring the
//! in-memory store's rollback slot.

use std::fs;
use std::path::Path;

use stockdash_core::AggregateSnapshot;

use crate::StoreError;

/// Serialize `snapshot` and atomically replace the file at `path`.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if JSON encoding fails and
/// [`StoreError::Io`] on any filesystem failure. On failure the previous
/// file (or its backup) is left intact.
pub fn write_snapshot(path: &Path, snapshot: &AggregateSnapshot) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(snapshot)?;

    let tmp_path = sibling(path, "tmp");
    fs::write(&tmp_path, &json).map_err(|source| StoreError::Io {
        path: tmp_path.display().to_string(),
        source,
    })?;

    if path.exists() {
        let backup_path = sibling(path, "backup");
        fs::rename(path, &backup_path).map_err(|source| StoreError::Io {
            path: backup_path.display().to_string(),
            source,
        })?;
    }

    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "snapshot written");
    Ok(())
}

/// Load a previously written snapshot.
///
/// # Errors
///
/// Returns [`StoreError::Io`] when the file cannot be read and
/// [`StoreError::Serialize`] when its contents do not decode.
pub fn read_snapshot(path: &Path) -> Result<AggregateSnapshot, StoreError> {
    let raw = fs::read(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_slice(&raw)?)
}

/// `<path>.<extension>`, appended after any existing extension so
/// `snapshot.json` becomes `snapshot.json.tmp`.
fn sibling(path: &Path, extension: &str) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    std::path::PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use stockdash_core::{AggregateSnapshot, SummaryStats};

    use super::*;

    fn snapshot(marker: usize) -> AggregateSnapshot {
        AggregateSnapshot {
            summary: SummaryStats {
                total_comments: marker,
                ..SummaryStats::default()
            },
            ..AggregateSnapshot::empty(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");

        let original = snapshot(7);
        write_snapshot(&path, &original).expect("write");
        let loaded = read_snapshot(&path).expect("read");
        assert_eq!(loaded, original);
    }

    #[test]
    fn rewrite_keeps_previous_as_single_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        let backup = dir.path().join("snapshot.json.backup");

        write_snapshot(&path, &snapshot(1)).expect("first write");
        assert!(!backup.exists());

        write_snapshot(&path, &snapshot(2)).expect("second write");
        assert_eq!(read_snapshot(&path).expect("current").summary.total_comments, 2);
        assert_eq!(read_snapshot(&backup).expect("backup").summary.total_comments, 1);

        write_snapshot(&path, &snapshot(3)).expect("third write");
        // The backup slot holds only the immediately previous snapshot.
        assert_eq!(read_snapshot(&backup).expect("backup").summary.total_comments, 2);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        write_snapshot(&path, &snapshot(1)).expect("write");
        assert!(!dir.path().join("snapshot.json.tmp").exists());
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = read_snapshot(&dir.path().join("absent.json"));
        assert!(
            matches!(result, Err(StoreError::Io { .. })),
            "expected Io, got {result:?}"
        );
    }

    #[test]
    fn read_corrupt_file_is_serialize_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, b"{ not json").expect("seed corrupt file");
        let result = read_snapshot(&path);
        assert!(
            matches!(result, Err(StoreError::Serialize(_))),
            "expected Serialize, got {result:?}"
        );
    }
}
