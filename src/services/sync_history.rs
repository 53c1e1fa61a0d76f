//! JSON-file log of trail sync runs, newest first.
//!
//! Deliberately not a database table: the log survives schema resets and is
//! trivially inspectable. Reads tolerate a missing or corrupt file so a bad
//! write can never take the admin endpoints down.

use crate::constants::SYNC_HISTORY_CAP;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const TIMESTAMP_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEntry {
    /// UTC wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// One of `success`, `warning`, `error`.
    pub status: String,
    pub message: String,
}

/// Handle on the sync history file. Cheap to clone, carries only the path.
#[derive(Clone)]
pub struct SyncHistory {
    path: PathBuf,
}

impl SyncHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SyncHistory { path: path.into() }
    }

    /// Prepend an entry and rewrite the file, keeping the newest
    /// [`SYNC_HISTORY_CAP`] entries.
    pub fn record(&self, status: &str, message: impl Into<String>) -> Result<SyncEntry> {
        let timestamp = OffsetDateTime::now_utc()
            .format(TIMESTAMP_FORMAT)
            .map_err(|e| AppError::Internal(format!("Failed to format timestamp: {e}")))?;
        let entry = SyncEntry {
            timestamp,
            status: status.to_string(),
            message: message.into(),
        };

        let mut entries = self.entries();
        entries.insert(0, entry.clone());
        entries.truncate(SYNC_HISTORY_CAP);

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| AppError::Internal(format!("Failed to serialize sync history: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| AppError::Internal(format!("Failed to write sync history: {e}")))?;

        Ok(entry)
    }

    /// All logged entries, newest first. A missing or unreadable file is an
    /// empty history, not an error.
    pub fn entries(&self) -> Vec<SyncEntry> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Sync history file {} is corrupt, starting fresh: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_prepends_newest_first() {
        let dir = tempdir().unwrap();
        let history = SyncHistory::new(dir.path().join("sync_history.json"));

        history.record("success", "Imported 10 trails").unwrap();
        history.record("warning", "API returned no records").unwrap();

        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, "warning");
        assert_eq!(entries[1].status, "success");
        assert_eq!(entries[1].message, "Imported 10 trails");
    }

    #[test]
    fn history_is_capped() {
        let dir = tempdir().unwrap();
        let history = SyncHistory::new(dir.path().join("sync_history.json"));

        for i in 0..(SYNC_HISTORY_CAP + 5) {
            history.record("success", format!("run {i}")).unwrap();
        }

        let entries = history.entries();
        assert_eq!(entries.len(), SYNC_HISTORY_CAP);
        assert_eq!(entries[0].message, format!("run {}", SYNC_HISTORY_CAP + 4));
    }

    #[test]
    fn missing_and_corrupt_files_read_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sync_history.json");

        let history = SyncHistory::new(&path);
        assert!(history.entries().is_empty());

        std::fs::write(&path, "not json at all").unwrap();
        assert!(history.entries().is_empty());

        // Recording over a corrupt file starts a fresh history
        history.record("error", "upstream timeout").unwrap();
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn timestamp_has_the_expected_shape() {
        let dir = tempdir().unwrap();
        let history = SyncHistory::new(dir.path().join("sync_history.json"));
        let entry = history.record("success", "ok").unwrap();
        assert_eq!(entry.timestamp.len(), 19);
        assert_eq!(&entry.timestamp[4..5], "-");
        assert_eq!(&entry.timestamp[10..11], " ");
    }
}
