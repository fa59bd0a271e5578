// * Recovery snapshots
// * TTL-bound JSON snapshots on disk so an interrupted enhancement can be
// * resumed or its last result surfaced after a restart. Snapshots are
// * consumed on read.

use crate::config::constants::{IN_PROGRESS_TTL_SECS, LAST_RESULT_TTL_SECS};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Which snapshot slot to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// An enhancement that was started but not finished. Short-lived.
    EnhancementInProgress,
    /// The most recent completed enhancement result.
    LastEnhancement,
}

impl SnapshotKind {
    fn file_name(self) -> &'static str {
        match self {
            SnapshotKind::EnhancementInProgress => "enhancement_in_progress.json",
            SnapshotKind::LastEnhancement => "last_enhancement.json",
        }
    }

    fn ttl_secs(self) -> i64 {
        match self {
            SnapshotKind::EnhancementInProgress => IN_PROGRESS_TTL_SECS,
            SnapshotKind::LastEnhancement => LAST_RESULT_TTL_SECS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    timestamp: i64,
    data: T,
}

/// File-backed snapshot store with per-kind expiry.
#[derive(Debug, Clone)]
pub struct RecoveryCache {
    dir: PathBuf,
}

impl RecoveryCache {
    /// Cache rooted under the platform cache directory.
    pub fn new() -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabflow")
            .join("recovery");
        Self { dir }
    }

    /// Cache rooted at an explicit directory (tests use a temp dir).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes a snapshot, stamping it with the current time.
    pub fn store<T: Serialize>(&self, kind: SnapshotKind, data: &T) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let envelope = Envelope {
            timestamp: Utc::now().timestamp(),
            data,
        };
        let json = serde_json::to_string(&envelope)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(self.dir.join(kind.file_name()), json)
    }

    /// Reads and removes a snapshot. Returns None when the snapshot is
    /// missing, expired, or unreadable; expired files are deleted too.
    pub fn take<T: DeserializeOwned>(&self, kind: SnapshotKind) -> Option<T> {
        let path = self.dir.join(kind.file_name());
        let raw = fs::read_to_string(&path).ok()?;
        // * Consumed on read regardless of validity
        let _ = fs::remove_file(&path);

        let envelope: Envelope<T> = serde_json::from_str(&raw).ok()?;
        let age = Utc::now().timestamp() - envelope.timestamp;
        if age > kind.ttl_secs() {
            tracing::debug!(file = kind.file_name(), age, "snapshot expired");
            return None;
        }
        Some(envelope.data)
    }

    /// Removes a snapshot without reading it.
    pub fn clear(&self, kind: SnapshotKind) {
        let _ = fs::remove_file(self.dir.join(kind.file_name()));
    }
}

impl Default for RecoveryCache {
    fn default() -> Self {
        Self::new()
    }
}
