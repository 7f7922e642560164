//! # Meeting Snapshots
//!
//! Background persistence of the meeting registry.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//!
//! The registry publishes its full contents after every mutation; a single
//! writer task owns the file. Bursts coalesce, the newest snapshot wins, and
//! handler paths never wait on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error, warn};
use tokio::fs;
use tokio::sync::mpsc;

use crate::features::meetings::MeetingRecord;

/// Handle the registry publishes through.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<Vec<MeetingRecord>>,
}

impl SnapshotWriter {
    pub fn publish(&self, records: Vec<MeetingRecord>) {
        if self.tx.send(records).is_err() {
            warn!("💾 snapshot writer is gone, meeting state not persisted");
        }
    }
}

/// A writer handle wired to a bare channel, for callers that want to observe
/// published snapshots instead of writing them.
pub fn channel() -> (SnapshotWriter, mpsc::UnboundedReceiver<Vec<MeetingRecord>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SnapshotWriter { tx }, rx)
}

/// Spawn the writer task. Returns the handle mutating code publishes to.
pub fn spawn_snapshot_writer(path: PathBuf) -> SnapshotWriter {
    let (writer, mut rx) = channel();
    tokio::spawn(async move {
        while let Some(records) = rx.recv().await {
            // Collapse a burst of publishes down to the newest state.
            let mut latest = records;
            while let Ok(newer) = rx.try_recv() {
                latest = newer;
            }
            match write_snapshot(&path, &latest).await {
                Ok(()) => debug!("💾 snapshot of {} meeting(s) written", latest.len()),
                Err(e) => error!("💾 meeting snapshot write failed: {e:#}"),
            }
        }
    });
    writer
}

/// Read a snapshot back. A missing file is an empty registry, not an error.
pub async fn load_snapshot(path: &Path) -> Result<Vec<MeetingRecord>> {
    match fs::read_to_string(path).await {
        Ok(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("malformed meeting snapshot at {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("couldn't read {}", path.display())),
    }
}

async fn write_snapshot(path: &Path, records: &[MeetingRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("couldn't create {}", parent.display()))?;
        }
    }
    let raw = serde_json::to_string_pretty(records).context("couldn't serialize snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)
        .await
        .with_context(|| format!("couldn't write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("couldn't replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("huddle-meetings-{}.json", Uuid::new_v4()))
    }

    fn record(id: &str, title: &str) -> MeetingRecord {
        MeetingRecord {
            id: id.to_string(),
            title: title.to_string(),
            start: Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap(),
            organizer: 100,
            participants: vec![100],
            description: "Meeting organized by Alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_empty() {
        assert!(load_snapshot(&temp_path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_publish_wins() {
        let path = temp_path();
        let writer = spawn_snapshot_writer(path.clone());

        writer.publish(vec![record("meeting1", "Old title")]);
        writer.publish(vec![
            record("meeting1", "New title"),
            record("meeting2", "Second"),
        ]);
        tokio::time::sleep(Duration::from_millis(300)).await;

        let restored = load_snapshot(&path).await.unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].title, "New title");
        assert_eq!(restored[1].id, "meeting2");

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let path = temp_path();
        let original = record("meeting1", "Standup");
        write_snapshot(&path, std::slice::from_ref(&original))
            .await
            .unwrap();

        let restored = load_snapshot(&path).await.unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].id, original.id);
        assert_eq!(restored[0].start, original.start);
        assert_eq!(restored[0].participants, original.participants);

        std::fs::remove_file(path).ok();
    }
}
