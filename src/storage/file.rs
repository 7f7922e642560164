//! # JSON Event Store
//!
//! Whole-file JSON persistence for saved events, keyed by user id.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//!
//! The file is a single object mapping user ids to their saved events:
//!
//! ```json
//! {
//!   "123456": [
//!     { "title": "Standup", "start": "2024-06-15T14:30:00Z", "end": "2024-06-15T15:30:00Z" }
//!   ]
//! }
//! ```
//!
//! Every mutation is a load-modify-save cycle under one async lock, and the
//! save lands via temp file plus rename. A crash mid-write leaves the old
//! file intact.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::storage::{EventStore, StoredEvent};
use crate::transport::UserId;

type EventMap = BTreeMap<String, Vec<StoredEvent>>;

pub struct JsonEventStore {
    path: PathBuf,
    /// Serializes load-modify-save cycles.
    lock: Mutex<()>,
}

impl JsonEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<EventMap> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("malformed event store at {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(EventMap::new()),
            Err(e) => {
                Err(e).with_context(|| format!("couldn't read {}", self.path.display()))
            }
        }
    }

    async fn save(&self, map: &EventMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("couldn't create {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string_pretty(map).context("couldn't serialize event store")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .await
            .with_context(|| format!("couldn't write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("couldn't replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for JsonEventStore {
    async fn events_for(&self, user: UserId) -> Result<Vec<StoredEvent>> {
        let _guard = self.lock.lock().await;
        let map = self.load().await?;
        Ok(map.get(&user.to_string()).cloned().unwrap_or_default())
    }

    async fn record_event(&self, user: UserId, event: StoredEvent) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        map.entry(user.to_string()).or_default().push(event);
        self.save(&map).await
    }
}
