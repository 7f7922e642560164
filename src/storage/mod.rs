//! # Storage Module
//!
//! Durable state: per-user saved events and meeting registry snapshots.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Registry snapshots with a coalescing background writer
//! - 1.0.0: Initial creation with the JSON event store
//!
//! Both files are small whole-file JSON documents rewritten on change. At
//! this bot's write rates that is far simpler than a database and just as
//! safe, since every write goes through a temp file and an atomic rename.

pub mod file;
pub mod snapshot;

pub use file::JsonEventStore;
pub use snapshot::{load_snapshot, spawn_snapshot_writer, SnapshotWriter};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transport::UserId;

/// One calendar entry a user has saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Where saved events live.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events the user has saved, in save order.
    async fn events_for(&self, user: UserId) -> Result<Vec<StoredEvent>>;

    /// Append an event to the user's saved list.
    async fn record_event(&self, user: UserId, event: StoredEvent) -> Result<()>;
}
