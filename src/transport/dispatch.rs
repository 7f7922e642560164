//! # Chat Dispatcher
//!
//! Routes inbound events into one worker lane per chat.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.1.0: Retirement checks for late arrivals under the map guard
//! - 1.0.0: Initial creation
//!
//! Events for the same chat are handled strictly in arrival order; events
//! for different chats never wait on each other. Lanes retire after a quiet
//! period so a long-lived process doesn't accumulate one task per chat it
//! has ever seen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use log::{debug, error};
use tokio::sync::mpsc;

use crate::transport::{ChatId, Inbound, InboundSink};

struct Lane {
    id: u64,
    tx: mpsc::UnboundedSender<Inbound>,
}

#[derive(Clone)]
pub struct ChatDispatcher {
    lanes: Arc<DashMap<ChatId, Lane>>,
    sink: Arc<dyn InboundSink>,
    idle_after: Duration,
    next_lane_id: Arc<AtomicU64>,
}

impl ChatDispatcher {
    pub fn new(sink: Arc<dyn InboundSink>, idle_after: Duration) -> Self {
        Self {
            lanes: Arc::new(DashMap::new()),
            sink,
            idle_after,
            next_lane_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Hand an event to its chat's lane, starting one if needed.
    pub fn dispatch(&self, event: Inbound) {
        let chat = event.chat_id();
        let mut entry = self
            .lanes
            .entry(chat)
            .or_insert_with(|| self.spawn_lane(chat));
        if let Err(rejected) = entry.tx.send(event) {
            // The worker died without unregistering. Replace the lane;
            // a send to a freshly spawned one cannot fail.
            *entry.value_mut() = self.spawn_lane(chat);
            if let Err(e) = entry.tx.send(rejected.0) {
                error!("💥 chat {chat} lane refused an event twice: {e}");
            }
        }
    }

    /// Number of live lanes.
    pub fn active_lanes(&self) -> usize {
        self.lanes.len()
    }

    fn spawn_lane(&self, chat: ChatId) -> Lane {
        let lane_id = self.next_lane_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        debug!("🛤️ lane {lane_id} started for chat {chat}");
        tokio::spawn(run_lane(
            chat,
            lane_id,
            rx,
            Arc::clone(&self.sink),
            Arc::clone(&self.lanes),
            self.idle_after,
        ));
        Lane { id: lane_id, tx }
    }
}

async fn run_lane(
    chat: ChatId,
    lane_id: u64,
    mut rx: mpsc::UnboundedReceiver<Inbound>,
    sink: Arc<dyn InboundSink>,
    lanes: Arc<DashMap<ChatId, Lane>>,
    idle_after: Duration,
) {
    loop {
        match tokio::time::timeout(idle_after, rx.recv()).await {
            Ok(Some(event)) => {
                if let Err(e) = sink.handle(event).await {
                    error!("💥 handler error in chat {chat}: {e:#}");
                }
            }
            Ok(None) => break,
            Err(_) => {
                // Quiet long enough. The queue check runs inside the map
                // guard, so a send that beat the removal keeps this lane
                // alive and registered; dispatch can never split a chat's
                // events between a retiring worker and its replacement.
                let mut raced = None;
                lanes.remove_if(&chat, |_, lane| {
                    if lane.id != lane_id {
                        return false;
                    }
                    match rx.try_recv() {
                        Ok(event) => {
                            raced = Some(event);
                            false
                        }
                        Err(_) => true,
                    }
                });
                let Some(event) = raced else { break };
                debug!("🛤️ lane {lane_id} for chat {chat} kept alive by a late arrival");
                if let Err(e) = sink.handle(event).await {
                    error!("💥 handler error in chat {chat}: {e:#}");
                }
            }
        }
    }
    debug!("🛤️ lane {lane_id} for chat {chat} retired");
}
