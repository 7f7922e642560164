//! # Reminder Scheduler
//!
//! One timer task per meeting, firing a fixed lead before the start.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.2.0: Fire-time cleanup gated on registration and keyed by generation
//! - 1.1.0: Cancellation and boot-time re-arming
//! - 1.0.0: Initial creation
//!
//! The fan-out reads the registry at fire time, not at arm time, so
//! participants who join through an invite after the timer was armed still
//! get their reminder.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use log::{debug, error, info};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::features::meetings::{MeetingRecord, MeetingRegistry};
use crate::transport::ChatSink;

struct Timer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct ReminderScheduler {
    timers: Arc<DashMap<String, Timer>>,
    next_generation: Arc<AtomicU64>,
    sink: Arc<dyn ChatSink>,
    registry: Arc<MeetingRegistry>,
    lead_minutes: i64,
}

impl ReminderScheduler {
    pub fn new(sink: Arc<dyn ChatSink>, registry: Arc<MeetingRegistry>, lead_minutes: i64) -> Self {
        Self {
            timers: Arc::new(DashMap::new()),
            next_generation: Arc::new(AtomicU64::new(1)),
            sink,
            registry,
            lead_minutes,
        }
    }

    /// Arm the reminder timer for a meeting.
    ///
    /// A timer already pending for the same meeting is replaced. Meetings
    /// whose reminder instant has already passed get no timer at all.
    pub fn arm(&self, record: &MeetingRecord) {
        let fire_at = record.start - chrono::Duration::minutes(self.lead_minutes);
        let Ok(delay) = (fire_at - Utc::now()).to_std() else {
            info!(
                "⏭️ reminder for meeting {} skipped, {} is already in the past",
                record.id,
                fire_at.format("%Y-%m-%d %H:%M"),
            );
            return;
        };

        if let Some((_, old)) = self.timers.remove(&record.id) {
            old.handle.abort();
            debug!("⏰ replacing pending reminder for meeting {}", record.id);
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (registered_tx, registered_rx) = oneshot::channel();
        let timers = Arc::clone(&self.timers);
        let sink = Arc::clone(&self.sink);
        let registry = Arc::clone(&self.registry);
        let meeting_id = record.id.clone();
        let lead_minutes = self.lead_minutes;

        info!(
            "⏰ reminder armed for meeting {} at {}",
            record.id,
            fire_at.format("%Y-%m-%d %H:%M"),
        );
        let handle = tokio::spawn(async move {
            // Wait for the insert below, so a timer that fires instantly
            // cannot run its cleanup before the handle is in the map.
            let _ = registered_rx.await;
            tokio::time::sleep(delay).await;
            deliver(sink.as_ref(), &registry, &meeting_id, lead_minutes).await;
            // A replacement armed meanwhile carries a newer generation.
            timers.remove_if(&meeting_id, |_, timer| timer.generation == generation);
        });
        self.timers.insert(record.id.clone(), Timer { generation, handle });
        let _ = registered_tx.send(());
    }

    /// Abort the pending timer for a meeting. Returns whether one existed.
    pub fn cancel(&self, meeting_id: &str) -> bool {
        match self.timers.remove(meeting_id) {
            Some((_, timer)) => {
                timer.handle.abort();
                info!("🔕 reminder cancelled for meeting {meeting_id}");
                true
            }
            None => false,
        }
    }

    /// Number of timers currently pending.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Abort every pending timer.
    pub fn shutdown(&self) {
        self.timers.retain(|_, timer| {
            timer.handle.abort();
            false
        });
    }
}

async fn deliver(
    sink: &dyn ChatSink,
    registry: &MeetingRegistry,
    meeting_id: &str,
    lead_minutes: i64,
) {
    // Fresh read: the participant list may have grown since arming.
    let Some(record) = registry.get(meeting_id) else {
        debug!("🔕 reminder fired for vanished meeting {meeting_id}, nothing to send");
        return;
    };
    let text = record.reminder_text(lead_minutes);
    info!(
        "🔔 delivering reminder for meeting {meeting_id} to {} participant(s)",
        record.participants.len(),
    );
    for user in &record.participants {
        // A user's private chat with the bot shares the user's id.
        if let Err(e) = sink.send(*user, &text).await {
            error!("❌ reminder for meeting {meeting_id} failed for user {user}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ChatId, Keyboard, MessageRef};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(ChatId, String)>>,
    }

    impl RecordingSink {
        fn sent(&self) -> Vec<(ChatId, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatSink for RecordingSink {
        async fn send(&self, chat: ChatId, text: &str) -> Result<MessageRef> {
            let mut sent = self.sent.lock().unwrap();
            sent.push((chat, text.to_string()));
            Ok(sent.len() as MessageRef)
        }

        async fn send_with_keyboard(
            &self,
            chat: ChatId,
            text: &str,
            _keyboard: &Keyboard,
        ) -> Result<MessageRef> {
            self.send(chat, text).await
        }

        async fn edit(
            &self,
            _chat: ChatId,
            _message: MessageRef,
            _text: &str,
            _keyboard: Option<&Keyboard>,
        ) -> Result<()> {
            Ok(())
        }

        async fn ack_selection(&self, _selection_id: &str, _toast: Option<&str>) -> Result<()> {
            Ok(())
        }
    }

    fn record(id: &str, start: DateTime<Utc>, participants: Vec<i64>) -> MeetingRecord {
        MeetingRecord {
            id: id.to_string(),
            title: "Standup".to_string(),
            start,
            organizer: participants.first().copied().unwrap_or(0),
            participants,
            description: "Meeting organized by Alice".to_string(),
            created_at: Utc::now(),
        }
    }

    fn scheduler_with(
        records: Vec<MeetingRecord>,
        lead_minutes: i64,
    ) -> (ReminderScheduler, Arc<RecordingSink>, Arc<MeetingRegistry>) {
        let sink = Arc::new(RecordingSink::default());
        let registry = Arc::new(MeetingRegistry::new());
        registry.restore(records);
        let scheduler = ReminderScheduler::new(sink.clone(), registry.clone(), lead_minutes);
        (scheduler, sink, registry)
    }

    #[tokio::test]
    async fn test_past_meetings_are_skipped() {
        let past = record("meeting1", Utc::now() - ChronoDuration::hours(1), vec![100]);
        let (scheduler, sink, _) = scheduler_with(vec![past.clone()], 30);

        scheduler.arm(&past);
        assert_eq!(scheduler.pending(), 0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_fires_for_every_participant() {
        let soon = record(
            "meeting1",
            Utc::now() + ChronoDuration::milliseconds(100),
            vec![100, 200],
        );
        let (scheduler, sink, _) = scheduler_with(vec![soon.clone()], 0);

        scheduler.arm(&soon);
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, 100);
        assert_eq!(sent[1].0, 200);
        assert!(sent[0].1.contains("Standup"));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn test_fanout_sees_late_joiners() {
        let soon = record(
            "meeting1",
            Utc::now() + ChronoDuration::milliseconds(200),
            vec![100],
        );
        let (scheduler, sink, registry) = scheduler_with(vec![soon.clone()], 0);

        scheduler.arm(&soon);
        registry.join("meeting1", 300);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let chats: Vec<ChatId> = sink.sent().iter().map(|(chat, _)| *chat).collect();
        assert_eq!(chats, vec![100, 300]);
    }

    #[tokio::test]
    async fn test_cancel_prevents_delivery() {
        let soon = record(
            "meeting1",
            Utc::now() + ChronoDuration::milliseconds(100),
            vec![100],
        );
        let (scheduler, sink, _) = scheduler_with(vec![soon.clone()], 0);

        scheduler.arm(&soon);
        assert!(scheduler.cancel("meeting1"));
        assert!(!scheduler.cancel("meeting1"));
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_rearm_replaces_the_timer() {
        let soon = record(
            "meeting1",
            Utc::now() + ChronoDuration::milliseconds(150),
            vec![100],
        );
        let (scheduler, sink, _) = scheduler_with(vec![soon.clone()], 0);

        scheduler.arm(&soon);
        scheduler.arm(&soon);
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(sink.sent().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_instant_fire_unregisters_itself() {
        let (scheduler, sink, registry) = scheduler_with(vec![], 0);

        // Fire instant close enough that delivery can overlap the
        // bookkeeping in arm() itself.
        let soon = record(
            "meeting1",
            Utc::now() + ChronoDuration::milliseconds(10),
            vec![100],
        );
        registry.restore(vec![soon.clone()]);
        scheduler.arm(&soon);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(sink.sent().len(), 1);
        assert_eq!(scheduler.pending(), 0);
        assert!(!scheduler.cancel("meeting1"));
    }

    #[tokio::test]
    async fn test_rearm_after_fire_keeps_the_new_timer() {
        let soon = record(
            "meeting1",
            Utc::now() + ChronoDuration::milliseconds(50),
            vec![100],
        );
        let (scheduler, sink, _) = scheduler_with(vec![soon.clone()], 0);

        scheduler.arm(&soon);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(sink.sent().len(), 1);

        let later = record(
            "meeting1",
            Utc::now() + ChronoDuration::minutes(5),
            vec![100],
        );
        scheduler.arm(&later);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.cancel("meeting1"));
    }

    #[tokio::test]
    async fn test_shutdown_aborts_everything() {
        let a = record("meeting1", Utc::now() + ChronoDuration::minutes(5), vec![100]);
        let b = record("meeting2", Utc::now() + ChronoDuration::minutes(5), vec![200]);
        let (scheduler, sink, _) = scheduler_with(vec![a.clone(), b.clone()], 0);

        scheduler.arm(&a);
        scheduler.arm(&b);
        assert_eq!(scheduler.pending(), 2);

        scheduler.shutdown();
        assert_eq!(scheduler.pending(), 0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sink.sent().is_empty());
    }
}
