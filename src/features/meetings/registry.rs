//! # Meeting Registry
//!
//! The single place meetings are created and joined.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Snapshot publishing, boot-time restore
//! - 1.1.0: Collision-checked id generation
//! - 1.0.0: Initial creation
//!
//! All mutation happens under one lock, so join-versus-join races collapse
//! into a definite order and ids are unique by construction. Reads hand out
//! clones; nothing outside this module ever holds a reference into the map.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use log::debug;
use rand::Rng;

use crate::features::meetings::{JoinResult, MeetingRecord, NewMeeting};
use crate::storage::snapshot::SnapshotWriter;
use crate::transport::UserId;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 8;

#[derive(Default)]
struct RegistryInner {
    meetings: HashMap<String, MeetingRecord>,
    /// Ids in creation order, for stable listings and snapshots.
    order: Vec<String>,
}

/// Shared registry of all known meetings.
#[derive(Default)]
pub struct MeetingRegistry {
    inner: Mutex<RegistryInner>,
    snapshots: Option<SnapshotWriter>,
}

impl MeetingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that publishes its full contents to `writer` after every
    /// mutation.
    pub fn with_snapshots(writer: SnapshotWriter) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            snapshots: Some(writer),
        }
    }

    /// Seed the registry from a persisted snapshot. Existing entries with the
    /// same id are replaced; no snapshot is published for the seeding itself.
    pub fn restore(&self, records: Vec<MeetingRecord>) {
        let mut inner = self.locked();
        for record in records {
            if !inner.meetings.contains_key(&record.id) {
                inner.order.push(record.id.clone());
            }
            inner.meetings.insert(record.id.clone(), record);
        }
    }

    /// Create a meeting with a fresh id. The organizer becomes the first
    /// participant.
    pub fn create(&self, new: NewMeeting) -> MeetingRecord {
        let mut inner = self.locked();
        let mut id = generate_meeting_id();
        while inner.meetings.contains_key(&id) {
            debug!("🎲 meeting id collision on {id}, drawing again");
            id = generate_meeting_id();
        }
        let record = MeetingRecord {
            id: id.clone(),
            title: new.title,
            start: new.start,
            organizer: new.organizer,
            participants: vec![new.organizer],
            description: format!("Meeting organized by {}", new.organizer_name),
            created_at: Utc::now(),
        };
        inner.meetings.insert(id.clone(), record.clone());
        inner.order.push(id);
        self.publish(&inner);
        record
    }

    /// Add `user` to the meeting's participants.
    pub fn join(&self, meeting_id: &str, user: UserId) -> JoinResult {
        let mut inner = self.locked();
        let result = match inner.meetings.get_mut(meeting_id) {
            None => return JoinResult::NotFound,
            Some(record) if record.is_participant(user) => {
                return JoinResult::AlreadyMember(record.clone())
            }
            Some(record) => {
                record.participants.push(user);
                JoinResult::Added(record.clone())
            }
        };
        self.publish(&inner);
        result
    }

    pub fn get(&self, meeting_id: &str) -> Option<MeetingRecord> {
        self.locked().meetings.get(meeting_id).cloned()
    }

    /// Meetings the user participates in, oldest first.
    pub fn list_for_user(&self, user: UserId) -> Vec<MeetingRecord> {
        let inner = self.locked();
        inner
            .order
            .iter()
            .filter_map(|id| inner.meetings.get(id))
            .filter(|record| record.is_participant(user))
            .cloned()
            .collect()
    }

    /// Every meeting, oldest first.
    pub fn all(&self) -> Vec<MeetingRecord> {
        let inner = self.locked();
        inner
            .order
            .iter()
            .filter_map(|id| inner.meetings.get(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.locked().meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().meetings.is_empty()
    }

    fn locked(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &RegistryInner) {
        if let Some(writer) = &self.snapshots {
            let records = inner
                .order
                .iter()
                .filter_map(|id| inner.meetings.get(id))
                .cloned()
                .collect();
            writer.publish(records);
        }
    }
}

fn generate_meeting_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::snapshot;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn new_meeting(title: &str, organizer: UserId) -> NewMeeting {
        NewMeeting {
            title: title.to_string(),
            start: Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap(),
            organizer,
            organizer_name: "Alice".to_string(),
        }
    }

    #[test]
    fn test_generated_ids_stick_to_the_alphabet() {
        for _ in 0..50 {
            let id = generate_meeting_id();
            assert_eq!(id.len(), ID_LENGTH);
            assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_sequential_creates_get_distinct_ids() {
        let registry = MeetingRegistry::new();
        let ids: HashSet<String> = (0..50)
            .map(|i| registry.create(new_meeting(&format!("Meeting {i}"), 100)).id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_create_registers_the_organizer() {
        let registry = MeetingRegistry::new();
        let record = registry.create(new_meeting("Standup", 100));
        assert_eq!(record.participants, vec![100]);
        assert_eq!(record.description, "Meeting organized by Alice");
        assert_eq!(registry.get(&record.id).map(|r| r.title), Some("Standup".to_string()));
    }

    #[test]
    fn test_join_semantics() {
        let registry = MeetingRegistry::new();
        let record = registry.create(new_meeting("Standup", 100));

        assert!(matches!(registry.join("missing1", 200), JoinResult::NotFound));

        match registry.join(&record.id, 200) {
            JoinResult::Added(updated) => assert_eq!(updated.participants, vec![100, 200]),
            other => panic!("expected Added, got {other:?}"),
        }
        match registry.join(&record.id, 200) {
            JoinResult::AlreadyMember(updated) => {
                assert_eq!(updated.participants, vec![100, 200]);
            }
            other => panic!("expected AlreadyMember, got {other:?}"),
        }
        // Organizer re-joining is a no-op too.
        assert!(matches!(
            registry.join(&record.id, 100),
            JoinResult::AlreadyMember(_)
        ));
    }

    #[test]
    fn test_list_for_user_is_insertion_ordered() {
        let registry = MeetingRegistry::new();
        registry.create(new_meeting("First", 100));
        let second = registry.create(new_meeting("Second", 200));
        registry.create(new_meeting("Third", 100));
        registry.join(&second.id, 100);

        let titles: Vec<String> = registry
            .list_for_user(100)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(registry.list_for_user(300).len(), 0);
    }

    #[test]
    fn test_restore_round_trip() {
        let registry = MeetingRegistry::new();
        let record = registry.create(new_meeting("Standup", 100));

        let other = MeetingRegistry::new();
        other.restore(registry.all());
        assert_eq!(other.len(), 1);
        assert!(other.get(&record.id).is_some());
        assert!(matches!(
            other.join(&record.id, 200),
            JoinResult::Added(_)
        ));
    }

    #[test]
    fn test_mutations_publish_snapshots() {
        let (writer, mut rx) = snapshot::channel();
        let registry = MeetingRegistry::with_snapshots(writer);

        let record = registry.create(new_meeting("Standup", 100));
        let after_create = rx.try_recv().expect("create publishes");
        assert_eq!(after_create.len(), 1);

        registry.join(&record.id, 200);
        let after_join = rx.try_recv().expect("join publishes");
        assert_eq!(after_join[0].participants, vec![100, 200]);

        // A no-op join publishes nothing.
        registry.join(&record.id, 200);
        assert!(rx.try_recv().is_err());
    }
}
