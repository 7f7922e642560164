//! # Meetings Feature
//!
//! Meeting records and the in-memory registry of record.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Snapshot publishing after every mutation
//! - 1.2.0: Insertion-order listing
//! - 1.0.0: Initial creation

pub mod registry;

pub use registry::MeetingRegistry;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::messages::html_escape;
use crate::transport::UserId;

/// Meetings have no configurable length; the calendar entry always spans
/// one hour.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// One scheduled meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    /// Short shareable id, also used as the invite token.
    pub id: String,
    pub title: String,
    /// Start instant, UTC.
    pub start: DateTime<Utc>,
    pub organizer: UserId,
    /// Everyone who scheduled or joined, organizer first.
    pub participants: Vec<UserId>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl MeetingRecord {
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(DEFAULT_DURATION_MINUTES)
    }

    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }

    /// The HTML event card sent wherever this meeting is shown: a
    /// `tg://event` link plus description, time range, and reminder note.
    pub fn calendar_text(&self, lead_minutes: i64) -> String {
        let end = self.end();
        let reminder_at = self.start - Duration::minutes(lead_minutes);
        let title = html_escape(&self.title);
        let description = html_escape(&self.description);
        format!(
            "{title}\n\
             📅 <a href='tg://event?startTime={start_ts}&endTime={end_ts}&title={title}&reminderTime={reminder_ts}'>{title}</a>\n\
             \n\
             📝 {description}\n\
             ⏰ {start} - {end_hm}\n\
             🔔 Reminder set for {lead_minutes} minutes before",
            start_ts = self.start.timestamp(),
            end_ts = end.timestamp(),
            reminder_ts = reminder_at.timestamp(),
            start = self.start.format("%Y-%m-%d %H:%M"),
            end_hm = end.format("%H:%M"),
        )
    }

    /// The message participants receive when the reminder fires.
    pub fn reminder_text(&self, lead_minutes: i64) -> String {
        format!(
            "🔔 Reminder: \"{title}\" starts in {lead_minutes} minutes ({start} UTC).",
            title = html_escape(&self.title),
            start = self.start.format("%Y-%m-%d %H:%M"),
        )
    }
}

/// Input for [`MeetingRegistry::create`].
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub start: DateTime<Utc>,
    pub organizer: UserId,
    /// Used for the default description.
    pub organizer_name: String,
}

/// Outcome of adding a user to a meeting.
#[derive(Debug, Clone)]
pub enum JoinResult {
    /// The user is now a participant.
    Added(MeetingRecord),
    /// The user already was a participant; nothing changed.
    AlreadyMember(MeetingRecord),
    /// No meeting has that id.
    NotFound,
}
