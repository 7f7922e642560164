//! Shared context for command and selection handlers
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: Optional external calendar sync
//! - 1.1.0: Event store and reminder scheduler
//! - 1.0.0: Initial implementation with core shared state

use std::sync::Arc;

use crate::features::calendar_sync::CalendarSync;
use crate::features::invites::InviteIssuer;
use crate::features::meetings::MeetingRegistry;
use crate::features::reminders::ReminderScheduler;
use crate::features::sessions::SessionStore;
use crate::storage::EventStore;
use crate::transport::ChatSink;

/// Shared context for all handlers
///
/// Contains the services handlers need:
/// - ChatSink for outbound messages
/// - MeetingRegistry for meetings
/// - SessionStore for scheduling dialogs
/// - InviteIssuer for share links
/// - ReminderScheduler for pre-meeting reminders
/// - EventStore for saved calendar entries
/// - Optional CalendarSync for mirroring into an external calendar
#[derive(Clone)]
pub struct BotContext {
    pub sink: Arc<dyn ChatSink>,
    pub meetings: Arc<MeetingRegistry>,
    pub sessions: SessionStore,
    pub invites: InviteIssuer,
    pub reminders: ReminderScheduler,
    pub events: Arc<dyn EventStore>,
    pub calendar: Option<Arc<dyn CalendarSync>>,
    /// The bot's username, needed to spot commands addressed to other bots.
    pub bot_name: String,
    /// Lead echoed in event cards; the scheduler holds its own copy.
    pub reminder_lead_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_context_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<BotContext>();
    }
}
