//! # Features Module
//!
//! All scheduling feature modules.
//!
//! - **Since**: 0.1.0

pub mod calendar_grid;
pub mod calendar_sync;
pub mod invites;
pub mod meetings;
pub mod reminders;
pub mod sessions;

pub use calendar_grid::{month_grid, time_grid, Cell, MonthRef};
pub use calendar_sync::{CalendarSync, HttpCalendarSync};
pub use invites::{InviteIssuer, RedeemOutcome};
pub use meetings::{JoinResult, MeetingRecord, MeetingRegistry, NewMeeting};
pub use reminders::ReminderScheduler;
pub use sessions::{DialogStep, SessionReply, SessionStore};
