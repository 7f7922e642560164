// Core layer - shared types and configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// Transport layer - chat platform boundary
pub mod transport;

// Storage layer - saved events and registry snapshots
pub mod storage;

// Application layer
pub mod commands;
pub mod update_handler;

// Re-export core config
pub use core::Config;

// Re-export feature items
pub use features::{
    // Calendar grid
    month_grid, time_grid, MonthRef,
    // Calendar sync
    CalendarSync, HttpCalendarSync,
    // Invites
    InviteIssuer, RedeemOutcome,
    // Meetings
    JoinResult, MeetingRecord, MeetingRegistry, NewMeeting,
    // Reminders
    ReminderScheduler,
    // Sessions
    DialogStep, SessionStore,
};

// Re-export transport items
pub use transport::{ChatDispatcher, ChatSink, Inbound, InboundSink, TelegramApi};

pub use update_handler::UpdateHandler;
