//! # Reminders Feature
//!
//! Scheduled pre-meeting reminders with participant fan-out.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//! - **Toggleable**: true

pub mod scheduler;

pub use scheduler::ReminderScheduler;
