//! # Sessions Feature
//!
//! Per-user scheduling dialog state.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Idle-session sweeping
//! - 1.1.0: Stale selection detection
//! - 1.0.0: Initial creation

pub mod machine;
pub mod store;

pub use machine::{parse_time, CompletedDraft, DialogSession, DialogStep, SessionReply};
pub use store::SessionStore;
