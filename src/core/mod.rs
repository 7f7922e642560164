//! # Core Module
//!
//! Core configuration, outbound text shaping, and shared message builders
//! for the meeting bot.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add messages module with meeting summary and reminder builders
//! - 1.1.0: Add response module with chat message chunking utilities
//! - 1.0.0: Initial creation with the config module

pub mod config;
pub mod messages;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use response::{chunk_for_message, chunk_text, truncate_for_message, MESSAGE_LIMIT};
