//! Per-command handler implementations
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: Add UtilityHandler (help, cancel)
//! - 1.1.0: Add ListHandler
//! - 1.0.0: Initial creation with StartHandler and ScheduleHandler

pub mod list;
pub mod schedule;
pub mod start;
pub mod utility;

use std::sync::Arc;

use super::handler::ChatCommandHandler;

/// Every built-in handler, ready to hand to a `CommandRegistry`.
pub fn create_all_handlers() -> Vec<Arc<dyn ChatCommandHandler>> {
    vec![
        Arc::new(start::StartHandler),
        Arc::new(schedule::ScheduleHandler),
        Arc::new(list::ListHandler),
        Arc::new(utility::UtilityHandler),
    ]
}
