//! /schedule handler
//!
//! Handles: schedule (opens the scheduling dialog)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::ChatCommandHandler;
use crate::core::messages::PROMPT_DATE;
use crate::features::calendar_grid::{month_grid, MonthRef};
use crate::transport::{Keyboard, TextMessage};

/// Handler for /schedule
pub struct ScheduleHandler;

#[async_trait]
impl ChatCommandHandler for ScheduleHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["schedule"]
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        msg: &TextMessage,
        _name: &str,
        _args: &str,
    ) -> Result<()> {
        // Restarting mid-dialog just starts over; any draft is discarded.
        ctx.sessions.with_user(msg.user_id, |session| session.begin());

        let month = MonthRef::current();
        let keyboard = Keyboard::from_grid(month_grid(month));
        ctx.sink
            .send_with_keyboard(msg.chat_id, PROMPT_DATE, &keyboard)
            .await?;
        info!(
            "📅 scheduling dialog started for user {} on {}",
            msg.user_id,
            month.label(),
        );
        Ok(())
    }
}
