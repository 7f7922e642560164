//! /list handler
//!
//! Handles: list (the user's scheduled meetings)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::ChatCommandHandler;
use crate::core::messages::NO_MEETINGS;
use crate::transport::{send_chunked, Action, Button, Keyboard, TextMessage};

/// Handler for /list
pub struct ListHandler;

#[async_trait]
impl ChatCommandHandler for ListHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["list"]
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        msg: &TextMessage,
        _name: &str,
        _args: &str,
    ) -> Result<()> {
        let meetings = ctx.meetings.list_for_user(msg.user_id);
        if meetings.is_empty() {
            ctx.sink.send(msg.chat_id, NO_MEETINGS).await?;
            return Ok(());
        }

        info!(
            "📋 listing {} meeting(s) for user {}",
            meetings.len(),
            msg.user_id,
        );
        // One card per meeting, like the card sent when it was created.
        for record in meetings {
            let keyboard = Keyboard::default().row(vec![Button::callback(
                "Add to Calendar",
                Action::AddToCalendar {
                    meeting_id: record.id.clone(),
                },
            )]);
            send_chunked(
                ctx.sink.as_ref(),
                msg.chat_id,
                &record.calendar_text(ctx.reminder_lead_minutes),
                Some(&keyboard),
            )
            .await?;
        }
        Ok(())
    }
}
