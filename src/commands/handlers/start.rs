//! /start handler
//!
//! Handles: start (welcome and invite deep links)
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Invite token redemption
//! - 1.0.0: Initial creation

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::ChatCommandHandler;
use crate::core::messages::{ADDED_TO_MEETING, ALREADY_REGISTERED, INVITE_INVALID, WELCOME_TEXT};
use crate::features::invites::RedeemOutcome;
use crate::transport::{send_chunked, Action, Button, Keyboard, TextMessage};

/// Handler for /start, with or without an invite token payload
pub struct StartHandler;

#[async_trait]
impl ChatCommandHandler for StartHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["start"]
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        msg: &TextMessage,
        _name: &str,
        args: &str,
    ) -> Result<()> {
        let token = args.trim();
        if token.is_empty() {
            ctx.sink.send(msg.chat_id, WELCOME_TEXT).await?;
            info!("👋 sent welcome to user {}", msg.user_id);
            return Ok(());
        }
        self.redeem_invite(&ctx, msg, token).await
    }
}

impl StartHandler {
    /// A deep link landed: `/start <token>` joins the user to the meeting
    /// the token names.
    async fn redeem_invite(&self, ctx: &BotContext, msg: &TextMessage, token: &str) -> Result<()> {
        match ctx.invites.redeem(token, msg.user_id, &ctx.meetings) {
            RedeemOutcome::Joined(record) => {
                info!(
                    "🎟️ user {} joined meeting {} via invite",
                    msg.user_id, record.id,
                );
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
                ctx.sink.send(msg.chat_id, ADDED_TO_MEETING).await?;
            }
            RedeemOutcome::AlreadyJoined(_) => {
                ctx.sink.send(msg.chat_id, ALREADY_REGISTERED).await?;
            }
            RedeemOutcome::Invalid => {
                info!("🎟️ user {} presented a dead invite token", msg.user_id);
                ctx.sink.send(msg.chat_id, INVITE_INVALID).await?;
            }
        }
        Ok(())
    }
}
