//! /help and /cancel handlers
//!
//! Handles: help (welcome text), cancel (dialog abort)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::BotContext;
use crate::commands::handler::ChatCommandHandler;
use crate::core::messages::WELCOME_TEXT;
use crate::transport::TextMessage;

/// Small commands that need no dialog of their own.
pub struct UtilityHandler;

#[async_trait]
impl ChatCommandHandler for UtilityHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help", "cancel"]
    }

    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        msg: &TextMessage,
        name: &str,
        _args: &str,
    ) -> Result<()> {
        match name {
            "help" => self.handle_help(&ctx, msg).await,
            "cancel" => self.handle_cancel(&ctx, msg).await,
            _ => Ok(()),
        }
    }
}

impl UtilityHandler {
    /// Handle /help command
    async fn handle_help(&self, ctx: &BotContext, msg: &TextMessage) -> Result<()> {
        ctx.sink.send(msg.chat_id, WELCOME_TEXT).await?;
        Ok(())
    }

    /// Handle /cancel command
    async fn handle_cancel(&self, ctx: &BotContext, msg: &TextMessage) -> Result<()> {
        let was_active = ctx
            .sessions
            .with_user(msg.user_id, |session| session.cancel());
        let reply = if was_active {
            info!("🤨 user {} cancelled their scheduling dialog", msg.user_id);
            "Scheduling cancelled."
        } else {
            "No scheduling dialog to cancel."
        };
        ctx.sink.send(msg.chat_id, reply).await?;
        Ok(())
    }
}
