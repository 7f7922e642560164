//! # Command Handler Trait
//!
//! The seam between command dispatch and command behavior.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::context::BotContext;
use crate::transport::TextMessage;

/// One slash command (or a family of related ones), as a trait object.
///
/// Implementations declare the names they answer to and get called with the
/// shared bot context plus the message that carried the command. `name` tells
/// a multi-name handler which of its commands was actually typed, and `args`
/// is whatever followed it, already trimmed.
///
/// ```ignore
/// struct EchoHandler;
///
/// #[async_trait]
/// impl ChatCommandHandler for EchoHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["echo"]
///     }
///
///     async fn handle(
///         &self,
///         ctx: Arc<BotContext>,
///         msg: &TextMessage,
///         _name: &str,
///         args: &str,
///     ) -> Result<()> {
///         ctx.sink.send(msg.chat_id, args).await
///     }
/// }
/// ```
#[async_trait]
pub trait ChatCommandHandler: Send + Sync {
    /// Names this handler answers to, without the leading slash.
    fn command_names(&self) -> &'static [&'static str];

    /// Run the command.
    async fn handle(
        &self,
        ctx: Arc<BotContext>,
        msg: &TextMessage,
        name: &str,
        args: &str,
    ) -> Result<()>;
}
