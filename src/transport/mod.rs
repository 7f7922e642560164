//! # Transport Module
//!
//! The chat-platform boundary: inbound update normalization, the outbound
//! [`ChatSink`] contract, callback action decoding, and per-chat dispatch.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Per-chat dispatch lanes with idle retirement
//! - 1.1.0: Telegram Bot API client
//! - 1.0.0: Initial creation with inbound events and the sink trait
//!
//! Everything above this module is platform-agnostic. Handlers see
//! [`Inbound`] values and reply through a [`ChatSink`], so tests drive the
//! whole bot with an in-memory sink and no network.

pub mod action;
pub mod dispatch;
pub mod telegram;

pub use action::Action;
pub use dispatch::ChatDispatcher;
pub use telegram::TelegramApi;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::response::chunk_for_message;
use crate::features::calendar_grid::Cell;

/// Telegram user id. Doubles as the chat id of that user's private chat.
pub type UserId = i64;
/// Chat the bot is talking in.
pub type ChatId = i64;
/// Identifies a previously sent message for edits.
pub type MessageRef = i64;

/// A free-text message from a user.
#[derive(Debug, Clone)]
pub struct TextMessage {
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// First name, used when composing meeting descriptions.
    pub sender_name: String,
    pub text: String,
}

/// An inline-button tap, with its payload already decoded.
#[derive(Debug, Clone)]
pub struct SelectionEvent {
    /// Platform acknowledgement handle for this tap.
    pub id: String,
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// The message carrying the tapped keyboard, when still available.
    pub message: Option<MessageRef>,
    pub action: Action,
}

/// A normalized inbound update.
#[derive(Debug, Clone)]
pub enum Inbound {
    Text(TextMessage),
    Selection(SelectionEvent),
}

impl Inbound {
    pub fn chat_id(&self) -> ChatId {
        match self {
            Inbound::Text(msg) => msg.chat_id,
            Inbound::Selection(ev) => ev.chat_id,
        }
    }
}

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq)]
pub enum Button {
    Callback { label: String, action: Action },
    Url { label: String, url: String },
}

impl Button {
    pub fn callback(label: impl Into<String>, action: Action) -> Self {
        Button::Callback {
            label: label.into(),
            action,
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Button::Url {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// An inline keyboard, row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Turn a rendered grid into a keyboard of callback buttons.
    pub fn from_grid(grid: Vec<Vec<Cell>>) -> Self {
        let rows = grid
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| Button::Callback {
                        label: cell.label,
                        action: cell.action,
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Append a row of buttons.
    pub fn row(mut self, row: Vec<Button>) -> Self {
        self.rows.push(row);
        self
    }
}

/// Outbound side of the chat platform.
///
/// The production implementation is [`TelegramApi`]; tests substitute a
/// recording sink.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Send a plain text message. Returns a handle usable with [`edit`].
    ///
    /// [`edit`]: ChatSink::edit
    async fn send(&self, chat: ChatId, text: &str) -> Result<MessageRef>;

    /// Send a text message with an inline keyboard attached.
    async fn send_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<MessageRef>;

    /// Replace the text (and optionally the keyboard) of a sent message.
    async fn edit(
        &self,
        chat: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()>;

    /// Acknowledge a button tap, optionally with a short toast.
    async fn ack_selection(&self, selection_id: &str, toast: Option<&str>) -> Result<()>;
}

/// Consumer side of the dispatcher. Implemented by the update handler.
#[async_trait]
pub trait InboundSink: Send + Sync {
    async fn handle(&self, event: Inbound) -> Result<()>;
}

/// Send text of any length, splitting it across messages when it exceeds the
/// platform limit. The keyboard rides on the final chunk.
pub async fn send_chunked(
    sink: &dyn ChatSink,
    chat: ChatId,
    text: &str,
    keyboard: Option<&Keyboard>,
) -> Result<MessageRef> {
    let chunks = chunk_for_message(text);
    let last = chunks.len() - 1;
    let mut message_ref = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        message_ref = match keyboard {
            Some(kb) if i == last => sink.send_with_keyboard(chat, chunk, kb).await?,
            _ => sink.send(chat, chunk).await?,
        };
    }
    Ok(message_ref)
}
