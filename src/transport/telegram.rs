//! # Telegram Transport
//!
//! Minimal Telegram Bot API client: long polling in, messages and inline
//! keyboards out.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Callback acknowledgement and message editing
//! - 1.0.0: Initial creation
//!
//! Only the five methods this bot needs are wrapped. All outbound text is
//! sent in HTML parse mode, which is why user input is escaped before it
//! reaches this layer. The bot token lives inside the request URL and is
//! never logged.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::transport::{
    Action, Button, ChatId, ChatSink, Inbound, Keyboard, MessageRef, SelectionEvent, TextMessage,
};

const API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct TelegramApi {
    client: reqwest::Client,
    base: String,
}

// ==================== Wire types ====================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Serialize)]
struct GetUpdatesPayload {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 2],
}

#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: ChatId,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup>,
}

#[derive(Serialize)]
struct EditMessagePayload<'a> {
    chat_id: ChatId,
    message_id: MessageRef,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup>,
}

#[derive(Serialize)]
struct AnswerCallbackPayload<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ReplyMarkup {
    inline_keyboard: Vec<Vec<InlineButton>>,
}

#[derive(Debug, Serialize)]
struct InlineButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

fn reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    let inline_keyboard = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| match button {
                    Button::Callback { label, action } => InlineButton {
                        text: label.clone(),
                        callback_data: Some(action.encode()),
                        url: None,
                    },
                    Button::Url { label, url } => InlineButton {
                        text: label.clone(),
                        callback_data: None,
                        url: Some(url.clone()),
                    },
                })
                .collect()
        })
        .collect();
    ReplyMarkup { inline_keyboard }
}

// ==================== API client ====================

impl TelegramApi {
    pub fn new(token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: format!("{API_BASE}/bot{token}"),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}/{method}", self.base);
        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("couldn't reach Telegram for {method}"))?;

        let api: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("unexpected {method} response body"))?;

        if !api.ok {
            let description = api
                .description
                .unwrap_or_else(|| "no description".to_string());
            return Err(anyhow!("{method} rejected: {description}"));
        }
        api.result
            .ok_or_else(|| anyhow!("{method} succeeded without a result"))
    }

    /// Validate the token and learn the bot's own identity.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({}), REQUEST_TIMEOUT)
            .await
    }

    /// Long-poll for updates past `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let payload = GetUpdatesPayload {
            offset,
            timeout: timeout_secs,
            allowed_updates: ["message", "callback_query"],
        };
        // The server holds the request open for up to timeout_secs.
        let timeout = Duration::from_secs(timeout_secs) + REQUEST_TIMEOUT;
        self.call("getUpdates", &payload, timeout).await
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<Message> {
        let payload = SendMessagePayload {
            chat_id,
            text,
            parse_mode: "HTML",
            reply_markup: keyboard.map(reply_markup),
        };
        self.call("sendMessage", &payload, REQUEST_TIMEOUT).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let payload = EditMessagePayload {
            chat_id,
            message_id,
            text,
            parse_mode: "HTML",
            reply_markup: keyboard.map(reply_markup),
        };
        // The result is the edited message; nothing here needs it.
        let _: serde_json::Value = self.call("editMessageText", &payload, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    pub async fn answer_callback_query(&self, id: &str, text: Option<&str>) -> Result<()> {
        let payload = AnswerCallbackPayload {
            callback_query_id: id,
            text,
        };
        let _: bool = self
            .call("answerCallbackQuery", &payload, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChatSink for TelegramApi {
    async fn send(&self, chat: ChatId, text: &str) -> Result<MessageRef> {
        Ok(self.send_message(chat, text, None).await?.message_id)
    }

    async fn send_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<MessageRef> {
        Ok(self
            .send_message(chat, text, Some(keyboard))
            .await?
            .message_id)
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        self.edit_message_text(chat, message, text, keyboard).await
    }

    async fn ack_selection(&self, selection_id: &str, toast: Option<&str>) -> Result<()> {
        self.answer_callback_query(selection_id, toast).await
    }
}

// ==================== Update normalization ====================

/// Turn a raw update into a normalized inbound event.
///
/// Returns `None` for updates this bot has no use for: messages from other
/// bots, non-text messages, and callback queries without payloads. Garbled
/// callback payloads become [`Action::Noop`] so the tap still gets its
/// acknowledgement instead of a spinner.
pub fn inbound_from_update(update: Update) -> Option<Inbound> {
    if let Some(message) = update.message {
        let from = message.from?;
        if from.is_bot {
            return None;
        }
        let text = message.text?;
        return Some(Inbound::Text(TextMessage {
            user_id: from.id,
            chat_id: message.chat.id,
            sender_name: from.first_name,
            text,
        }));
    }

    if let Some(query) = update.callback_query {
        let data = query.data?;
        let action = match Action::decode(&data) {
            Some(action) => action,
            None => {
                warn!(
                    "🤨 undecodable callback payload '{data}' from user {}, dropping",
                    query.from.id,
                );
                Action::Noop
            }
        };
        // Very old callbacks can outlive their message; fall back to the
        // user's private chat.
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(query.from.id);
        return Some(Inbound::Selection(SelectionEvent {
            id: query.id,
            user_id: query.from.id,
            chat_id,
            message: query.message.map(|m| m.message_id),
            action,
        }));
    }

    None
}
