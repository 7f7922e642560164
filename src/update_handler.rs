//! # Update Handler
//!
//! Routes every normalized inbound update: slash commands to their handlers,
//! free text into the scheduling dialog, and button taps to grid navigation,
//! slot selection, and calendar saving.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.3.0: Add-to-calendar taps save through the event store
//! - 1.2.0: Month navigation edits the grid in place
//! - 1.1.0: Command dispatch through the registry
//! - 1.0.0: Initial creation
//!
//! Every update gets a request id carried through the logs, so one user's
//! dialog can be followed across interleaved traffic.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::commands::{parse_command, BotContext, CommandRegistry};
use crate::core::messages::{
    CALENDAR_SAVE_FAILED, EMPTY_TITLE, INVALID_TIME, INVITE_INVALID, PROMPT_DATE, PROMPT_TIME,
    PROMPT_TITLE, STALE_DIALOG, UNKNOWN_COMMAND,
};
use crate::features::calendar_grid::{month_grid, time_grid, MonthRef};
use crate::features::meetings::NewMeeting;
use crate::features::sessions::{CompletedDraft, DialogStep, SessionReply};
use crate::storage::StoredEvent;
use crate::transport::{
    send_chunked, Action, Button, Inbound, InboundSink, Keyboard, SelectionEvent, TextMessage,
};

pub struct UpdateHandler {
    ctx: Arc<BotContext>,
    commands: CommandRegistry,
}

impl UpdateHandler {
    pub fn new(ctx: Arc<BotContext>, commands: CommandRegistry) -> Self {
        Self { ctx, commands }
    }

    async fn handle_text(&self, msg: TextMessage, request_id: Uuid) -> Result<()> {
        if let Some((name, args)) = parse_command(&msg.text, &self.ctx.bot_name) {
            match self.commands.get(name) {
                Some(handler) => {
                    info!(
                        "[{request_id}] 🎯 dispatching /{name} for user {}",
                        msg.user_id,
                    );
                    handler.handle(Arc::clone(&self.ctx), &msg, name, args).await?;
                }
                None => {
                    debug!(
                        "[{request_id}] 🤨 unknown command /{name} from user {}",
                        msg.user_id,
                    );
                    self.ctx.sink.send(msg.chat_id, UNKNOWN_COMMAND).await?;
                }
            }
            return Ok(());
        }

        let reply = self
            .ctx
            .sessions
            .with_user(msg.user_id, |session| session.on_text(&msg.text));
        match reply {
            SessionReply::NotExpectingText => {
                debug!(
                    "[{request_id}] ℹ️ ignoring free text from user {} (no dialog wants it)",
                    msg.user_id,
                );
            }
            SessionReply::InvalidTime => {
                self.ctx.sink.send(msg.chat_id, INVALID_TIME).await?;
            }
            SessionReply::TimeStored { .. } => {
                self.ctx.sink.send(msg.chat_id, PROMPT_TITLE).await?;
            }
            SessionReply::EmptyTitle => {
                self.ctx.sink.send(msg.chat_id, EMPTY_TITLE).await?;
            }
            SessionReply::Completed(draft) => {
                self.finalize_meeting(&msg, draft, request_id).await?;
            }
            other => {
                debug!("[{request_id}] 🤨 dialog replied {other:?} to free text, dropping");
            }
        }
        Ok(())
    }

    async fn handle_selection(&self, ev: SelectionEvent, request_id: Uuid) -> Result<()> {
        match ev.action.clone() {
            Action::Noop => self.ctx.sink.ack_selection(&ev.id, None).await,
            Action::PrevMonth { year, month } => {
                let target = MonthRef { year, month }.prev();
                self.show_month(&ev, target, request_id).await
            }
            Action::NextMonth { year, month } => {
                let target = MonthRef { year, month }.next();
                self.show_month(&ev, target, request_id).await
            }
            Action::SelectDate { year, month, day } => {
                self.select_date(&ev, year, month, day, request_id).await
            }
            Action::SelectSlot { date, hour, minute } => {
                self.select_slot(&ev, date, hour, minute, request_id).await
            }
            Action::AddToCalendar { meeting_id } => {
                self.add_to_calendar(&ev, &meeting_id, request_id).await
            }
        }
    }

    /// Redraw the month grid at `target`, editing the tapped message in
    /// place when it is still addressable.
    async fn show_month(
        &self,
        ev: &SelectionEvent,
        target: MonthRef,
        request_id: Uuid,
    ) -> Result<()> {
        if self.ctx.sessions.step(ev.user_id) != DialogStep::AwaitingDate {
            debug!(
                "[{request_id}] 🤨 month navigation from user {} outside a date prompt",
                ev.user_id,
            );
            self.ctx.sink.ack_selection(&ev.id, Some(STALE_DIALOG)).await?;
            return Ok(());
        }

        debug!(
            "[{request_id}] 📅 user {} paging the calendar to {}",
            ev.user_id,
            target.label(),
        );
        let keyboard = Keyboard::from_grid(month_grid(target));
        match ev.message {
            Some(message) => {
                self.ctx
                    .sink
                    .edit(ev.chat_id, message, PROMPT_DATE, Some(&keyboard))
                    .await?;
            }
            None => {
                self.ctx
                    .sink
                    .send_with_keyboard(ev.chat_id, PROMPT_DATE, &keyboard)
                    .await?;
            }
        }
        self.ctx.sink.ack_selection(&ev.id, None).await?;
        Ok(())
    }

    async fn select_date(
        &self,
        ev: &SelectionEvent,
        year: i32,
        month: u32,
        day: u32,
        request_id: Uuid,
    ) -> Result<()> {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            warn!("[{request_id}] 🤨 day tap with impossible date {year}-{month}-{day}");
            self.ctx.sink.ack_selection(&ev.id, None).await?;
            return Ok(());
        };

        let reply = self
            .ctx
            .sessions
            .with_user(ev.user_id, |session| session.choose_date(date));
        match reply {
            SessionReply::DateStored(date) => {
                info!("[{request_id}] 📅 user {} picked {date}", ev.user_id);
                self.ctx.sink.ack_selection(&ev.id, None).await?;
                let keyboard = Keyboard::from_grid(time_grid(date));
                self.ctx
                    .sink
                    .send_with_keyboard(ev.chat_id, PROMPT_TIME, &keyboard)
                    .await?;
            }
            _ => {
                debug!("[{request_id}] 🤨 stale day tap from user {}", ev.user_id);
                self.ctx.sink.ack_selection(&ev.id, Some(STALE_DIALOG)).await?;
            }
        }
        Ok(())
    }

    async fn select_slot(
        &self,
        ev: &SelectionEvent,
        date: NaiveDate,
        hour: u32,
        minute: u32,
        request_id: Uuid,
    ) -> Result<()> {
        let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
            warn!("[{request_id}] 🤨 slot tap with impossible time {hour}:{minute}");
            self.ctx.sink.ack_selection(&ev.id, None).await?;
            return Ok(());
        };

        let reply = self
            .ctx
            .sessions
            .with_user(ev.user_id, |session| session.choose_slot(date, time));
        match reply {
            SessionReply::TimeStored { time, .. } => {
                info!(
                    "[{request_id}] ⏰ user {} picked the {} slot",
                    ev.user_id,
                    time.format("%H:%M"),
                );
                self.ctx.sink.ack_selection(&ev.id, None).await?;
                self.ctx.sink.send(ev.chat_id, PROMPT_TITLE).await?;
            }
            _ => {
                debug!("[{request_id}] 🤨 stale slot tap from user {}", ev.user_id);
                self.ctx.sink.ack_selection(&ev.id, Some(STALE_DIALOG)).await?;
            }
        }
        Ok(())
    }

    /// The title landed: create the meeting, arm its reminder, and send the
    /// event card with an invite link.
    async fn finalize_meeting(
        &self,
        msg: &TextMessage,
        draft: CompletedDraft,
        request_id: Uuid,
    ) -> Result<()> {
        let start = DateTime::<Utc>::from_naive_utc_and_offset(draft.date.and_time(draft.time), Utc);
        let record = self.ctx.meetings.create(NewMeeting {
            title: draft.title,
            start,
            organizer: msg.user_id,
            organizer_name: msg.sender_name.clone(),
        });
        self.ctx.reminders.arm(&record);
        info!(
            "[{request_id}] 🎉 meeting {} scheduled by user {} for {}",
            record.id,
            msg.user_id,
            record.start.format("%Y-%m-%d %H:%M"),
        );

        let link = self.ctx.invites.deep_link(&self.ctx.invites.token_for(&record));
        let text = format!(
            "{card}\n\nShare this link to invite others:\n{link}",
            card = record.calendar_text(self.ctx.reminder_lead_minutes),
        );
        let keyboard = Keyboard::default()
            .row(vec![Button::callback(
                "Add to Calendar",
                Action::AddToCalendar {
                    meeting_id: record.id.clone(),
                },
            )])
            .row(vec![Button::url("Share Meeting", link)]);
        send_chunked(self.ctx.sink.as_ref(), msg.chat_id, &text, Some(&keyboard)).await?;
        Ok(())
    }

    /// An Add-to-Calendar tap: persist the entry, mirror it to the external
    /// calendar when one is configured, and confirm on the card itself.
    async fn add_to_calendar(
        &self,
        ev: &SelectionEvent,
        meeting_id: &str,
        request_id: Uuid,
    ) -> Result<()> {
        let Some(record) = self.ctx.meetings.get(meeting_id) else {
            debug!("[{request_id}] 🤨 add-to-calendar tap for unknown meeting {meeting_id}");
            self.ctx.sink.ack_selection(&ev.id, None).await?;
            self.ctx.sink.send(ev.chat_id, INVITE_INVALID).await?;
            return Ok(());
        };

        let event = StoredEvent {
            title: record.title.clone(),
            start: record.start,
            end: record.end(),
        };
        if let Err(e) = self.ctx.events.record_event(ev.user_id, event).await {
            error!(
                "[{request_id}] ❌ saving calendar entry for user {} failed: {e:#}",
                ev.user_id,
            );
            self.ctx.sink.ack_selection(&ev.id, None).await?;
            self.ctx.sink.send(ev.chat_id, CALENDAR_SAVE_FAILED).await?;
            return Ok(());
        }

        // Mirroring is best effort; the local save already succeeded.
        if let Some(calendar) = &self.ctx.calendar {
            match calendar
                .create_event(&record.title, &record.description, record.start, record.end())
                .await
            {
                Ok(link) => debug!(
                    "[{request_id}] 📡 mirrored meeting {meeting_id} to the external calendar: {link}",
                ),
                Err(e) => warn!(
                    "[{request_id}] ⚠️ external calendar sync failed for meeting {meeting_id}: {e:#}",
                ),
            }
        }

        info!(
            "[{request_id}] 💾 user {} saved meeting {meeting_id} to their calendar",
            ev.user_id,
        );
        let confirmation = format!(
            "{card}\n\n✅ Added to your calendar!",
            card = record.calendar_text(self.ctx.reminder_lead_minutes),
        );
        match ev.message {
            Some(message) => {
                self.ctx
                    .sink
                    .edit(ev.chat_id, message, &confirmation, None)
                    .await?;
            }
            None => {
                send_chunked(self.ctx.sink.as_ref(), ev.chat_id, &confirmation, None).await?;
            }
        }
        self.ctx
            .sink
            .ack_selection(&ev.id, Some("Meeting added to your calendar!"))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl InboundSink for UpdateHandler {
    async fn handle(&self, event: Inbound) -> Result<()> {
        let request_id = Uuid::new_v4();
        match event {
            Inbound::Text(msg) => {
                info!(
                    "[{}] 📥 text from user {} in chat {}: '{}'",
                    request_id,
                    msg.user_id,
                    msg.chat_id,
                    msg.text.chars().take(100).collect::<String>(),
                );
                self.handle_text(msg, request_id).await
            }
            Inbound::Selection(ev) => {
                info!(
                    "[{}] 📥 selection from user {} in chat {}: {:?}",
                    request_id, ev.user_id, ev.chat_id, ev.action,
                );
                self.handle_selection(ev, request_id).await
            }
        }
    }
}
