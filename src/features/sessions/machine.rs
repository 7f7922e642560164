//! # Dialog State Machine
//!
//! The scheduling dialog: date, then time, then title.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Empty titles re-prompt instead of being accepted
//! - 1.1.0: Half-hour slot taps accepted alongside typed times
//! - 1.0.0: Initial creation
//!
//! Transitions are synchronous and never touch the network. The caller maps
//! each [`SessionReply`] to prompts and side effects, which keeps every rule
//! here testable without a sink.

use std::time::Instant;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

/// Where a user currently is in the scheduling dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStep {
    /// No dialog in progress.
    Idle,
    /// Month grid is showing; waiting for a day tap.
    AwaitingDate,
    /// Time grid is showing; waiting for a slot tap or typed HH:MM.
    AwaitingTime,
    /// Waiting for a free-text title.
    AwaitingTitle,
}

/// Partial meeting data collected so far.
#[derive(Debug, Clone, Default)]
struct MeetingDraft {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

/// A fully collected draft, ready to become a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDraft {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub title: String,
}

/// What a transition asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    /// Date accepted; prompt for a time.
    DateStored(NaiveDate),
    /// Time accepted; prompt for a title.
    TimeStored { date: NaiveDate, time: NaiveTime },
    /// Free text arrived while a time was expected but did not parse.
    InvalidTime,
    /// An empty or whitespace-only title arrived; re-prompt.
    EmptyTitle,
    /// Title accepted; the dialog is done and the session is idle again.
    Completed(CompletedDraft),
    /// Free text arrived while no input was expected. Ignore it.
    NotExpectingText,
    /// A grid tap arrived that does not match the current step. The grid it
    /// came from belongs to an abandoned or finished dialog.
    StaleSelection,
}

/// One user's dialog session.
#[derive(Debug, Clone)]
pub struct DialogSession {
    step: DialogStep,
    draft: MeetingDraft,
    last_activity: Instant,
}

impl Default for DialogSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogSession {
    pub fn new() -> Self {
        Self {
            step: DialogStep::Idle,
            draft: MeetingDraft::default(),
            last_activity: Instant::now(),
        }
    }

    pub fn step(&self) -> DialogStep {
        self.step
    }

    /// When this session last saw input, for the idle sweeper.
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Start (or restart) the dialog. Any half-finished draft is discarded.
    pub fn begin(&mut self) {
        self.step = DialogStep::AwaitingDate;
        self.draft = MeetingDraft::default();
    }

    /// Abandon the dialog. Returns whether one was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.step != DialogStep::Idle;
        self.step = DialogStep::Idle;
        self.draft = MeetingDraft::default();
        was_active
    }

    /// A day was tapped on the month grid.
    pub fn choose_date(&mut self, date: NaiveDate) -> SessionReply {
        if self.step != DialogStep::AwaitingDate {
            return SessionReply::StaleSelection;
        }
        self.draft.date = Some(date);
        self.step = DialogStep::AwaitingTime;
        SessionReply::DateStored(date)
    }

    /// A half-hour slot was tapped on the time grid.
    pub fn choose_slot(&mut self, date: NaiveDate, time: NaiveTime) -> SessionReply {
        if self.step != DialogStep::AwaitingTime || self.draft.date != Some(date) {
            return SessionReply::StaleSelection;
        }
        self.store_time(date, time)
    }

    /// Free text arrived from this user.
    pub fn on_text(&mut self, text: &str) -> SessionReply {
        match self.step {
            DialogStep::Idle | DialogStep::AwaitingDate => SessionReply::NotExpectingText,
            DialogStep::AwaitingTime => {
                let Some(date) = self.draft.date else {
                    // A draft cannot reach AwaitingTime without a date; treat
                    // a missing one as a dead dialog.
                    self.cancel();
                    return SessionReply::StaleSelection;
                };
                match parse_time(text) {
                    Some(time) => self.store_time(date, time),
                    None => SessionReply::InvalidTime,
                }
            }
            DialogStep::AwaitingTitle => {
                let title = text.trim();
                if title.is_empty() {
                    return SessionReply::EmptyTitle;
                }
                let (Some(date), Some(time)) = (self.draft.date, self.draft.time) else {
                    self.cancel();
                    return SessionReply::StaleSelection;
                };
                let completed = CompletedDraft {
                    date,
                    time,
                    title: title.to_string(),
                };
                self.step = DialogStep::Idle;
                self.draft = MeetingDraft::default();
                SessionReply::Completed(completed)
            }
        }
    }

    fn store_time(&mut self, date: NaiveDate, time: NaiveTime) -> SessionReply {
        self.draft.time = Some(time);
        self.step = DialogStep::AwaitingTitle;
        SessionReply::TimeStored { date, time }
    }
}

/// Parse a strict 24-hour `HH:MM`.
///
/// Two digits each side, `00:00` through `23:59`. Single-digit hours and
/// out-of-range values are rejected rather than guessed at.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let re = Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").ok()?;
    let caps = re.captures(text.trim())?;
    let hour = caps.get(1)?.as_str().parse().ok()?;
    let minute = caps.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_parse_time_accepts_full_range() {
        assert_eq!(parse_time("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_time("14:30"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_time(" 09:05 "), NaiveTime::from_hms_opt(9, 5, 0));
    }

    #[test]
    fn test_parse_time_rejects_malformed() {
        for input in ["24:00", "9:30", "14:5", "14:60", "ab:cd", "14.30", "", "14:30:00"] {
            assert_eq!(parse_time(input), None, "accepted {input:?}");
        }
    }

    #[test]
    fn test_happy_path_reaches_completion() {
        let mut session = DialogSession::new();
        session.begin();
        assert_eq!(session.step(), DialogStep::AwaitingDate);

        assert_eq!(
            session.choose_date(date()),
            SessionReply::DateStored(date())
        );
        assert_eq!(session.step(), DialogStep::AwaitingTime);

        assert_eq!(
            session.on_text("14:30"),
            SessionReply::TimeStored {
                date: date(),
                time: NaiveTime::from_hms_opt(14, 30, 0).unwrap()
            }
        );
        assert_eq!(session.step(), DialogStep::AwaitingTitle);

        let reply = session.on_text("  Sprint planning  ");
        assert_eq!(
            reply,
            SessionReply::Completed(CompletedDraft {
                date: date(),
                time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
                title: "Sprint planning".to_string()
            })
        );
        assert_eq!(session.step(), DialogStep::Idle);
    }

    #[test]
    fn test_slot_tap_stores_time() {
        let mut session = DialogSession::new();
        session.begin();
        session.choose_date(date());
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(
            session.choose_slot(date(), time),
            SessionReply::TimeStored { date: date(), time }
        );
        assert_eq!(session.step(), DialogStep::AwaitingTitle);
    }

    #[test]
    fn test_invalid_time_keeps_waiting() {
        let mut session = DialogSession::new();
        session.begin();
        session.choose_date(date());
        assert_eq!(session.on_text("25:99"), SessionReply::InvalidTime);
        assert_eq!(session.step(), DialogStep::AwaitingTime);
        assert!(matches!(
            session.on_text("14:30"),
            SessionReply::TimeStored { .. }
        ));
    }

    #[test]
    fn test_empty_title_reprompts() {
        let mut session = DialogSession::new();
        session.begin();
        session.choose_date(date());
        session.on_text("14:30");
        assert_eq!(session.on_text("   "), SessionReply::EmptyTitle);
        assert_eq!(session.step(), DialogStep::AwaitingTitle);
    }

    #[test]
    fn test_restart_discards_draft() {
        let mut session = DialogSession::new();
        session.begin();
        session.choose_date(date());
        session.begin();
        assert_eq!(session.step(), DialogStep::AwaitingDate);
        // The old date is gone: a slot tap for it is stale now.
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(
            session.choose_slot(date(), time),
            SessionReply::StaleSelection
        );
    }

    #[test]
    fn test_cancel_reports_whether_active() {
        let mut session = DialogSession::new();
        assert!(!session.cancel());
        session.begin();
        assert!(session.cancel());
        assert_eq!(session.step(), DialogStep::Idle);
    }

    #[test]
    fn test_selection_in_wrong_step_is_stale() {
        let mut session = DialogSession::new();
        assert_eq!(session.choose_date(date()), SessionReply::StaleSelection);

        session.begin();
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(
            session.choose_slot(date(), time),
            SessionReply::StaleSelection
        );
    }

    #[test]
    fn test_slot_for_other_date_is_stale() {
        let mut session = DialogSession::new();
        session.begin();
        session.choose_date(date());
        let other = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(
            session.choose_slot(other, time),
            SessionReply::StaleSelection
        );
        assert_eq!(session.step(), DialogStep::AwaitingTime);
    }

    #[test]
    fn test_text_when_idle_is_ignored() {
        let mut session = DialogSession::new();
        assert_eq!(session.on_text("hello"), SessionReply::NotExpectingText);
        session.begin();
        assert_eq!(session.on_text("hello"), SessionReply::NotExpectingText);
    }
}
