//! # Callback Action Codec
//!
//! Typed representation of inline-button callback payloads.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Accept the legacy `select-day_` spelling on decode
//! - 1.0.0: Initial creation
//!
//! Payloads are decoded exactly once, where updates enter the process. Every
//! layer above works with [`Action`] values; raw `callback_data` strings never
//! travel further than the transport.

use chrono::NaiveDate;

const DATE_PREFIX: &str = "date_";
const SELECT_DAY_PREFIX: &str = "select-day_";
const PREV_MONTH_PREFIX: &str = "previous-month_";
const NEXT_MONTH_PREFIX: &str = "next-month_";
const TIME_PREFIX: &str = "time_";
const ADD_CALENDAR_PREFIX: &str = "add_cal_";
const IGNORE: &str = "ignore";

/// Everything an inline button can ask the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A day cell was tapped on the month grid.
    SelectDate { year: i32, month: u32, day: u32 },
    /// Navigate the month grid one month back. Carries the displayed month.
    PrevMonth { year: i32, month: u32 },
    /// Navigate the month grid one month forward. Carries the displayed month.
    NextMonth { year: i32, month: u32 },
    /// A half-hour slot was tapped on the time grid.
    SelectSlot { date: NaiveDate, hour: u32, minute: u32 },
    /// Save a meeting into the tapping user's calendar.
    AddToCalendar { meeting_id: String },
    /// Inert cells (headers, padding). Acknowledged and otherwise dropped.
    Noop,
}

impl Action {
    /// Render the wire form used as `callback_data`.
    pub fn encode(&self) -> String {
        match self {
            Action::SelectDate { year, month, day } => {
                format!("{DATE_PREFIX}{year}_{month}_{day}")
            }
            Action::PrevMonth { year, month } => format!("{PREV_MONTH_PREFIX}{year}_{month}"),
            Action::NextMonth { year, month } => format!("{NEXT_MONTH_PREFIX}{year}_{month}"),
            Action::SelectSlot { date, hour, minute } => {
                format!("{TIME_PREFIX}{}_{hour}_{minute}", date.format("%Y-%m-%d"))
            }
            Action::AddToCalendar { meeting_id } => format!("{ADD_CALENDAR_PREFIX}{meeting_id}"),
            Action::Noop => IGNORE.to_string(),
        }
    }

    /// Parse a wire payload. Returns `None` for anything that is not a
    /// well-formed action, leaving the caller to acknowledge and drop it.
    pub fn decode(data: &str) -> Option<Action> {
        if data == IGNORE {
            return Some(Action::Noop);
        }

        if let Some(rest) = data
            .strip_prefix(DATE_PREFIX)
            .or_else(|| data.strip_prefix(SELECT_DAY_PREFIX))
        {
            let (year, month, day) = split3(rest)?;
            return Some(Action::SelectDate {
                year: year.parse().ok()?,
                month: month.parse().ok()?,
                day: day.parse().ok()?,
            });
        }

        if let Some(rest) = data.strip_prefix(PREV_MONTH_PREFIX) {
            let (year, month) = split2(rest)?;
            return Some(Action::PrevMonth {
                year: year.parse().ok()?,
                month: month.parse().ok()?,
            });
        }

        if let Some(rest) = data.strip_prefix(NEXT_MONTH_PREFIX) {
            let (year, month) = split2(rest)?;
            return Some(Action::NextMonth {
                year: year.parse().ok()?,
                month: month.parse().ok()?,
            });
        }

        if let Some(rest) = data.strip_prefix(TIME_PREFIX) {
            let (date, hour, minute) = split3(rest)?;
            return Some(Action::SelectSlot {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
                hour: hour.parse().ok()?,
                minute: minute.parse().ok()?,
            });
        }

        if let Some(meeting_id) = data.strip_prefix(ADD_CALENDAR_PREFIX) {
            if meeting_id.is_empty() {
                return None;
            }
            return Some(Action::AddToCalendar {
                meeting_id: meeting_id.to_string(),
            });
        }

        None
    }
}

fn split2(rest: &str) -> Option<(&str, &str)> {
    let mut parts = rest.splitn(2, '_');
    Some((parts.next()?, parts.next()?))
}

fn split3(rest: &str) -> Option<(&str, &str, &str)> {
    let mut parts = rest.splitn(3, '_');
    Some((parts.next()?, parts.next()?, parts.next()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_date() {
        assert_eq!(
            Action::decode("date_2024_6_15"),
            Some(Action::SelectDate {
                year: 2024,
                month: 6,
                day: 15
            })
        );
    }

    #[test]
    fn test_decode_select_day_alias() {
        assert_eq!(
            Action::decode("select-day_2024_6_15"),
            Action::decode("date_2024_6_15")
        );
    }

    #[test]
    fn test_decode_month_navigation() {
        assert_eq!(
            Action::decode("previous-month_2024_1"),
            Some(Action::PrevMonth {
                year: 2024,
                month: 1
            })
        );
        assert_eq!(
            Action::decode("next-month_2024_12"),
            Some(Action::NextMonth {
                year: 2024,
                month: 12
            })
        );
    }

    #[test]
    fn test_decode_time_slot() {
        assert_eq!(
            Action::decode("time_2024-06-15_9_30"),
            Some(Action::SelectSlot {
                date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                hour: 9,
                minute: 30
            })
        );
    }

    #[test]
    fn test_decode_add_to_calendar() {
        assert_eq!(
            Action::decode("add_cal_k3j9vq2p"),
            Some(Action::AddToCalendar {
                meeting_id: "k3j9vq2p".to_string()
            })
        );
        assert_eq!(Action::decode("add_cal_"), None);
    }

    #[test]
    fn test_decode_ignore() {
        assert_eq!(Action::decode("ignore"), Some(Action::Noop));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(Action::decode(""), None);
        assert_eq!(Action::decode("date_2024_6"), None);
        assert_eq!(Action::decode("date_2024_six_15"), None);
        assert_eq!(Action::decode("time_15-06-2024_9_30"), None);
        assert_eq!(Action::decode("time_2024-06-15_9"), None);
        assert_eq!(Action::decode("delete_everything"), None);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let actions = [
            Action::SelectDate {
                year: 2025,
                month: 2,
                day: 28,
            },
            Action::PrevMonth {
                year: 2025,
                month: 2,
            },
            Action::NextMonth {
                year: 2024,
                month: 12,
            },
            Action::SelectSlot {
                date: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                hour: 23,
                minute: 30,
            },
            Action::AddToCalendar {
                meeting_id: "ab12cd34".to_string(),
            },
            Action::Noop,
        ];
        for action in actions {
            assert_eq!(Action::decode(&action.encode()), Some(action));
        }
    }
}
