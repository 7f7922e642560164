//! Shared outbound message text
//!
//! - **Since**: 0.3.0
//!
//! Messages are sent with HTML parse mode, so anything user-supplied must
//! pass through [`html_escape`] before it is interpolated.

/// Welcome text shown by /start and /help.
pub const WELCOME_TEXT: &str = "Welcome to Meeting Organizer Bot!\n\
Commands:\n\
/schedule - Schedule a new meeting\n\
/list - List your meetings\n\
/cancel - Cancel an in-progress scheduling dialog\n\
/help - Show this help message";

/// Prompt sent when a scheduling dialog begins.
pub const PROMPT_DATE: &str = "Please select a date:";

/// Prompt sent after a date is chosen.
pub const PROMPT_TIME: &str = "Please enter the meeting time in 24-hour format (HH:MM):";

/// Prompt sent after a time is chosen.
pub const PROMPT_TITLE: &str = "Please enter the meeting title:";

/// Reply for free text that does not parse as HH:MM while a time is expected.
pub const INVALID_TIME: &str = "Invalid time format. Please use HH:MM (e.g., 14:30):";

/// Reply for an empty or whitespace-only title.
pub const EMPTY_TITLE: &str = "The title cannot be empty. Please enter the meeting title:";

/// Reply for an invite token that resolves to no known meeting.
pub const INVITE_INVALID: &str = "This meeting invitation is no longer valid.";

/// Reply for redeeming an invite to a meeting the user already joined.
pub const ALREADY_REGISTERED: &str = "You're already registered for this meeting!";

/// Follow-up sent after an invite adds the user to a meeting.
pub const ADDED_TO_MEETING: &str = "You've been added to the meeting!\n\
Click 'Add to Calendar' to add it to your Telegram calendar with notifications.";

/// Reply for /list when the user participates in no meetings.
pub const NO_MEETINGS: &str = "You have no scheduled meetings.";

/// Reply for a slash command no handler claims.
pub const UNKNOWN_COMMAND: &str = "Unknown command. Try /help.";

/// Toast for a grid tap belonging to an abandoned or finished dialog.
pub const STALE_DIALOG: &str = "This dialog is no longer active. Send /schedule to start again.";

/// Reply when persisting a calendar entry fails.
pub const CALENDAR_SAVE_FAILED: &str =
    "Sorry, saving this meeting to your calendar failed. Please try again.";

/// Escape text for interpolation into HTML-mode messages.
///
/// Covers the five characters that matter inside both element content and
/// quoted attribute values.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_passthrough() {
        assert_eq!(html_escape("Sprint planning"), "Sprint planning");
    }

    #[test]
    fn test_html_escape_markup() {
        assert_eq!(
            html_escape("<b>Q3 & Q4</b> 'review'"),
            "&lt;b&gt;Q3 &amp; Q4&lt;/b&gt; &#39;review&#39;"
        );
    }

    #[test]
    fn test_html_escape_keeps_unicode() {
        assert_eq!(html_escape("Встреча 🔔"), "Встреча 🔔");
    }
}
