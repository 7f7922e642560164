//! # Invites Feature
//!
//! Share links and invite token redemption.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! The token inside a share link is the meeting id itself. Anyone holding
//! the link can join, and a token stops working the moment its meeting is
//! gone, with no separate token table to keep in sync.

use crate::features::meetings::{JoinResult, MeetingRecord, MeetingRegistry};
use crate::transport::UserId;

/// Builds share links and redeems the tokens they carry.
#[derive(Debug, Clone)]
pub struct InviteIssuer {
    host: String,
    bot_name: String,
}

/// Outcome of redeeming an invite token.
#[derive(Debug, Clone)]
pub enum RedeemOutcome {
    /// Token was valid; the user is now a participant.
    Joined(MeetingRecord),
    /// Token was valid but the user had already joined.
    AlreadyJoined(MeetingRecord),
    /// Token matches no live meeting.
    Invalid,
}

impl InviteIssuer {
    pub fn new(host: impl Into<String>, bot_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            bot_name: bot_name.into(),
        }
    }

    /// The invite token for a meeting.
    pub fn token_for(&self, meeting: &MeetingRecord) -> String {
        meeting.id.clone()
    }

    /// Deep link that opens the bot with the token as start payload.
    pub fn deep_link(&self, token: &str) -> String {
        format!("https://{}/{}?start={token}", self.host, self.bot_name)
    }

    /// Redeem a token for `user`, joining them to the meeting it names.
    pub fn redeem(&self, token: &str, user: UserId, registry: &MeetingRegistry) -> RedeemOutcome {
        let token = token.trim();
        if token.is_empty() {
            return RedeemOutcome::Invalid;
        }
        match registry.join(token, user) {
            JoinResult::Added(record) => RedeemOutcome::Joined(record),
            JoinResult::AlreadyMember(record) => RedeemOutcome::AlreadyJoined(record),
            JoinResult::NotFound => RedeemOutcome::Invalid,
        }
    }
}
