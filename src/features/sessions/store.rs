//! # Session Store
//!
//! Concurrent map of per-user dialog sessions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: TTL sweeping
//! - 1.0.0: Initial creation
//!
//! Sessions are keyed by user, not chat, so a user who talks to the bot from
//! two chats still has exactly one dialog. Access goes through [`with_user`],
//! which holds the map entry only for the duration of a synchronous closure.
//!
//! [`with_user`]: SessionStore::with_user

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::features::sessions::machine::{DialogSession, DialogStep};
use crate::transport::UserId;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<UserId, DialogSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the user's session, creating an idle one if absent.
    ///
    /// The closure must not block: the entry lock is held while it runs.
    pub fn with_user<R>(&self, user: UserId, f: impl FnOnce(&mut DialogSession) -> R) -> R {
        let mut entry = self.sessions.entry(user).or_default();
        let result = f(entry.value_mut());
        entry.value_mut().touch();
        result
    }

    /// Current step without creating a session.
    pub fn step(&self, user: UserId) -> DialogStep {
        self.sessions
            .get(&user)
            .map(|session| session.step())
            .unwrap_or(DialogStep::Idle)
    }

    pub fn clear(&self, user: UserId) {
        self.sessions.remove(&user);
    }

    /// Drop sessions idle longer than `ttl`. Returns how many in-progress
    /// dialogs were abandoned by the sweep.
    pub fn sweep(&self, ttl: Duration) -> usize {
        let mut expired = 0;
        self.sessions.retain(|_, session| {
            if session.last_activity().elapsed() < ttl {
                return true;
            }
            if session.step() != DialogStep::Idle {
                expired += 1;
            }
            false
        });
        expired
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
