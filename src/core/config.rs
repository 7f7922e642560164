//! # Configuration
//!
//! Environment-backed configuration for the meeting bot.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Add CALENDAR_API_URL for optional external calendar sync
//! - 1.2.0: Add SESSION_TTL_MINUTES and STORAGE_DIR
//! - 1.1.0: Add REMINDER_LEAD_MINUTES and DEEP_LINK_HOST
//! - 1.0.0: Initial creation with bot token and log level

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API token (from @BotFather)
    pub bot_token: String,
    /// Host used when building meeting share links
    pub deep_link_host: String,
    /// Directory holding the event store and meeting snapshots
    pub storage_dir: PathBuf,
    /// How many minutes before a meeting its reminder fires
    pub reminder_lead_minutes: i64,
    /// How long an untouched scheduling dialog survives before it is swept
    pub session_ttl_minutes: u64,
    /// Optional external calendar endpoint; sync is skipped when unset
    pub calendar_api_url: Option<String>,
    /// Default log filter (overridable via RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Only `TELEGRAM_BOT_TOKEN` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .context("TELEGRAM_BOT_TOKEN must be set (get one from @BotFather)")?;

        let reminder_lead_minutes = env_or("REMINDER_LEAD_MINUTES", "30")
            .parse()
            .context("REMINDER_LEAD_MINUTES must be a whole number of minutes")?;

        let session_ttl_minutes = env_or("SESSION_TTL_MINUTES", "30")
            .parse()
            .context("SESSION_TTL_MINUTES must be a whole number of minutes")?;

        Ok(Self {
            bot_token,
            deep_link_host: env_or("DEEP_LINK_HOST", "t.me"),
            storage_dir: PathBuf::from(env_or("STORAGE_DIR", "data")),
            reminder_lead_minutes,
            session_ttl_minutes,
            calendar_api_url: env::var("CALENDAR_API_URL").ok().filter(|v| !v.is_empty()),
            log_level: env_or("LOG_LEVEL", "info"),
        })
    }

    /// Path of the per-user saved events file.
    pub fn events_path(&self) -> PathBuf {
        self.storage_dir.join("events.json")
    }

    /// Path of the meeting registry snapshot file.
    pub fn meetings_path(&self) -> PathBuf {
        self.storage_dir.join("meetings.json")
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so both cases run inside one test fn
    // to keep them off the parallel test runner's toes.
    #[test]
    fn test_from_env_defaults_and_overrides() {
        env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
        env::remove_var("DEEP_LINK_HOST");
        env::remove_var("STORAGE_DIR");
        env::remove_var("REMINDER_LEAD_MINUTES");
        env::remove_var("SESSION_TTL_MINUTES");
        env::remove_var("CALENDAR_API_URL");
        env::remove_var("LOG_LEVEL");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.deep_link_host, "t.me");
        assert_eq!(config.storage_dir, PathBuf::from("data"));
        assert_eq!(config.reminder_lead_minutes, 30);
        assert_eq!(config.session_ttl_minutes, 30);
        assert!(config.calendar_api_url.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.events_path(), PathBuf::from("data/events.json"));
        assert_eq!(config.meetings_path(), PathBuf::from("data/meetings.json"));

        env::set_var("DEEP_LINK_HOST", "tg.example.org");
        env::set_var("REMINDER_LEAD_MINUTES", "15");
        env::set_var("CALENDAR_API_URL", "https://calendar.example.org/events");

        let config = Config::from_env().unwrap();
        assert_eq!(config.deep_link_host, "tg.example.org");
        assert_eq!(config.reminder_lead_minutes, 15);
        assert_eq!(
            config.calendar_api_url.as_deref(),
            Some("https://calendar.example.org/events")
        );

        env::set_var("REMINDER_LEAD_MINUTES", "soon");
        assert!(Config::from_env().is_err());
        env::remove_var("REMINDER_LEAD_MINUTES");
    }
}
