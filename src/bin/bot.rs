use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use huddle::commands::{default_registry, BotContext};
use huddle::core::Config;
use huddle::features::calendar_sync::{CalendarSync, HttpCalendarSync};
use huddle::features::invites::InviteIssuer;
use huddle::features::meetings::MeetingRegistry;
use huddle::features::reminders::ReminderScheduler;
use huddle::features::sessions::SessionStore;
use huddle::storage::{load_snapshot, spawn_snapshot_writer, JsonEventStore};
use huddle::transport::telegram::inbound_from_update;
use huddle::transport::{ChatDispatcher, TelegramApi};
use huddle::update_handler::UpdateHandler;

/// Long-poll window passed to getUpdates.
const LONG_POLL_SECS: u64 = 30;

/// How long a chat's dispatch lane may sit idle before it is retired.
const DISPATCH_IDLE: Duration = Duration::from_secs(300);

/// How often abandoned scheduling dialogs are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Meeting Organizer Bot...");

    let api = Arc::new(TelegramApi::new(&config.bot_token));
    let me = api.get_me().await.map_err(|e| {
        error!("Failed to reach the Telegram Bot API: {e}");
        error!("This could indicate:");
        error!("  - An invalid bot token");
        error!("  - Network issues reaching api.telegram.org");
        anyhow::anyhow!("getMe failed: {}", e)
    })?;
    let bot_name = me.username.unwrap_or(me.first_name);
    info!("🎉 @{bot_name} is connected and ready!");

    // Restore meetings persisted by earlier runs, then keep persisting.
    let snapshot_writer = spawn_snapshot_writer(config.meetings_path());
    let meetings = Arc::new(MeetingRegistry::with_snapshots(snapshot_writer));
    match load_snapshot(&config.meetings_path()).await {
        Ok(records) if !records.is_empty() => {
            info!(
                "📦 restored {} meeting(s) from {}",
                records.len(),
                config.meetings_path().display(),
            );
            meetings.restore(records);
        }
        Ok(_) => info!("📦 no meeting snapshot found, starting empty"),
        Err(e) => warn!("⚠️ couldn't read the meeting snapshot: {e}"),
    }

    let reminders =
        ReminderScheduler::new(api.clone(), meetings.clone(), config.reminder_lead_minutes);
    for record in meetings.all() {
        reminders.arm(&record);
    }
    if reminders.pending() > 0 {
        info!("⏰ re-armed {} reminder(s)", reminders.pending());
    }

    let sessions = SessionStore::new();
    let sweeper = sessions.clone();
    let ttl = Duration::from_secs(config.session_ttl_minutes * 60);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sweeper.sweep(ttl);
            if removed > 0 {
                info!("🧹 cleared {removed} inactive scheduling dialog(s)");
            }
        }
    });

    let events = Arc::new(JsonEventStore::new(config.events_path()));

    let calendar = config.calendar_api_url.as_deref().map(|url| {
        info!("📡 external calendar sync enabled via {url}");
        Arc::new(HttpCalendarSync::new(url)) as Arc<dyn CalendarSync>
    });

    let ctx = Arc::new(BotContext {
        sink: api.clone(),
        meetings: meetings.clone(),
        sessions,
        invites: InviteIssuer::new(config.deep_link_host.clone(), bot_name.clone()),
        reminders,
        events,
        calendar,
        bot_name,
        reminder_lead_minutes: config.reminder_lead_minutes,
    });

    let registry = default_registry();
    let mut names: Vec<_> = registry.command_names().collect();
    names.sort_unstable();
    info!("🎛️ serving {} commands: /{}", names.len(), names.join(", /"));

    let handler = Arc::new(UpdateHandler::new(ctx, registry));
    let dispatcher = ChatDispatcher::new(handler, DISPATCH_IDLE);

    info!("📡 long-polling for updates...");
    let mut offset = 0;
    loop {
        match api.get_updates(offset, LONG_POLL_SECS).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(event) = inbound_from_update(update) {
                        dispatcher.dispatch(event);
                    }
                }
            }
            Err(e) => {
                error!("❌ getUpdates failed: {e}");
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    }
}
