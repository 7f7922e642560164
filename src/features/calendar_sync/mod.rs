//! # Calendar Sync Feature
//!
//! Optional mirroring of saved meetings into an external calendar service.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.6.0
//! - **Toggleable**: true
//!
//! Disabled unless `CALENDAR_API_URL` is configured. Sync failures never
//! block the in-bot flow; callers log them and carry on.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// External calendar boundary.
#[async_trait]
pub trait CalendarSync: Send + Sync {
    /// Create an event on the external calendar. Returns a link to it.
    async fn create_event(
        &self,
        title: &str,
        description: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String>;
}

/// JSON-over-HTTP implementation.
pub struct HttpCalendarSync {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct EventPayload<'a> {
    title: &'a str,
    description: &'a str,
    start: String,
    end: String,
}

#[derive(Deserialize)]
struct EventCreated {
    link: String,
}

impl HttpCalendarSync {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CalendarSync for HttpCalendarSync {
    async fn create_event(
        &self,
        title: &str,
        description: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String> {
        let payload = EventPayload {
            title,
            description,
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .context("calendar service unreachable")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "calendar service returned {} for event '{title}'",
                response.status()
            ));
        }

        let created: EventCreated = response
            .json()
            .await
            .context("calendar service sent an unexpected response body")?;
        Ok(created.link)
    }
}
