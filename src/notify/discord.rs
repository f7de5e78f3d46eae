//! Discord webhook delivery
//!
//! Each event becomes one embed posted as `{"embeds": [embed]}`.

use super::{EventCategory, TrackerEvent};
use serde_json::{json, Value};
use std::time::Duration;

/// Placeholder value shipped in `.env.example`
pub const WEBHOOK_PLACEHOLDER: &str = "YOUR_DISCORD_WEBHOOK_URL_HERE";

#[derive(Debug)]
pub enum NotifyError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err)
    }
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Http(e) => write!(f, "HTTP error: {}", e),
            NotifyError::Status(s) => write!(f, "Discord webhook error: {}", s),
        }
    }
}

impl std::error::Error for NotifyError {}

fn color(category: EventCategory) -> u32 {
    match category {
        EventCategory::NewDiscovery => 0x00FF00,
        EventCategory::Renamed => 0x0000FF,
        EventCategory::Spectacular => 0xFF00FF,
        EventCategory::NakedEye => 0xFFD700,
        EventCategory::Binocular => 0x00BFFF,
        EventCategory::SuddenIncrease => 0xFF4500,
    }
}

fn field(name: &str, value: String) -> Value {
    json!({ "name": name, "value": value, "inline": true })
}

/// Build the Discord embed for an event
pub fn build_embed(event: &TrackerEvent, timestamp: chrono::DateTime<chrono::Utc>) -> Value {
    let object = &event.object;
    let mut fields = Vec::new();

    if let Some(name) = &object.display_name {
        fields.push(field("Name", name.clone()));
    }
    if let Some(permid) = &object.permanent_id {
        fields.push(field("Permanent ID", permid.clone()));
    }
    if let Some(avg) = object.one_day_magnitude_avg {
        fields.push(field("1-day avg mag", format!("{:.2}", avg)));
    }
    if let Some(avg) = object.two_day_magnitude_avg {
        fields.push(field("2-day avg mag", format!("{:.2}", avg)));
    }

    json!({
        "title": format!("{}: {}", event.category.title(), object.designation),
        "description": event.description,
        "color": color(event.category),
        "fields": fields,
        "timestamp": timestamp.to_rfc3339(),
    })
}

pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    /// An unset or placeholder URL yields a notifier that only logs
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let webhook_url = webhook_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty() && url != WEBHOOK_PLACEHOLDER);

        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            webhook_url,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub async fn send(&self, event: &TrackerEvent) -> Result<(), NotifyError> {
        let Some(url) = &self.webhook_url else {
            log::info!(
                "DISCORD_WEBHOOK_URL not set, skipping {} notification for {}",
                event.category.as_str(),
                event.object.designation
            );
            return Ok(());
        };

        let payload = json!({ "embeds": [build_embed(event, chrono::Utc::now())] });
        let response = self.client.post(url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status()));
        }

        log::info!(
            "📨 Discord notification sent: {} {}",
            event.category.as_str(),
            event.object.designation
        );
        Ok(())
    }

    /// Send every event, logging failures; returns how many were delivered
    pub async fn send_all(&self, events: &[TrackerEvent]) -> usize {
        let mut delivered = 0;
        for event in events {
            match self.send(event).await {
                Ok(()) => delivered += 1,
                Err(e) => log::error!(
                    "❌ Failed to send {} notification for {}: {}",
                    event.category.as_str(),
                    event.object.designation,
                    e
                ),
            }
        }
        delivered
    }
}
