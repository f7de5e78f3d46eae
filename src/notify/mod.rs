//! Notification events produced by a tracking pass
//!
//! The tracker's job ends at building `TrackerEvent`s; `discord` delivers them
//! to a webhook.

pub mod discord;

use crate::brightness::VisibilityCategory;
use crate::catalog::TrackedObject;
use serde::Serialize;

pub use discord::{DiscordNotifier, NotifyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventCategory {
    NewDiscovery,
    Renamed,
    Spectacular,
    NakedEye,
    Binocular,
    SuddenIncrease,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::NewDiscovery => "NEW_DISCOVERY",
            EventCategory::Renamed => "RENAMED",
            EventCategory::Spectacular => "SPECTACULAR",
            EventCategory::NakedEye => "NAKED_EYE",
            EventCategory::Binocular => "BINOCULAR",
            EventCategory::SuddenIncrease => "SUDDEN_INCREASE",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EventCategory::NewDiscovery => "🌟 New Comet Discovery",
            EventCategory::Renamed => "✏️ Comet Designation Update",
            EventCategory::Spectacular => "☄️ Spectacular Comet",
            EventCategory::NakedEye => "👁️ Naked-Eye Comet",
            EventCategory::Binocular => "🔭 Binocular Comet",
            EventCategory::SuddenIncrease => "💥 Sudden Brightening",
        }
    }
}

impl From<VisibilityCategory> for EventCategory {
    fn from(category: VisibilityCategory) -> Self {
        match category {
            VisibilityCategory::Spectacular => EventCategory::Spectacular,
            VisibilityCategory::NakedEye => EventCategory::NakedEye,
            VisibilityCategory::Binocular => EventCategory::Binocular,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackerEvent {
    pub category: EventCategory,
    pub object: TrackedObject,
    pub description: String,
}

impl TrackerEvent {
    pub fn new(category: EventCategory, object: &TrackedObject) -> Self {
        Self {
            category,
            object: object.clone(),
            description: describe(category, object),
        }
    }
}

fn describe(category: EventCategory, object: &TrackedObject) -> String {
    let magnitude = object
        .two_day_magnitude_avg
        .map(|m| format!("{:.2}", m))
        .unwrap_or_else(|| "unknown".to_string());

    match category {
        EventCategory::NewDiscovery => "A new comet has been discovered!".to_string(),
        EventCategory::Renamed => match (&object.display_name, &object.permanent_id) {
            (Some(name), Some(permid)) => format!("Now known as {} ({})", name, permid),
            (Some(name), None) => format!("Now known as {}", name),
            (None, Some(permid)) => format!("Assigned permanent id {}", permid),
            (None, None) => "Name and permanent id withdrawn".to_string(),
        },
        EventCategory::Spectacular => format!("2-day average magnitude {}, brighter than magnitude 2", magnitude),
        EventCategory::NakedEye => format!("2-day average magnitude {}, visible to the naked eye", magnitude),
        EventCategory::Binocular => format!("2-day average magnitude {}, visible in binoculars", magnitude),
        EventCategory::SuddenIncrease => format!("Brightened sharply, 2-day average magnitude now {}", magnitude),
    }
}
