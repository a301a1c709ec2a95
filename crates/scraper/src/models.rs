use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for fields the extractors could not determine.
pub const UNKNOWN: &str = "Unknown";

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// A gaming event found in scraped text.
///
/// `date` is ISO (`YYYY-MM-DD`) or `Unknown`; `start_time` is whatever the
/// time extractor produced (`7:00 PM`, `19:00`) or `Unknown`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GamingEvent {
    pub title: String,
    pub game_system: String,
    pub venue: String,
    pub date: String,
    pub start_time: String,
    pub source: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "now_iso")]
    pub extracted_at: String,
}

impl GamingEvent {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        game_system: impl Into<String>,
        venue: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            game_system: game_system.into(),
            venue: venue.into(),
            date: date.into(),
            start_time: start_time.into(),
            source: source.into(),
            source_url: None,
            description: None,
            extracted_at: now_iso(),
        }
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// On-disk snapshot written by `EventStorage::save_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeFile {
    pub scraped_at: String,
    pub total_events: usize,
    #[serde(default)]
    pub events: Vec<GamingEvent>,
}

impl ScrapeFile {
    #[must_use]
    pub fn new(events: Vec<GamingEvent>) -> Self {
        Self { scraped_at: now_iso(), total_events: events.len(), events }
    }
}
