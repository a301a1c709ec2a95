//! Event domain types: stored rows, API payloads and the normalized upsert record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::month_bounds;
use crate::catalog::{GameSystem, Location};
use crate::constants::{DEFAULT_EVENT_LIMIT, MAX_EVENT_LIMIT, PREVIEW_EVENT_LIMIT};
use crate::dedup::compute_dedup_hash;
use crate::error::{CoreError, Result};

/// Moderation state of a user-submitted event. Imported events carry none.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    PendingReview,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending_review" => Ok(Self::PendingReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::InvalidInput(format!("unknown submission status: {s}"))),
        }
    }
}

/// Admin decision on a pending submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// A stored event row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub location_id: i64,
    pub game_system_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub source_type: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub dedup_hash: String,
    pub submitted_by: Option<String>,
    pub submission_status: Option<SubmissionStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event joined with its location and game system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWithRelations {
    pub event: Event,
    pub location: Location,
    pub game_system: GameSystem,
}

/// Public JSON shape of an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventOut {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub source_type: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub location: Location,
    pub game_system: GameSystem,
}

impl From<EventWithRelations> for EventOut {
    fn from(full: EventWithRelations) -> Self {
        let EventWithRelations { event, location, game_system } = full;
        Self {
            id: event.id,
            title: event.title,
            date: event.date,
            start_time: event.start_time,
            description: event.description,
            source_url: event.source_url,
            source_type: event.source_type,
            last_seen_at: event.last_seen_at,
            location,
            game_system,
        }
    }
}

/// Request body for creating or submitting an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventInput {
    pub location_name: String,
    pub game_system: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl EventInput {
    #[must_use]
    pub fn new(
        location_name: impl Into<String>,
        game_system: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            location_name: location_name.into(),
            game_system: game_system.into(),
            title: title.into(),
            date,
            time: None,
            description: None,
            source_url: None,
            source_type: None,
            last_seen_at: None,
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, url: impl Into<String>, source_type: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self.source_type = Some(source_type.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_last_seen_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_seen_at = Some(at);
        self
    }
}

/// Normalized upsert payload: trimmed names, dedup hash and a concrete `last_seen_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub location_name: String,
    pub game_system: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub source_type: Option<String>,
    pub last_seen_at: DateTime<Utc>,
    pub dedup_hash: String,
}

impl EventRecord {
    /// Normalize an input, rejecting blank names or titles.
    pub fn from_input(input: &EventInput, now: DateTime<Utc>) -> Result<Self> {
        let location_name = required(&input.location_name, "location_name")?;
        let game_system = required(&input.game_system, "game_system")?;
        let title = required(&input.title, "title")?;
        let time = optional(input.time.as_deref());
        let date = input.date;
        let dedup_hash = compute_dedup_hash(
            &location_name,
            &game_system,
            &title,
            &date.to_string(),
            time.as_deref(),
        );
        Ok(Self {
            location_name,
            game_system,
            title,
            date,
            time,
            description: optional(input.description.as_deref()),
            source_url: optional(input.source_url.as_deref()),
            source_type: optional(input.source_type.as_deref()),
            last_seen_at: input.last_seen_at.unwrap_or(now),
            dedup_hash,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Filters for listing events. Expired events are always excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub location_id: Option<i64>,
    pub game_system_ids: Vec<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            location_id: None,
            game_system_ids: Vec::new(),
            date_from: None,
            date_to: None,
            skip: 0,
            limit: DEFAULT_EVENT_LIMIT,
        }
    }
}

impl EventQuery {
    /// Every listed event in the calendar month containing `today`.
    #[must_use]
    pub fn month_of(today: NaiveDate) -> Self {
        let (first, last) = month_bounds(today);
        Self {
            date_from: Some(first),
            date_to: Some(last),
            limit: PREVIEW_EVENT_LIMIT,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_EVENT_LIMIT {
            return Err(CoreError::InvalidInput(format!(
                "limit must be between 1 and {MAX_EVENT_LIMIT}"
            )));
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CoreError::InvalidInput("date_from is after date_to".to_owned()));
            }
        }
        Ok(())
    }

    /// Row-level predicate, ignoring pagination.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        !event.is_expired
            && self.location_id.is_none_or(|id| event.location_id == id)
            && (self.game_system_ids.is_empty()
                || self.game_system_ids.contains(&event.game_system_id))
            && self.date_from.is_none_or(|from| event.date >= from)
            && self.date_to.is_none_or(|to| event.date <= to)
    }
}
