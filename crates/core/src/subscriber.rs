use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::event::Event;

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Which events a subscriber wants: any listed location OR any listed game system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionFilter {
    #[serde(default)]
    pub location_ids: Vec<i64>,
    #[serde(default)]
    pub game_system_ids: Vec<i64>,
}

impl SubscriptionFilter {
    #[must_use]
    pub fn new(location_ids: Vec<i64>, game_system_ids: Vec<i64>) -> Self {
        Self { location_ids, game_system_ids }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.location_ids.is_empty() && self.game_system_ids.is_empty()
    }

    /// An empty filter matches nothing.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.location_ids.contains(&event.location_id)
            || self.game_system_ids.contains(&event.game_system_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    #[serde(flatten)]
    pub filter: SubscriptionFilter,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Check an email address and return it trimmed.
pub fn validate_email(email: &str) -> Result<String> {
    let trimmed = email.trim();
    if EMAIL_RE.is_match(trimmed) {
        Ok(trimmed.to_owned())
    } else {
        Err(CoreError::InvalidInput(format!("invalid email address: {trimmed}")))
    }
}
